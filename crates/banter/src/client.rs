//! Client attachment: the receive pump that mirrors the host's state.
//!
//! Every attached app runs exactly one pump task, whether it is a guest
//! on another machine or the host talking to itself over loopback. The
//! pump applies each frame to the shared projection, then invokes the
//! UI callbacks with the lock released.

use std::sync::Arc;

use banter_client::Projection;
use banter_protocol::{ChatMessage, Codec, JsonCodec, PlayerId, WireMessage};
use banter_transport::{Connection, WebSocketConnection};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::events::ChatEvents;
use crate::Role;

/// Session state shared between the facade and its pump task.
pub(crate) struct ClientState {
    pub(crate) role: Role,
    pub(crate) projection: Projection,
}

impl ClientState {
    pub(crate) fn new() -> Self {
        Self {
            role: Role::Unattached,
            projection: Projection::new(),
        }
    }
}

/// Spawns the receive pump for a fresh attachment.
///
/// `registered` fires once with the assigned id when the host's
/// `Register` frame arrives. When the stream ends, the pump resets the
/// role to [`Role::Unattached`] and fires
/// [`ChatEvents::on_disconnected`].
pub(crate) fn spawn_pump<E: ChatEvents>(
    conn: Arc<WebSocketConnection>,
    state: Arc<Mutex<ClientState>>,
    events: Arc<E>,
    registered: oneshot::Sender<PlayerId>,
) -> JoinHandle<()> {
    tokio::spawn(pump(conn, state, events, registered))
}

async fn pump<E: ChatEvents>(
    conn: Arc<WebSocketConnection>,
    state: Arc<Mutex<ClientState>>,
    events: Arc<E>,
    registered: oneshot::Sender<PlayerId>,
) {
    let codec = JsonCodec;
    let mut registered = Some(registered);

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!("host closed the connection");
                break;
            }
            Err(e) => {
                tracing::debug!(error = %e, "recv failed, leaving session");
                break;
            }
        };

        let msg: WireMessage = match codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(error = %e, "undecodable frame skipped");
                continue;
            }
        };

        match msg {
            WireMessage::Register {
                player_id,
                name,
                is_host,
            } => {
                state.lock().await.projection.set_local_player(player_id);
                if let Some(tx) = registered.take() {
                    tracing::info!(%player_id, %name, is_host, "registered with host");
                    let _ = tx.send(player_id);
                    events.on_joined();
                } else {
                    tracing::debug!(%player_id, "duplicate registration frame");
                }
            }
            WireMessage::RosterUpdate { players } => {
                let snapshot = players.clone();
                state.lock().await.projection.apply_roster(players);
                events.on_roster_changed(&snapshot);
            }
            WireMessage::ChatBroadcast {
                sender,
                text,
                sequence,
            } => {
                let fresh = state.lock().await.projection.apply_chat(ChatMessage {
                    sender: sender.clone(),
                    text: text.clone(),
                    sequence,
                });
                if fresh {
                    events.on_message_received(&format!("{sender}: {text}"));
                }
            }
            // Only the host receives this kind; seeing it here means a
            // confused peer, not a broken session.
            WireMessage::ChatSend { .. } => {
                tracing::debug!("ignoring unexpected frame from host");
            }
        }
    }

    state.lock().await.role = Role::Unattached;
    events.on_disconnected();
}

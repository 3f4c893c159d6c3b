//! Host runtime: the session listener and the single task that owns
//! the roster.
//!
//! Everything that happens to the session funnels into one mpsc channel
//! and is handled by one actor task. The roster is only ever touched
//! from that task, so host assignment and sequence numbering are
//! race-free without locks.
//!
//! ```text
//! accept loop ───────┐
//! reader (client 1) ─┼──→ events ──→ HostActor ──→ per-client writers
//! reader (client 2) ─┘               (owns Roster)
//! ```
//!
//! Each accepted connection gets two small tasks: a reader that feeds
//! frames back into the events channel, and a writer that drains that
//! client's outbound queue. When the actor drops a client's queue, the
//! writer closes the connection on its way out.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use banter_protocol::{Codec, JsonCodec, PlayerId, WireMessage};
use banter_session::Roster;
use banter_transport::{Connection, Transport, WebSocketConnection, WebSocketTransport};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::BanterError;

/// Capacity of the host event channel. Readers back off when the actor
/// falls this far behind.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Everything that can happen to a running session.
pub(crate) enum HostEvent {
    /// The listener accepted a new connection.
    Connected(WebSocketConnection),

    /// A frame arrived from a connected client.
    Inbound(PlayerId, WireMessage),

    /// A client's read stream ended.
    Disconnected(PlayerId),

    /// End the session: drop every client and stop the actor.
    Shutdown,
}

/// Handle to a running host, owned by the application facade.
pub(crate) struct HostHandle {
    local_addr: SocketAddr,
    events: mpsc::Sender<HostEvent>,
    accept_task: JoinHandle<()>,
    actor_task: JoinHandle<()>,
}

impl HostHandle {
    /// The address the session listener is actually bound to.
    pub(crate) fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting, then tells the actor to end the session. Every
    /// connected client is closed as the writers drain out.
    pub(crate) async fn shutdown(&mut self) {
        self.accept_task.abort();
        let _ = self.events.send(HostEvent::Shutdown).await;
        let _ = (&mut self.actor_task).await;
    }
}

impl Drop for HostHandle {
    fn drop(&mut self) {
        self.accept_task.abort();
        self.actor_task.abort();
    }
}

/// Binds the session listener and spawns the host actor.
pub(crate) async fn spawn_host(bind_addr: &str) -> Result<HostHandle, BanterError> {
    let transport = WebSocketTransport::bind(bind_addr).await?;
    let local_addr = transport.local_addr();

    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let actor = HostActor::new(events_rx, events_tx.clone());
    let actor_task = tokio::spawn(actor.run());
    let accept_task = tokio::spawn(accept_loop(transport, events_tx.clone()));

    Ok(HostHandle {
        local_addr,
        events: events_tx,
        accept_task,
        actor_task,
    })
}

/// Accepts connections and hands them to the actor until aborted.
async fn accept_loop(mut transport: WebSocketTransport, events: mpsc::Sender<HostEvent>) {
    loop {
        match transport.accept().await {
            Ok(conn) => {
                if events.send(HostEvent::Connected(conn)).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "accept failed");
            }
        }
    }
}

/// The session actor. Owns the roster and every client's outbound queue.
struct HostActor {
    roster: Roster,

    /// Outbound queues keyed by the same id the roster uses.
    writers: HashMap<PlayerId, mpsc::UnboundedSender<WireMessage>>,

    codec: JsonCodec,
    events_rx: mpsc::Receiver<HostEvent>,

    /// Cloned into each reader task so frames and disconnects flow
    /// back into the event loop.
    events_tx: mpsc::Sender<HostEvent>,
}

impl HostActor {
    fn new(events_rx: mpsc::Receiver<HostEvent>, events_tx: mpsc::Sender<HostEvent>) -> Self {
        Self {
            roster: Roster::new(),
            writers: HashMap::new(),
            codec: JsonCodec,
            events_rx,
            events_tx,
        }
    }

    async fn run(mut self) {
        tracing::info!("session started");

        while let Some(event) = self.events_rx.recv().await {
            match event {
                HostEvent::Connected(conn) => self.handle_connected(conn),
                HostEvent::Inbound(id, msg) => self.handle_inbound(id, msg),
                HostEvent::Disconnected(id) => self.handle_disconnected(id),
                HostEvent::Shutdown => break,
            }
        }

        // Dropping the writers ends every writer task, which closes
        // the client connections.
        tracing::info!(players = self.roster.len(), "session stopped");
    }

    fn handle_connected(&mut self, conn: WebSocketConnection) {
        let id = PlayerId(conn.id().into_inner());
        let conn = Arc::new(conn);

        let player = self.roster.on_connect(id);
        if let Err(e) = self
            .roster
            .register(id, player.name.clone(), player.is_host)
        {
            tracing::warn!(%id, error = %e, "registration failed for admitted connection");
            return;
        }

        let (out_tx, out_rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(Arc::clone(&conn), out_rx, self.codec));
        tokio::spawn(read_loop(conn, id, self.events_tx.clone(), self.codec));
        self.writers.insert(id, out_tx);

        // The newcomer learns its identity first, then everyone gets
        // the grown roster.
        self.send_to(
            id,
            WireMessage::Register {
                player_id: id,
                name: player.name,
                is_host: player.is_host,
            },
        );
        self.broadcast_roster();
    }

    fn handle_inbound(&mut self, id: PlayerId, msg: WireMessage) {
        match msg {
            WireMessage::ChatSend { text } => match self.roster.relay_message(id, &text) {
                Ok(chat) => {
                    self.broadcast(WireMessage::ChatBroadcast {
                        sender: chat.sender,
                        text: chat.text,
                        sequence: chat.sequence,
                    });
                }
                Err(e) => {
                    tracing::warn!(%id, error = %e, "chat from unregistered connection, ignoring");
                }
            },
            // Clients have exactly one legitimate kind to send.
            _ => {
                tracing::debug!(%id, "ignoring unexpected frame from client");
            }
        }
    }

    fn handle_disconnected(&mut self, id: PlayerId) {
        self.writers.remove(&id);
        if self.roster.on_disconnect(id).is_some() {
            self.broadcast_roster();
        }
    }

    fn broadcast_roster(&mut self) {
        let players = self.roster.snapshot();
        tracing::debug!(players = players.len(), "broadcasting roster");
        self.broadcast(WireMessage::RosterUpdate { players });
    }

    /// Queues a message for every client, including the one it came
    /// from. Local echo rides the same path as remote delivery.
    fn broadcast(&mut self, msg: WireMessage) {
        for tx in self.writers.values() {
            let _ = tx.send(msg.clone());
        }
    }

    /// Queues a message for one client. A dead queue is ignored; the
    /// reader task reports the disconnect separately.
    fn send_to(&mut self, id: PlayerId, msg: WireMessage) {
        if let Some(tx) = self.writers.get(&id) {
            let _ = tx.send(msg);
        }
    }
}

/// Drains one client's outbound queue onto its connection, closing the
/// connection when the queue is dropped.
async fn write_loop(
    conn: Arc<WebSocketConnection>,
    mut outbound: mpsc::UnboundedReceiver<WireMessage>,
    codec: JsonCodec,
) {
    while let Some(msg) = outbound.recv().await {
        let frame = match codec.encode(&msg) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode outbound frame");
                continue;
            }
        };
        if let Err(e) = conn.send(&frame).await {
            tracing::debug!(id = %conn.id(), error = %e, "send failed, writer stopping");
            break;
        }
    }
    let _ = conn.close().await;
}

/// Feeds one client's frames into the actor until the stream ends.
async fn read_loop(
    conn: Arc<WebSocketConnection>,
    id: PlayerId,
    events: mpsc::Sender<HostEvent>,
    codec: JsonCodec,
) {
    loop {
        match conn.recv().await {
            Ok(Some(data)) => {
                let msg: WireMessage = match codec.decode(&data) {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::debug!(%id, error = %e, "undecodable frame skipped");
                        continue;
                    }
                };
                if events.send(HostEvent::Inbound(id, msg)).await.is_err() {
                    return;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(%id, error = %e, "recv failed, reader stopping");
                break;
            }
        }
    }
    let _ = events.send(HostEvent::Disconnected(id)).await;
}

//! The application facade: one object that hosts, joins, and chats.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use banter_client::Projection;
use banter_discovery::{discover_host, Advertiser};
use banter_protocol::{
    ChatMessage, Codec, DiscoveryAnnouncement, JsonCodec, PlayerEntry, PlayerId, WireMessage,
};
use banter_transport::{Connection, WebSocketConnection};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::client::{spawn_pump, ClientState};
use crate::host::{spawn_host, HostHandle};
use crate::{BanterError, ChatConfig, ChatEvents};

/// What this app currently is in a session, if anything.
///
/// Every dispatch point checks the role explicitly: outbound chat
/// requires an attachment, and a second `start_as_host` or
/// `try_auto_join` is rejected rather than silently restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Not in a session. The starting state, and the state after any
    /// disconnect.
    Unattached,

    /// Running the session, and joined to it over loopback.
    Hosting,

    /// Joined to a session hosted elsewhere.
    Joined,
}

/// A LAN chat endpoint: host-and-advertise, or discover-and-join.
///
/// One `ChatApp` is one participant. The two entry points differ only
/// in who runs the session; after either succeeds, the same connection,
/// callbacks, and accessors apply. Even the host reaches its own
/// session through a loopback connection, so a UI never branches on
/// role.
///
/// ```rust,no_run
/// use banter::prelude::*;
///
/// struct Printer;
///
/// impl ChatEvents for Printer {
///     fn on_message_received(&self, line: &str) {
///         println!("{line}");
///     }
///     fn on_roster_changed(&self, roster: &[PlayerEntry]) {
///         println!("* {} online", roster.len());
///     }
///     fn on_joined(&self) {
///         println!("* joined");
///     }
/// }
///
/// # async fn run() -> Result<(), BanterError> {
/// let mut app = ChatApp::new(ChatConfig::default(), Printer);
/// if app.try_auto_join().await.is_err() {
///     app.start_as_host().await?;
/// }
/// app.send_message("hello, room").await?;
/// # Ok(())
/// # }
/// ```
pub struct ChatApp<E: ChatEvents> {
    config: ChatConfig,
    events: Arc<E>,
    codec: JsonCodec,
    state: Arc<Mutex<ClientState>>,
    connection: Option<Arc<WebSocketConnection>>,
    pump: Option<JoinHandle<()>>,
    host: Option<HostParts>,
    session_addr: Option<SocketAddr>,
}

/// Host-side machinery, present only while hosting.
struct HostParts {
    handle: HostHandle,
    advertiser: Advertiser,
}

impl<E: ChatEvents> ChatApp<E> {
    /// Creates an unattached app. Nothing binds or connects until one
    /// of the entry points is called.
    pub fn new(config: ChatConfig, events: E) -> Self {
        Self {
            config,
            events: Arc::new(events),
            codec: JsonCodec,
            state: Arc::new(Mutex::new(ClientState::new())),
            connection: None,
            pump: None,
            host: None,
            session_addr: None,
        }
    }

    /// Starts hosting: binds the session listener, joins it over
    /// loopback, then begins advertising on the LAN.
    ///
    /// Advertising starts only after the host's own registration is
    /// confirmed, so a session a joiner discovers is always ready to
    /// accept. Returns the listener's actual bound address.
    pub async fn start_as_host(&mut self) -> Result<SocketAddr, BanterError> {
        self.ensure_unattached().await?;

        let mut host = spawn_host(&self.config.bind_addr()).await?;
        let addr = host.local_addr();
        tracing::info!(%addr, "hosting session");

        let loopback = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port());
        if let Err(e) = self.attach(loopback).await {
            host.shutdown().await;
            return Err(e);
        }

        // The announcement leaves the address unspecified; receivers
        // fall back to the datagram's source address.
        let announcement =
            DiscoveryAnnouncement::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), addr.port());
        let mut advertiser = Advertiser::new(self.config.discovery.clone(), announcement);
        advertiser.start();

        self.state.lock().await.role = Role::Hosting;
        self.host = Some(HostParts { handle: host, advertiser });
        self.session_addr = Some(addr);
        Ok(addr)
    }

    /// Listens for a host announcement and joins the session it names.
    ///
    /// Fails with a wrapped [`DiscoveryError::Timeout`] when nobody on
    /// the network is hosting within the configured window; callers
    /// typically fall back to [`start_as_host`](Self::start_as_host).
    ///
    /// [`DiscoveryError::Timeout`]: banter_discovery::DiscoveryError::Timeout
    pub async fn try_auto_join(&mut self) -> Result<SocketAddr, BanterError> {
        self.ensure_unattached().await?;

        let addr = discover_host(&self.config.discovery).await?;
        self.events.on_host_found(addr);

        self.attach(addr).await?;
        self.state.lock().await.role = Role::Joined;
        self.session_addr = Some(addr);
        tracing::info!(%addr, "joined session");
        Ok(addr)
    }

    /// Sends a chat line to the session.
    ///
    /// The text always goes to the host for naming and sequencing; the
    /// local copy arrives back through
    /// [`ChatEvents::on_message_received`] like everyone else's.
    pub async fn send_message(&self, text: &str) -> Result<(), BanterError> {
        if self.state.lock().await.role == Role::Unattached {
            return Err(BanterError::NotAttached);
        }
        let conn = self.connection.as_ref().ok_or(BanterError::NotAttached)?;

        let frame = self.codec.encode(&WireMessage::ChatSend {
            text: text.to_owned(),
        })?;
        conn.send(&frame).await?;
        Ok(())
    }

    /// Leaves the session. A hosting app also stops the listener and
    /// the LAN advertisement, disconnecting every guest.
    ///
    /// Leaving voluntarily does not fire
    /// [`ChatEvents::on_disconnected`]; that callback is for losing a
    /// session, not for ending one.
    pub async fn shutdown(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
        if let Some(conn) = self.connection.take() {
            let _ = conn.close().await;
        }
        if let Some(mut parts) = self.host.take() {
            parts.advertiser.stop();
            parts.handle.shutdown().await;
        }
        self.session_addr = None;
        self.state.lock().await.role = Role::Unattached;
        tracing::info!("left session");
    }

    /// Current role. Back to [`Role::Unattached`] after any disconnect.
    pub async fn role(&self) -> Role {
        self.state.lock().await.role
    }

    /// The latest roster snapshot, in join order.
    pub async fn roster(&self) -> Vec<PlayerEntry> {
        self.state.lock().await.projection.roster().to_vec()
    }

    /// Every chat message seen in this session, in sequence order.
    pub async fn chat_log(&self) -> Vec<ChatMessage> {
        self.state.lock().await.projection.chat_log().to_vec()
    }

    /// This participant's own roster entry.
    ///
    /// Resolves once registration and the first roster snapshot have
    /// both landed; until then it reports
    /// [`ClientError::LocalIdentityNotYetResolved`] (wrapped), and a UI
    /// should render a placeholder.
    ///
    /// [`ClientError::LocalIdentityNotYetResolved`]: banter_client::ClientError::LocalIdentityNotYetResolved
    pub async fn local_player(&self) -> Result<PlayerEntry, BanterError> {
        let state = self.state.lock().await;
        Ok(state.projection.local_player()?.clone())
    }

    /// The session address: created when hosting, discovered when
    /// joining. `None` while unattached.
    pub fn session_addr(&self) -> Option<SocketAddr> {
        self.session_addr
    }

    async fn ensure_unattached(&self) -> Result<(), BanterError> {
        if self.state.lock().await.role != Role::Unattached {
            return Err(BanterError::AlreadyAttached);
        }
        Ok(())
    }

    /// Connects to `addr`, starts the receive pump, and waits for the
    /// host to confirm registration.
    async fn attach(&mut self, addr: SocketAddr) -> Result<PlayerId, BanterError> {
        let conn = Arc::new(WebSocketConnection::connect(addr).await?);

        // Fresh session, fresh mirror. A stale sequence watermark from
        // an earlier session would make new broadcasts look old.
        self.state.lock().await.projection = Projection::new();

        let (registered_tx, registered_rx) = oneshot::channel();
        let pump = spawn_pump(
            Arc::clone(&conn),
            Arc::clone(&self.state),
            Arc::clone(&self.events),
            registered_tx,
        );

        let player_id =
            match tokio::time::timeout(self.config.registration_timeout, registered_rx).await {
                Ok(Ok(player_id)) => player_id,
                Ok(Err(_)) | Err(_) => {
                    pump.abort();
                    let _ = conn.close().await;
                    return Err(BanterError::RegistrationTimeout(
                        self.config.registration_timeout,
                    ));
                }
            };

        self.connection = Some(conn);
        self.pump = Some(pump);
        Ok(player_id)
    }
}

impl<E: ChatEvents> Drop for ChatApp<E> {
    fn drop(&mut self) {
        if let Some(pump) = &self.pump {
            pump.abort();
        }
    }
}

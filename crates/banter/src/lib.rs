//! # Banter
//!
//! Zero-configuration LAN chat: one process hosts a session and
//! advertises it by UDP broadcast; everyone else on the network
//! discovers it and joins over WebSocket. No accounts, no server list,
//! no setup.
//!
//! The host is authoritative for everything: it assigns identities and
//! display names, decides who carries the host flag, and stamps every
//! chat message with a session-wide sequence number. Clients mirror
//! whatever the host broadcasts. The host itself participates through
//! a loopback connection, so both roles share one code path.
//!
//! ## The stack
//!
//! ```text
//! banter            ← this crate: ChatApp facade, host runtime, pump
//! ├── banter-discovery  UDP broadcast advertise/discover
//! ├── banter-session    host-side roster and sequencing
//! ├── banter-client     client-side projection
//! ├── banter-transport  WebSocket listener and connections
//! └── banter-protocol   wire messages and JSON codec
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use banter::prelude::*;
//!
//! struct Printer;
//!
//! impl ChatEvents for Printer {
//!     fn on_message_received(&self, line: &str) {
//!         println!("{line}");
//!     }
//!     fn on_roster_changed(&self, roster: &[PlayerEntry]) {
//!         println!("* {} online", roster.len());
//!     }
//!     fn on_joined(&self) {
//!         println!("* joined");
//!     }
//! }
//!
//! # async fn run() -> Result<(), BanterError> {
//! let mut app = ChatApp::new(ChatConfig::default(), Printer);
//! if app.try_auto_join().await.is_err() {
//!     app.start_as_host().await?;
//! }
//! app.send_message("hello, room").await?;
//! # Ok(())
//! # }
//! ```

mod app;
mod client;
mod config;
mod error;
mod events;
mod host;

pub use app::{ChatApp, Role};
pub use config::{ChatConfig, DEFAULT_REGISTRATION_TIMEOUT, DEFAULT_SESSION_PORT};
pub use error::BanterError;
pub use events::ChatEvents;

pub use banter_client::ClientError;
pub use banter_discovery::{DiscoveryConfig, DiscoveryError};
pub use banter_protocol::{
    ChatMessage, DiscoveryAnnouncement, PlayerEntry, PlayerId, ProtocolError, WireMessage,
    PROTOCOL_VERSION,
};
pub use banter_transport::TransportError;

/// The one-import surface for applications.
pub mod prelude {
    pub use crate::{
        BanterError, ChatApp, ChatConfig, ChatEvents, ChatMessage, DiscoveryConfig, PlayerEntry,
        PlayerId, Role,
    };
}

//! LAN host discovery for Banter.
//!
//! A host advertises itself by broadcasting a [`DiscoveryAnnouncement`]
//! datagram at a fixed interval to a well-known UDP port. An unconfigured
//! client binds that port, waits for the first announcement that matches
//! its protocol version, and gets back the host's session address — no
//! prior configuration, no name server.
//!
//! ```text
//! Host                                      Client
//!  │  Advertiser::start()                     │
//!  │──── announcement (1s interval) ────────▶ │  discover_host(&config)
//!  │──── announcement ──────────────────────▶ │     → Ok(host_addr)
//!  │  Advertiser::stop()                      │  (listener released)
//! ```
//!
//! Discovery resolves at most once per [`discover_host`] call and the
//! listener socket lives only inside that call, so a retry after a
//! timeout starts from a clean slate.
//!
//! [`DiscoveryAnnouncement`]: banter_protocol::DiscoveryAnnouncement

mod advertise;
mod config;
mod discover;
mod error;

pub use advertise::Advertiser;
pub use config::{
    DEFAULT_ANNOUNCE_INTERVAL, DEFAULT_DISCOVERY_PORT,
    DEFAULT_DISCOVERY_TIMEOUT, DiscoveryConfig,
};
pub use discover::discover_host;
pub use error::DiscoveryError;

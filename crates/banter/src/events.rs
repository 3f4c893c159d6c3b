//! The seam between the chat engine and whatever renders it.
//!
//! A UI implements [`ChatEvents`] once and hands it to the
//! [`ChatApp`](crate::ChatApp); the engine calls back as session
//! activity arrives. The same implementation works unchanged whether
//! the app is hosting or joined, because even a host receives its own
//! session's traffic as a client.

use std::net::SocketAddr;

use banter_protocol::PlayerEntry;

/// Callbacks a UI implements to react to session activity.
///
/// All methods are called from the app's receive task, one at a time
/// and in wire order. Implementations should return quickly; push into
/// a channel or update display state rather than blocking.
pub trait ChatEvents: Send + Sync + 'static {
    /// A chat line is ready to display, already formatted as
    /// `sender: text`. Fires for the local user's own messages too,
    /// once the host echoes them back.
    fn on_message_received(&self, line: &str);

    /// The roster changed. `roster` is the complete new snapshot in
    /// join order; there is nothing to merge with.
    fn on_roster_changed(&self, roster: &[PlayerEntry]);

    /// The host confirmed this client's registration. The local
    /// identity accessor resolves once the first roster snapshot
    /// lands, typically right after this fires.
    fn on_joined(&self);

    /// Discovery located a host at `addr`. Fires just before the
    /// connection attempt.
    fn on_host_found(&self, addr: SocketAddr) {
        let _ = addr;
    }

    /// The connection to the host is gone and the session is over.
    /// Not fired on a voluntary [`shutdown`](crate::ChatApp::shutdown).
    fn on_disconnected(&self) {}
}

//! Error types for the discovery layer.

use std::time::Duration;

/// Errors that can occur during host discovery.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// No valid announcement arrived within the bounded window.
    ///
    /// Recovered by retrying discovery; the listener socket from the
    /// timed-out attempt is already released.
    #[error("no host found within {0:?}")]
    Timeout(Duration),

    /// Binding, sending on, or reading from the discovery socket failed.
    #[error("discovery socket error: {0}")]
    Socket(#[source] std::io::Error),
}

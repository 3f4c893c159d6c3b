//! Error types for the session layer.

/// Errors that can occur while mutating the roster.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation referenced a connection the roster has never
    /// registered (or one that already disconnected). Connections must
    /// complete admission and registration before they can chat.
    #[error("unknown connection {0}")]
    UnknownConnection(banter_protocol::PlayerId),
}

//! Unified error type for the Banter facade.

use std::time::Duration;

use banter_client::ClientError;
use banter_discovery::DiscoveryError;
use banter_protocol::ProtocolError;
use banter_transport::TransportError;

/// Top-level error that wraps the crate-specific errors.
///
/// When using the `banter` facade, you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BanterError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A discovery-level error, most commonly the search timing out
    /// because nobody on the network is hosting.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// A projection-level error, such as asking for the local player
    /// before the roster knows about it.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The operation needs a live session, but this app is not in one.
    #[error("not attached to a session")]
    NotAttached,

    /// The app is already hosting or joined; leave first.
    #[error("already attached to a session")]
    AlreadyAttached,

    /// The host accepted the connection but never confirmed our
    /// registration.
    #[error("registration not confirmed within {0:?}")]
    RegistrationTimeout(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: BanterError = TransportError::ConnectFailed(io).into();
        assert!(matches!(err, BanterError::Transport(_)));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_from_discovery_error() {
        let err: BanterError = DiscoveryError::Timeout(Duration::from_secs(2)).into();
        assert!(matches!(err, BanterError::Discovery(_)));
        assert!(err.to_string().contains("no host found"));
    }

    #[test]
    fn test_from_client_error() {
        let err: BanterError = ClientError::LocalIdentityNotYetResolved.into();
        assert!(matches!(err, BanterError::Client(_)));
    }

    #[test]
    fn test_attachment_errors_display() {
        assert_eq!(BanterError::NotAttached.to_string(), "not attached to a session");
        assert_eq!(
            BanterError::AlreadyAttached.to_string(),
            "already attached to a session"
        );
    }
}

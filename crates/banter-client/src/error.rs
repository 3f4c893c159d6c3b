//! Error types for the client projection.

/// Errors that can occur when querying the local projection.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The local player's roster entry isn't available yet. Either the
    /// host hasn't assigned this client an identity, or the identity is
    /// known but no roster snapshot containing it has arrived. Callers
    /// should treat this as "not yet" rather than a failure.
    #[error("local player identity not yet resolved")]
    LocalIdentityNotYetResolved,
}

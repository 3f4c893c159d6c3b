//! Error types for the protocol layer.
//!
//! Each crate in Banter defines its own error enum. A `ProtocolError`
//! always means a codec fault — the bytes and the expected shape
//! disagreed — never a networking or session problem.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, wrong
    /// data types, or truncated frames. Receivers log and skip the
    /// offending frame; a bad frame is never fatal to the session.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}

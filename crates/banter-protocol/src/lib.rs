//! Wire protocol for Banter.
//!
//! This crate defines the "language" the host and its clients speak:
//!
//! - **Types** ([`WireMessage`], [`PlayerEntry`], [`DiscoveryAnnouncement`],
//!   etc.) — the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and session
//! (player identity). It doesn't know about connections or rosters — it
//! only knows how to serialize and deserialize messages.
//!
//! ```text
//! Transport (frames) → Protocol (WireMessage) → Session (roster context)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ChatMessage, DiscoveryAnnouncement, PROTOCOL_VERSION, PlayerEntry,
    PlayerId, WireMessage,
};

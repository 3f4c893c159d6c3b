//! Client-side session state for Banter.
//!
//! Where `banter-session` is the host's authoritative view, this crate
//! is the guest's mirror of it: a [`Projection`] built entirely from
//! messages the host sends. It never invents state, it only replays:
//!
//! - `Register` → the client learns its own identity
//! - `RosterUpdate` → the roster is replaced wholesale
//! - `ChatBroadcast` → the chat log grows (stale sequences dropped)
//!
//! The host runs one of these too: its own user joins the session over
//! loopback like any guest, so every UI reads session state the same
//! way regardless of which machine is hosting.

mod error;
mod projection;

pub use error::ClientError;
pub use projection::Projection;

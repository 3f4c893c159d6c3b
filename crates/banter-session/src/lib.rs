//! Host-side session state for Banter.
//!
//! This crate is the host's brain: it tracks who is in the chat session,
//! which player carries the host flag, and what sequence number the next
//! chat message gets.
//!
//! 1. **Admission** — a new connection gets an identity and a generated
//!    display name ([`Roster::on_connect`])
//! 2. **Registration** — the player becomes visible to everyone
//!    ([`Roster::register`])
//! 3. **Chat relay** — each message is stamped with the next sequence
//!    number ([`Roster::relay_message`])
//! 4. **Departure** — the player is removed, host flag untouched
//!    ([`Roster::on_disconnect`])
//!
//! # How it fits in the stack
//!
//! ```text
//! App Layer (above)  ← drives the roster from the host's event loop
//!     ↕
//! Session Layer (this crate)  ← decides identity, host flag, sequence
//!     ↕
//! Protocol Layer (below)  ← provides PlayerId, PlayerEntry, ChatMessage
//! ```
//!
//! Everything here is synchronous and single-owner. The async plumbing
//! (sockets, tasks, channels) lives above this crate; the roster just
//! answers "what happened and what should everyone now be told".

mod error;
mod player;
mod roster;

pub use error::SessionError;
pub use player::{ConnectionState, Player};
pub use roster::Roster;

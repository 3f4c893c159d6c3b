//! Core protocol types for Banter's wire format.
//!
//! Two kinds of traffic exist: the session wire protocol (one JSON object
//! per WebSocket binary frame, host ↔ client) and the discovery datagram
//! (one JSON object per UDP packet, host → everyone on the segment). Both
//! are defined here so every crate agrees on the shapes.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Version of the wire protocol.
///
/// Carried in every [`DiscoveryAnnouncement`]; listeners silently ignore
/// announcements with a different version, so incompatible hosts are
/// invisible rather than broken.
pub const PROTOCOL_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player within one hosting session.
///
/// The host assigns ids from its transport connection counter, so the id is
/// opaque to clients — it only supports equality and lookup.
///
/// `#[serde(transparent)]` keeps the JSON representation a plain number:
/// `PlayerId(42)` is `42` on the wire, not `{"0":42}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Roster and chat records
// ---------------------------------------------------------------------------

/// One player as it appears in a roster snapshot.
///
/// The host sends the full roster on every change. Entries appear in join
/// order, and exactly one entry per session carries `is_host = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// The player's unique ID within this session.
    pub id: PlayerId,
    /// Host-assigned display name, e.g. `Player_4821`.
    pub name: String,
    /// Whether this player is the session host.
    pub is_host: bool,
}

/// One chat message as displayed and logged.
///
/// `sequence` is assigned by the host, starts at 1, and increases by one per
/// relayed message, so any client can verify it never saw a gap or a
/// duplicate. Messages are ephemeral — the log lives in memory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display name of the sender at the time the host relayed the message.
    pub sender: String,
    /// The message text, verbatim.
    pub text: String,
    /// Host-assigned monotonic sequence number, starting at 1.
    pub sequence: u64,
}

// ---------------------------------------------------------------------------
// WireMessage — the session wire protocol
// ---------------------------------------------------------------------------

/// Messages exchanged over the reliable session transport.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
/// `{ "type": "ChatSend", "text": "hi" }`. Each receiving side dispatches on
/// the variant and checks the direction: a host ignores anything but
/// `ChatSend`, a client ignores `ChatSend`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WireMessage {
    /// Host → client: "this is who you are."
    ///
    /// Sent once right after the host admits the connection, before the
    /// first roster snapshot on that connection. `player_id` lets the
    /// client find its own entry in later snapshots.
    Register {
        player_id: PlayerId,
        name: String,
        is_host: bool,
    },

    /// Host → client: full roster snapshot in join order.
    ///
    /// Sent to every connected client whenever the roster changes. A
    /// snapshot always replaces the client's mirror wholesale.
    RosterUpdate { players: Vec<PlayerEntry> },

    /// Host → client: a relayed chat message.
    ///
    /// Delivered to every connected client including the original sender,
    /// so local echo takes the same path as remote delivery.
    ChatBroadcast {
        sender: String,
        text: String,
        sequence: u64,
    },

    /// Client → host: "relay this text."
    ///
    /// The host looks up the sender's display name and assigns the
    /// sequence number; clients never send names or sequences.
    ChatSend { text: String },
}

// ---------------------------------------------------------------------------
// DiscoveryAnnouncement — the discovery datagram
// ---------------------------------------------------------------------------

/// The datagram a host broadcasts while advertising.
///
/// `host_addr` may be unspecified (`0.0.0.0`) when the host doesn't know
/// which interface address peers can reach it on; receivers then fall back
/// to the datagram's source address via [`DiscoveryAnnouncement::socket_addr`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryAnnouncement {
    /// Must equal [`PROTOCOL_VERSION`] for the announcement to be honored.
    pub protocol_version: u32,
    /// Address the host believes it is reachable on; may be unspecified.
    pub host_addr: IpAddr,
    /// TCP port of the host's session endpoint.
    pub host_port: u16,
}

impl DiscoveryAnnouncement {
    /// Announcement for the current protocol version.
    pub fn new(host_addr: IpAddr, host_port: u16) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            host_addr,
            host_port,
        }
    }

    /// Resolves the session endpoint this announcement points at.
    ///
    /// `source` is the address the datagram arrived from; it substitutes
    /// for an unspecified `host_addr`.
    pub fn socket_addr(&self, source: SocketAddr) -> SocketAddr {
        let ip = if self.host_addr.is_unspecified() {
            source.ip()
        } else {
            self.host_addr
        };
        SocketAddr::new(ip, self.host_port)
    }
}

// =========================================================================
// Tests
// =========================================================================

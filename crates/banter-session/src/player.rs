//! Player types: the host's record of a single connection.
//!
//! A [`Player`] is born when a connection is admitted, carries a
//! server-generated display name and a host flag, and dies when the
//! connection drops. The [`Roster`](crate::Roster) owns every live
//! `Player` and is the only thing that mutates them.

use banter_protocol::{PlayerEntry, PlayerId};

// ---------------------------------------------------------------------------
// ConnectionState
// ---------------------------------------------------------------------------

/// The lifecycle state of a player's connection.
///
/// ```text
///   Connected ──(register)──→ Registered ──(disconnect)──→ Disconnected
///       │                                                       ↑
///       └──────────────────(disconnect)─────────────────────────┘
/// ```
///
/// - **Connected**: the transport accepted the connection and an identity
///   was assigned, but the registration round-trip hasn't completed.
///   Players in this state are not part of the public roster.
/// - **Registered**: registration completed. The player appears in roster
///   snapshots and may send chat.
/// - **Disconnected**: terminal. The player has been removed from the
///   roster and the identity is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Admitted by the transport, not yet registered.
    Connected,

    /// Fully registered and visible in roster snapshots.
    Registered,

    /// Connection dropped. Terminal state.
    Disconnected,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// The host's record of one connected player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identity for this connection, assigned at admission.
    pub id: PlayerId,

    /// Display name shown in rosters and chat lines.
    /// Generated by the host; clients may overwrite it at registration.
    pub name: String,

    /// Whether this player is the session host. Exactly one player per
    /// session ever carries this flag.
    pub is_host: bool,

    /// Where this player is in the connection lifecycle.
    pub state: ConnectionState,
}

impl Player {
    /// The wire-facing view of this player, as carried in roster updates.
    pub fn entry(&self) -> PlayerEntry {
        PlayerEntry {
            id: self.id,
            name: self.name.clone(),
            is_host: self.is_host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_mirrors_player_fields() {
        let player = Player {
            id: PlayerId(7),
            name: "Player_4242".to_string(),
            is_host: true,
            state: ConnectionState::Registered,
        };

        let entry = player.entry();
        assert_eq!(entry.id, PlayerId(7));
        assert_eq!(entry.name, "Player_4242");
        assert!(entry.is_host);
    }
}

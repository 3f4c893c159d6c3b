//! The projection: a client's local copy of what the host has told it.
//!
//! Clients never compute session state themselves. The host is
//! authoritative, and the projection just replays what arrives on the
//! wire: roster snapshots replace the roster wholesale, chat broadcasts
//! append to the log, and anything stale is dropped.

use banter_protocol::{ChatMessage, PlayerEntry, PlayerId};

use crate::error::ClientError;

/// A client's view of the session, built purely from received messages.
///
/// # Concurrency
///
/// Like the host-side roster, the projection is NOT thread-safe. It is
/// owned by the client's receive loop, which applies messages in arrival
/// order. Snapshots handed out to callers are copies.
///
/// # Staleness
///
/// Chat broadcasts carry a host-assigned sequence number. The projection
/// applies a broadcast only when its sequence is higher than the last
/// applied one, so redelivered or reordered frames can never make the
/// log run backwards.
#[derive(Debug, Default)]
pub struct Projection {
    /// Latest roster snapshot from the host, replaced wholesale on
    /// every `RosterUpdate`.
    roster: Vec<PlayerEntry>,

    /// Chat log in sequence order. Append-only.
    chat: Vec<ChatMessage>,

    /// This client's own identity, once the host has assigned it.
    local_id: Option<PlayerId>,

    /// Sequence of the most recently applied broadcast. 0 before any.
    last_sequence: u64,
}

impl Projection {
    /// Creates an empty projection: no roster, no chat, no identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the identity the host assigned to this client.
    pub fn set_local_player(&mut self, id: PlayerId) {
        tracing::info!(%id, "local identity assigned");
        self.local_id = Some(id);
    }

    /// Replaces the roster with a fresh snapshot from the host.
    ///
    /// Snapshots are authoritative and complete, so there is nothing to
    /// merge: the old roster is discarded entirely.
    pub fn apply_roster(&mut self, players: Vec<PlayerEntry>) {
        tracing::debug!(count = players.len(), "roster snapshot applied");
        self.roster = players;
    }

    /// Appends a chat broadcast to the log, unless it is stale.
    ///
    /// Returns `true` when the message was fresh and appended, `false`
    /// when its sequence was at or below the last applied one and it
    /// was dropped. Gaps are tolerated: the projection tracks
    /// monotonicity, not contiguity.
    pub fn apply_chat(&mut self, message: ChatMessage) -> bool {
        if message.sequence <= self.last_sequence {
            tracing::debug!(
                sequence = message.sequence,
                last = self.last_sequence,
                "stale chat broadcast dropped"
            );
            return false;
        }
        self.last_sequence = message.sequence;
        self.chat.push(message);
        true
    }

    /// This client's own roster entry.
    ///
    /// Fails with [`ClientError::LocalIdentityNotYetResolved`] until the
    /// host has both assigned an identity *and* delivered a roster
    /// snapshot containing it. UIs should render a placeholder until
    /// this resolves.
    pub fn local_player(&self) -> Result<&PlayerEntry, ClientError> {
        let id = self.local_id.ok_or(ClientError::LocalIdentityNotYetResolved)?;
        self.roster
            .iter()
            .find(|e| e.id == id)
            .ok_or(ClientError::LocalIdentityNotYetResolved)
    }

    /// The identity the host assigned, if any. Unlike
    /// [`local_player`](Self::local_player) this does not require the
    /// roster to have caught up.
    pub fn local_id(&self) -> Option<PlayerId> {
        self.local_id
    }

    /// The latest roster snapshot, in the host's join order.
    pub fn roster(&self) -> &[PlayerEntry] {
        &self.roster
    }

    /// Every applied chat broadcast, in sequence order.
    pub fn chat_log(&self) -> &[ChatMessage] {
        &self.chat
    }

    /// Sequence of the most recently applied broadcast.
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }
}

//! The roster: who is in the session, who hosts it, and what sequence
//! the chat stream is at.
//!
//! This is the single source of truth on the host. Every join, rename,
//! chat line, and disconnect flows through the [`Roster`] before anything
//! is broadcast, so the order in which *it* sees events is the order the
//! whole session agrees on.

use std::collections::HashMap;

use banter_protocol::{ChatMessage, PlayerEntry, PlayerId};
use rand::Rng;

use crate::error::SessionError;
use crate::player::{ConnectionState, Player};

/// Host-side session state: admitted connections, registered players,
/// the host flag, and the chat sequence counter.
///
/// # Concurrency
///
/// The roster is NOT thread-safe and has no interior mutability. The
/// server owns exactly one `Roster` inside a single task and serializes
/// every mutation through that task's event loop. That single ownership
/// is what makes host assignment and sequence numbering race-free
/// without any locks.
///
/// # Lifecycle
///
/// ```text
/// on_connect ──→ register ──→ relay_message* ──→ on_disconnect
///    (admitted)    (visible)     (chat flows)       (removed)
/// ```
#[derive(Debug)]
pub struct Roster {
    /// Registered players, in the order they joined. Join order is
    /// display order, so this stays a `Vec` rather than a map.
    players: Vec<Player>,

    /// Admitted connections that have not completed registration.
    /// Not visible in snapshots and not allowed to chat yet.
    pending: HashMap<PlayerId, Player>,

    /// Latched when the first connection is admitted. Never reset,
    /// even if that player later disconnects: a session has at most
    /// one host for its entire lifetime.
    host_claimed: bool,

    /// The sequence number of the most recently relayed chat message.
    /// Starts at 0 so the first message carries sequence 1.
    last_sequence: u64,
}

impl Roster {
    /// Creates an empty roster with the host slot unclaimed.
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            pending: HashMap::new(),
            host_claimed: false,
            last_sequence: 0,
        }
    }

    /// Admits a new connection and assigns its identity.
    ///
    /// The first connection ever admitted claims the host flag; every
    /// later one is a regular player. A fresh display name of the form
    /// `Player_<n>` is generated, regenerating on collision so names
    /// stay unique within the session.
    ///
    /// The player starts in [`ConnectionState::Connected`] and does not
    /// appear in snapshots until [`register`](Self::register) completes.
    /// Admitting an id that is already known returns the existing
    /// identity unchanged.
    pub fn on_connect(&mut self, id: PlayerId) -> Player {
        if let Some(existing) = self.pending.get(&id) {
            return existing.clone();
        }
        if let Some(existing) = self.players.iter().find(|p| p.id == id) {
            return existing.clone();
        }

        let is_host = !self.host_claimed;
        self.host_claimed = true;

        let player = Player {
            id,
            name: self.generate_name(),
            is_host,
            state: ConnectionState::Connected,
        };
        tracing::info!(%id, name = %player.name, is_host, "connection admitted");

        self.pending.insert(id, player.clone());
        player
    }

    /// Completes registration for an admitted connection, making it
    /// visible in roster snapshots.
    ///
    /// Registering an already-registered id is not an error: the name
    /// and host flag are updated in place and the roster size does not
    /// change. Registering an id that was never admitted fails with
    /// [`SessionError::UnknownConnection`].
    pub fn register(
        &mut self,
        id: PlayerId,
        name: String,
        is_host: bool,
    ) -> Result<(), SessionError> {
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            tracing::debug!(%id, name = %name, "duplicate registration, updating in place");
            player.name = name;
            player.is_host = is_host;
            return Ok(());
        }

        let Some(mut player) = self.pending.remove(&id) else {
            return Err(SessionError::UnknownConnection(id));
        };

        player.name = name;
        player.is_host = is_host;
        player.state = ConnectionState::Registered;
        tracing::info!(%id, name = %player.name, is_host, "player registered");

        self.players.push(player);
        Ok(())
    }

    /// Stamps a chat line from a registered player with the next
    /// sequence number.
    ///
    /// Sequences are 1-based and contiguous across the whole session,
    /// regardless of sender. The sender's *current* display name is
    /// captured, so a rename between two messages shows up in the
    /// second one.
    pub fn relay_message(&mut self, id: PlayerId, text: &str) -> Result<ChatMessage, SessionError> {
        let Some(player) = self.players.iter().find(|p| p.id == id) else {
            return Err(SessionError::UnknownConnection(id));
        };

        self.last_sequence += 1;
        tracing::debug!(%id, sequence = self.last_sequence, "chat relayed");

        Ok(ChatMessage {
            sender: player.name.clone(),
            text: text.to_owned(),
            sequence: self.last_sequence,
        })
    }

    /// Removes a connection from the session.
    ///
    /// Returns the removed player (now in its terminal
    /// [`ConnectionState::Disconnected`] state) if it was registered,
    /// so the caller knows a roster broadcast is due. Dropping an
    /// admitted-but-unregistered connection, or an id that is already
    /// gone, returns `None`.
    ///
    /// The host flag is never reassigned: if the host leaves, the
    /// remaining players keep their flags and the session simply has
    /// no host anymore.
    pub fn on_disconnect(&mut self, id: PlayerId) -> Option<Player> {
        if let Some(pos) = self.players.iter().position(|p| p.id == id) {
            let mut player = self.players.remove(pos);
            player.state = ConnectionState::Disconnected;
            tracing::info!(%id, name = %player.name, "player disconnected");
            return Some(player);
        }

        if self.pending.remove(&id).is_some() {
            tracing::debug!(%id, "unregistered connection dropped");
        }
        None
    }

    /// The wire-facing view of the roster: every registered player,
    /// in join order.
    pub fn snapshot(&self) -> Vec<PlayerEntry> {
        self.players.iter().map(Player::entry).collect()
    }

    /// Looks up a registered player by id.
    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// The registered player carrying the host flag, if still present.
    pub fn host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }

    /// Number of registered players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no players are registered.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// The sequence number of the most recently relayed message.
    /// 0 until the first chat line flows.
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Generates a `Player_<n>` display name unique among everyone
    /// currently admitted or registered.
    fn generate_name(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let candidate = format!("Player_{}", rng.random_range(1000..10000));
            if !self.name_taken(&candidate) {
                return candidate;
            }
        }
    }

    fn name_taken(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name == name)
            || self.pending.values().any(|p| p.name == name)
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

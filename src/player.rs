//! Player roster entries.

use alloc::string::String;

/// Player identifier: the 0-based seat index assigned at setup.
pub type PlayerId = u8;

/// A seated player.
///
/// The roster is fixed for the length of a game. Scores only grow; the
/// secret task is replaced whenever a new one is drawn and is `None` once the
/// delegation deck has run out.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    id: PlayerId,
    name: String,
    score: u32,
    secret_task: Option<String>,
    avatar: String,
    /// Times this player chose to perform a primary task this game.
    self_accepts: u32,
    /// Times this player delegated a primary task this game.
    delegations: u32,
}

impl Player {
    /// Creates a player with a zero score and no secret task.
    #[must_use]
    pub const fn new(id: PlayerId, name: String, avatar: String) -> Self {
        Self {
            id,
            name,
            score: 0,
            secret_task: None,
            avatar,
            self_accepts: 0,
            delegations: 0,
        }
    }

    /// Returns the seat id.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Returns the secret task text, if the player holds one.
    #[must_use]
    pub fn secret_task(&self) -> Option<&str> {
        self.secret_task.as_deref()
    }

    /// Returns whether the player holds a secret task that can be delegated against.
    #[must_use]
    pub const fn has_secret(&self) -> bool {
        self.secret_task.is_some()
    }

    /// Returns the avatar symbol.
    #[must_use]
    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    /// Returns how many times the player performed a primary task themselves this game.
    #[must_use]
    pub const fn self_accepts(&self) -> u32 {
        self.self_accepts
    }

    /// Returns how many times the player delegated this game.
    #[must_use]
    pub const fn delegations(&self) -> u32 {
        self.delegations
    }

    /// Adds points and returns the new score.
    pub(crate) const fn award(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        self.score
    }

    pub(crate) fn set_secret(&mut self, secret: Option<String>) {
        self.secret_task = secret;
    }

    pub(crate) const fn record_self_accept(&mut self) -> u32 {
        self.self_accepts += 1;
        self.self_accepts
    }

    pub(crate) const fn record_delegation(&mut self) -> u32 {
        self.delegations += 1;
        self.delegations
    }

    /// Clears score, secret and per-game tallies for a replay.
    pub(crate) fn reset(&mut self) {
        self.score = 0;
        self.secret_task = None;
        self.self_accepts = 0;
        self.delegations = 0;
    }
}

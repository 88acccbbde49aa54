//! Task types.

use alloc::format;
use alloc::string::{String, ToString};

use crate::player::PlayerId;

/// A task printed on a card.
///
/// Tasks are immutable once created. Plain strings are promoted to
/// non-votable tasks whose id is the text itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    /// Stable identifier.
    pub id: String,
    /// The task text shown to players.
    pub text: String,
    /// Whether completion is ratified by the other players' ballots.
    pub is_votable: bool,
    /// Whether the task was supplied by the players at setup.
    pub is_custom: bool,
}

impl Task {
    /// Creates a self-attested task whose id is its text.
    #[must_use]
    pub fn plain(text: &str) -> Self {
        Self {
            id: text.to_string(),
            text: text.to_string(),
            is_votable: false,
            is_custom: false,
        }
    }

    /// Creates a task that must be ratified by a vote.
    #[must_use]
    pub fn votable(text: &str) -> Self {
        Self {
            is_votable: true,
            ..Self::plain(text)
        }
    }

    /// Creates a player-supplied task.
    ///
    /// `index` is the position in the setup list and becomes part of the id.
    #[must_use]
    pub fn custom(index: usize, text: &str) -> Self {
        Self {
            id: format!("custom_{index}"),
            text: text.to_string(),
            is_votable: false,
            is_custom: true,
        }
    }
}

impl From<&str> for Task {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

/// The primary task currently on the table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveTask {
    /// The drawn task.
    pub task: Task,
    /// Whether the card is face up.
    pub visible: bool,
}

/// A secret task shown to one player.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecretReveal {
    /// The secret task text.
    pub text: String,
    /// Owner of the secret.
    pub for_player_id: PlayerId,
    /// Whether the card is face up.
    pub visible: bool,
}

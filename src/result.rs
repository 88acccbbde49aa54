//! Outcome types for votes and finished games.

use alloc::vec::Vec;

use crate::player::PlayerId;
use crate::task::Task;

/// Counted result of a voting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoteTally {
    /// Whether the attempt was ratified.
    pub success: bool,
    /// Number of yes ballots.
    pub yes: u32,
    /// Number of no ballots.
    pub no: u32,
}

impl VoteTally {
    /// Applies the majority rule to raw counts.
    ///
    /// The attempt succeeds when `yes >= ceil((yes + no) / 2)`, so a tie
    /// passes. With no ballots at all the attempt fails.
    ///
    /// ```
    /// use partydeck::VoteTally;
    ///
    /// assert!(VoteTally::from_counts(2, 1).success);
    /// assert!(VoteTally::from_counts(1, 1).success);
    /// assert!(!VoteTally::from_counts(1, 2).success);
    /// assert!(!VoteTally::from_counts(0, 0).success);
    /// ```
    #[must_use]
    pub const fn from_counts(yes: u32, no: u32) -> Self {
        let total = yes + no;
        let success = total > 0 && yes >= total.div_ceil(2);
        Self { success, yes, no }
    }
}

/// Final score line for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Standing {
    /// The player.
    pub player_id: PlayerId,
    /// Score at the end of the game.
    pub score: u32,
}

/// Summary of a game that reached its end phase.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameResult {
    /// Highest scorer; the lowest seat wins ties.
    pub winner_id: PlayerId,
    /// Lowest scorer; the lowest seat loses ties.
    pub penalty_target_id: PlayerId,
    /// Drawn penalty, or `None` when the penalty deck was empty or not yet drawn.
    pub penalty_task: Option<Task>,
    /// Scores in seat order.
    pub standings: Vec<Standing>,
}

//! Ballots for votable tasks.

use alloc::vec::Vec;

use crate::error::VoteError;
use crate::player::{Player, PlayerId};
use crate::result::VoteTally;
use crate::task::Task;

/// A single ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Vote {
    /// The task was performed.
    Yes,
    /// The task was not performed.
    No,
}

/// An open vote on one attempted task.
///
/// Every player except the performer gets exactly one ballot slot. The round
/// is resolved once every slot is filled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VotingRound {
    task: Task,
    performer_id: PlayerId,
    delegated: bool,
    ballots: Vec<(PlayerId, Option<Vote>)>,
}

impl VotingRound {
    /// Opens a round for `performer_id` with an empty ballot for every other player.
    ///
    /// `delegated` records whether the performer was handed the task by
    /// another player, which decides what happens after a successful vote.
    #[must_use]
    pub fn start(task: Task, performer_id: PlayerId, delegated: bool, players: &[Player]) -> Self {
        let ballots = players
            .iter()
            .map(Player::id)
            .filter(|&id| id != performer_id)
            .map(|id| (id, None))
            .collect();

        Self {
            task,
            performer_id,
            delegated,
            ballots,
        }
    }

    /// Returns the task under vote.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the id of the task under vote.
    #[must_use]
    pub fn task_id(&self) -> &str {
        &self.task.id
    }

    /// Returns the text of the task under vote.
    #[must_use]
    pub fn task_text(&self) -> &str {
        &self.task.text
    }

    /// Returns the player whose attempt is being judged.
    #[must_use]
    pub const fn performer_id(&self) -> PlayerId {
        self.performer_id
    }

    /// Returns whether the performer was delegated the task.
    #[must_use]
    pub const fn is_delegated(&self) -> bool {
        self.delegated
    }

    /// Returns the ballot slots in seat order.
    #[must_use]
    pub fn ballots(&self) -> &[(PlayerId, Option<Vote>)] {
        &self.ballots
    }

    /// Returns the ballot cast by `voter_id`, if any.
    #[must_use]
    pub fn ballot(&self, voter_id: PlayerId) -> Option<Vote> {
        self.ballots
            .iter()
            .find(|(id, _)| *id == voter_id)
            .and_then(|(_, vote)| *vote)
    }

    /// Returns how many ballots have been cast.
    #[must_use]
    pub fn cast_count(&self) -> usize {
        self.ballots.iter().filter(|(_, vote)| vote.is_some()).count()
    }

    /// Returns how many players are eligible to vote.
    #[must_use]
    pub fn eligible_count(&self) -> usize {
        self.ballots.len()
    }

    /// Records a ballot.
    ///
    /// # Errors
    ///
    /// Returns an error if the voter is the performer, has no ballot slot, or
    /// has already voted. The round is left unchanged.
    pub fn cast(&mut self, voter_id: PlayerId, vote: Vote) -> Result<(), VoteError> {
        if voter_id == self.performer_id {
            return Err(VoteError::SelfVote);
        }

        let slot = self
            .ballots
            .iter_mut()
            .find(|(id, _)| *id == voter_id)
            .ok_or(VoteError::VoterNotFound)?;

        if slot.1.is_some() {
            return Err(VoteError::AlreadyVoted);
        }

        slot.1 = Some(vote);
        Ok(())
    }

    /// Returns whether every eligible ballot has been cast.
    ///
    /// A round with no eligible voters is trivially resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.ballots.iter().all(|(_, vote)| vote.is_some())
    }

    /// Counts the ballots and applies the majority rule.
    #[must_use]
    pub fn resolve(&self) -> VoteTally {
        let yes = self
            .ballots
            .iter()
            .filter(|(_, vote)| *vote == Some(Vote::Yes))
            .count() as u32;
        let no = self
            .ballots
            .iter()
            .filter(|(_, vote)| *vote == Some(Vote::No))
            .count() as u32;

        VoteTally::from_counts(yes, no)
    }
}

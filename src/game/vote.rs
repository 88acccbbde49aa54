use alloc::format;
use alloc::string::ToString;

use rand::Rng;

use crate::error::VoteError;
use crate::player::PlayerId;
use crate::task::{ActiveTask, Task};
use crate::tracker::{Achievement, Stat};
use crate::voting::{Vote, VotingRound};

use super::{Cue, Phase, PendingKind, Step};

impl<R: Rng + ?Sized> Step<'_, R> {
    /// Opens a vote on `performer_id`'s attempt at `task`.
    pub(super) fn start_voting(&mut self, task: Task, performer_id: PlayerId, delegated: bool) {
        let name = self.player_name(performer_id);
        let message = format!("Did {name} do it? \"{}\" Everyone else, vote!", task.text);

        let round = VotingRound::start(task, performer_id, delegated, &self.state.players);
        let nobody_votes = round.eligible_count() == 0;

        self.state.active_task = None;
        self.state.voting_round = Some(round);
        self.state.message = message;
        self.state.last_action_message.clear();
        self.set_phase(Phase::Voting);
        self.cue(Cue::VotingStart);

        if nobody_votes {
            self.schedule(PendingKind::ResolveVote);
        }
    }

    pub(super) fn cast_vote(&mut self, voter_id: PlayerId, vote: Vote) -> Result<(), VoteError> {
        if self.state.phase != Phase::Voting {
            return Err(VoteError::InvalidState);
        }
        let round = self
            .state
            .voting_round
            .as_mut()
            .ok_or(VoteError::InvalidState)?;
        round.cast(voter_id, vote)?;

        let cast = round.cast_count();
        let eligible = round.eligible_count();
        let resolved = round.is_resolved();

        self.state.message = if resolved {
            format!("All {eligible} votes are in.")
        } else {
            format!("{cast}/{eligible} votes in, waiting for {}.", eligible - cast)
        };
        self.cue(Cue::ButtonClick);

        if resolved {
            self.schedule(PendingKind::ResolveVote);
        }
        Ok(())
    }

    /// Takes back a vote nobody has answered and returns the task to the performer.
    pub(super) fn withdraw_vote(&mut self) -> Result<(), VoteError> {
        let round = self
            .state
            .voting_round
            .as_ref()
            .ok_or(VoteError::InvalidState)?;
        if round.cast_count() > 0 {
            return Err(VoteError::BallotsCast);
        }

        let task = round.task().clone();
        let name = self.player_name(round.performer_id()).to_string();
        let next = if round.is_delegated() {
            Phase::DelegateAttemptingTask
        } else {
            Phase::Decision
        };

        self.state.voting_round = None;
        self.state.active_task = Some(ActiveTask {
            task,
            visible: true,
        });
        self.set_phase(next);
        self.state.message = format!("Vote withdrawn. {name}, the task is yours again.");
        self.cue(Cue::ButtonClick);
        Ok(())
    }

    pub(super) fn resolve_vote(&mut self) {
        let Some(round) = self.state.voting_round.take() else {
            self.end_turn();
            return;
        };

        let tally = round.resolve();
        let performer = round.performer_id();
        let points = self.options.self_task_points;
        let (yes, no) = (tally.yes, tally.no);
        if !round.is_delegated() {
            self.count_self_accept(performer);
        }

        if tally.success {
            self.award(performer, points);
            self.record(Stat::TasksCompleted, 1, Some(performer));
            self.record(Stat::VotableTasksWon, 1, Some(performer));
            self.unlock(Achievement::VotedTaskWin);

            let name = self.player_name(performer);
            self.state.last_action_message =
                format!("The table says yes ({yes} yes / {no} no). {name} +{points} points!");

            if round.is_delegated() {
                self.unlock(Achievement::RedMaster);
                self.finish_delegate_success(performer);
            } else {
                self.end_turn();
            }
        } else {
            let name = self.player_name(performer);
            self.state.last_action_message =
                format!("The table says no ({yes} yes / {no} no). {name} scores nothing.");
            self.end_turn();
        }
    }
}

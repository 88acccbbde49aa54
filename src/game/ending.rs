use alloc::format;
use alloc::string::ToString;

use rand::Rng;

use crate::error::EndError;
use crate::tracker::{Achievement, Stat};

use super::{Cue, Phase, PendingKind, Step};

impl<R: Rng + ?Sized> Step<'_, R> {
    pub(super) fn end_game_check(&mut self) -> Result<(), EndError> {
        if !self.state.phase.is_active_play() {
            return Err(EndError::InvalidState);
        }
        if !self.state.target_reached(self.options.target_score) {
            return Err(EndError::TargetNotReached);
        }

        self.enter_ending();
        Ok(())
    }

    /// Records the winner and schedules the choice of penalty target.
    pub(super) fn enter_ending(&mut self) {
        self.clear_turn();

        let Some(winner) = self.state.leader() else {
            return;
        };
        let winner_id = winner.id();
        let winner_name = winner.name().to_string();
        let score = winner.score();

        self.state.winner_id = Some(winner_id);
        self.set_phase(Phase::Ending);
        self.state.message = format!("{winner_name} wins with {score} points!");

        self.record(Stat::GamesPlayed, 1, None);
        self.record(Stat::Wins, 1, Some(winner_id));
        self.unlock(Achievement::FirstGame);
        self.unlock(Achievement::FirstWin);
        self.cue(Cue::GameEnd);

        tracing::info!(winner = winner_id, score, "game over");
        self.schedule(PendingKind::SelectPenaltyTarget);
    }

    pub(super) fn select_penalty_target(&mut self) {
        let Some(target) = self.state.trailer() else {
            return;
        };
        let target_id = target.id();
        let name = target.name().to_string();

        self.state.penalty_target_id = Some(target_id);
        self.set_phase(Phase::AssigningPenalty);
        self.state.message = format!("{name} has the lowest score and draws a penalty card.");
    }

    pub(super) fn assign_penalty(&mut self) -> Result<(), EndError> {
        if self.state.phase != Phase::AssigningPenalty {
            return Err(EndError::InvalidState);
        }
        let target_id = self
            .state
            .penalty_target_id
            .ok_or(EndError::InvalidState)?;
        let name = self.player_name(target_id).to_string();

        self.state.penalty_task = self.state.penalty_deck.draw();
        if let Some(penalty) = &self.state.penalty_task {
            self.state.message = format!("{name}'s penalty: {}", penalty.text);
            self.record(Stat::BlackCardsDrawn, 1, Some(target_id));
            self.unlock(Achievement::BlackCardVictim);
        } else {
            self.state.message = format!("The penalty deck is empty. {name} is off the hook!");
        }

        self.set_phase(Phase::Ended);
        self.cue(Cue::CardDraw);
        Ok(())
    }
}

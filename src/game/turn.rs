use alloc::format;
use alloc::string::{String, ToString};

use rand::Rng;

use crate::error::{ActionError, GameError};
use crate::player::{Player, PlayerId};
use crate::task::{ActiveTask, SecretReveal, Task};
use crate::tracker::{Achievement, Stat};

use super::{Cue, Phase, PendingKind, Step};

impl<R: Rng + ?Sized> Step<'_, R> {
    /// Returns the drawn task if it is face up.
    fn visible_task(&self) -> Result<Task, ActionError> {
        match &self.state.active_task {
            Some(active) if active.visible => Ok(active.task.clone()),
            Some(_) => Err(ActionError::TaskHidden),
            None => Err(ActionError::InvalidState),
        }
    }

    fn set_task_visible(&mut self, visible: bool) {
        if let Some(active) = &mut self.state.active_task {
            active.visible = visible;
        }
    }

    fn require_phase(&self, phase: Phase) -> Result<(), ActionError> {
        if self.state.phase == phase {
            Ok(())
        } else {
            Err(ActionError::InvalidState)
        }
    }

    pub(super) fn draw_primary(&mut self) -> Result<(), ActionError> {
        self.require_phase(Phase::Playing)?;

        if let Some(task) = self.state.primary_deck.draw() {
            self.state.active_task = Some(ActiveTask {
                task,
                visible: true,
            });
            self.set_phase(Phase::Decision);
            let name = self.state.current_player().map_or("", Player::name);
            self.state.message = format!("{name}, do it yourself or hand it over?");
            self.cue(Cue::CardDraw);
        } else {
            self.cue(Cue::Error);
            self.end_turn();
            if self.state.phase == Phase::Playing {
                self.state.message = format!("The task deck is empty! {}", self.state.message);
            }
        }

        Ok(())
    }

    pub(super) fn accept_self(&mut self) -> Result<(), ActionError> {
        self.require_phase(Phase::Decision)?;
        let task = self.visible_task()?;
        let current = self.current_id().ok_or(ActionError::PlayerNotFound)?;

        if task.is_votable {
            self.start_voting(task, current, false);
        } else {
            self.count_self_accept(current);
            self.award(current, self.options.self_task_points);
            self.record(Stat::TasksCompleted, 1, Some(current));
            self.end_turn();
        }

        Ok(())
    }

    /// Counts a task the drawer took on themselves once the attempt is final.
    pub(super) fn count_self_accept(&mut self, player_id: PlayerId) {
        let accepts = self
            .state
            .player_mut(player_id)
            .map_or(0, Player::record_self_accept);
        if accepts == self.options.brave_soul_accepts {
            self.unlock(Achievement::BraveSoul);
        }
    }

    pub(super) fn start_delegation(&mut self) -> Result<(), ActionError> {
        self.require_phase(Phase::Decision)?;
        self.visible_task()?;
        if self.state.delegate_candidates().next().is_none() {
            return Err(ActionError::NoDelegateAvailable);
        }

        self.set_phase(Phase::SelectingDelegate);
        self.state.message = String::from("Who should take this task?");
        self.cue(Cue::ButtonClick);
        Ok(())
    }

    pub(super) fn select_delegate(&mut self, player_id: PlayerId) -> Result<(), ActionError> {
        self.require_phase(Phase::SelectingDelegate)?;

        let current = self.current_id().ok_or(ActionError::PlayerNotFound)?;
        let target = self
            .state
            .player(player_id)
            .ok_or(ActionError::PlayerNotFound)?;
        if player_id == current {
            return Err(ActionError::CannotDelegateToSelf);
        }
        let text = target.secret_task().ok_or(ActionError::NoSecret)?.to_string();
        let target_name = target.name().to_string();

        self.state.selected_delegate_id = Some(player_id);
        self.state.active_secret_reveal = Some(SecretReveal {
            text,
            for_player_id: player_id,
            visible: true,
        });
        self.set_task_visible(false);
        self.set_phase(Phase::RevealingSecretForDelegate);

        let name = self.player_name(current);
        self.state.message = format!("{name}, complete {target_name}'s secret task!");
        self.cue(Cue::CardDraw);
        Ok(())
    }

    pub(super) fn cancel(&mut self) -> Result<(), GameError> {
        match self.state.phase {
            Phase::SelectingDelegate => {
                self.state.selected_delegate_id = None;
                self.set_task_visible(true);
                self.set_phase(Phase::Decision);
                let name = self.state.current_player().map_or("", Player::name);
                self.state.message = format!("{name}, do it yourself or hand it over?");
                self.cue(Cue::ButtonClick);
                Ok(())
            }
            Phase::Voting => self.withdraw_vote().map_err(GameError::from),
            _ => Err(ActionError::InvalidState.into()),
        }
    }

    pub(super) fn delegator_completes_secret(&mut self) -> Result<(), ActionError> {
        self.require_phase(Phase::RevealingSecretForDelegate)?;
        let delegator = self.current_id().ok_or(ActionError::PlayerNotFound)?;
        let delegate = self
            .state
            .selected_delegate_id
            .ok_or(ActionError::PlayerNotFound)?;

        let delegations = self
            .state
            .player_mut(delegator)
            .map_or(0, Player::record_delegation);
        if delegations == self.options.delegator_master_delegations {
            self.unlock(Achievement::DelegatorMaster);
        }
        self.unlock(Achievement::BlueMaster);
        self.record(Stat::TasksDelegated, 1, Some(delegator));
        self.award(delegator, self.options.delegation_bonus_points);

        self.state.active_secret_reveal = None;
        self.set_task_visible(true);
        self.set_phase(Phase::DelegateAttemptingTask);

        let name = self.player_name(delegate);
        self.state.message = format!("{name}, now it's your turn to do the task!");
        Ok(())
    }

    pub(super) fn delegate_completes_primary(&mut self) -> Result<(), ActionError> {
        self.require_phase(Phase::DelegateAttemptingTask)?;
        let task = self.visible_task()?;
        let delegate = self
            .state
            .selected_delegate_id
            .ok_or(ActionError::PlayerNotFound)?;

        if task.is_votable {
            self.start_voting(task, delegate, true);
        } else {
            self.award(delegate, self.options.self_task_points);
            self.record(Stat::TasksCompleted, 1, Some(delegate));
            self.unlock(Achievement::RedMaster);
            self.finish_delegate_success(delegate);
        }

        Ok(())
    }

    /// Replaces the delegate's used secret with a fresh one.
    ///
    /// With a card left the new secret is shown before the turn passes;
    /// otherwise the delegate is left without a secret and the turn passes now.
    pub(super) fn finish_delegate_success(&mut self, delegate: PlayerId) {
        let secret = self.state.delegation_deck.draw().map(|task| task.text);
        if let Some(player) = self.state.player_mut(delegate) {
            player.set_secret(secret.clone());
        }

        if let Some(text) = secret {
            self.state.active_task = None;
            self.state.active_secret_reveal = Some(SecretReveal {
                text,
                for_player_id: delegate,
                visible: true,
            });
            self.set_phase(Phase::ConfirmingNewSecret);
            let name = self.player_name(delegate);
            self.state.message = format!("{name}, here is your new secret task.");
            self.cue(Cue::CardDraw);
        } else {
            self.end_turn();
            if self.state.phase == Phase::Playing {
                self.state.message =
                    format!("The secret deck is empty! {}", self.state.message);
            }
        }
    }

    pub(super) fn confirm_close(&mut self) -> Result<(), ActionError> {
        self.require_phase(Phase::ConfirmingNewSecret)?;

        if let Some(reveal) = &mut self.state.active_secret_reveal {
            reveal.visible = false;
        }
        self.state.message = String::from("Card closed.");
        self.cue(Cue::ButtonClick);
        self.schedule(PendingKind::PassTurn);
        Ok(())
    }
}

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::catalog::AVATARS;
use crate::deck::Deck;
use crate::error::{ActionError, SetupError};
use crate::player::{Player, PlayerId};
use crate::task::{SecretReveal, Task};
use crate::tracker::{Achievement, Stat};

use super::{Cue, Effect, GameState, Phase, Step};

impl<R: Rng + ?Sized> Step<'_, R> {
    pub(super) fn setup_game(
        &mut self,
        names: &[String],
        custom_tasks: &[String],
    ) -> Result<(), SetupError> {
        if self.state.phase != Phase::Setup {
            return Err(SetupError::InvalidState);
        }
        if names.is_empty() {
            return Err(SetupError::NoPlayers);
        }
        if names.len() > self.options.max_players || names.len() > usize::from(PlayerId::MAX) + 1
        {
            return Err(SetupError::TooManyPlayers);
        }

        let custom: Vec<Task> = custom_tasks
            .iter()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .enumerate()
            .map(|(index, text)| Task::custom(index, text))
            .collect();
        if custom.len() > self.options.max_custom_tasks {
            return Err(SetupError::TooManyCustomTasks);
        }

        let mut players: Vec<Player> = Vec::with_capacity(names.len());
        for (name, id) in names.iter().zip(0..=PlayerId::MAX) {
            let name = self.player_display_name(name, id);
            let avatar = self.pick_avatar(&players);
            players.push(Player::new(id, name, avatar));
        }

        let player_count = players.len();
        let custom_count = custom.len();
        self.state.players = players;
        self.state.custom_tasks = custom;
        self.deal_new_game();
        self.cue(Cue::ButtonClick);

        if custom_count > 0 {
            self.record(
                Stat::CustomTasksAdded,
                u64::try_from(custom_count).unwrap_or(u64::MAX),
                None,
            );
            self.unlock(Achievement::CustomTaskAdded);
        }
        if player_count >= self.options.full_house_players {
            self.unlock(Achievement::FullHouse);
        }

        tracing::info!(
            players = player_count,
            custom_tasks = custom_count,
            "game set up"
        );
        Ok(())
    }

    /// Trims and truncates a name, falling back to the seat number.
    fn player_display_name(&self, name: &str, id: PlayerId) -> String {
        let name = name.trim();
        if name.is_empty() {
            format!("Player {}", usize::from(id) + 1)
        } else {
            name.chars().take(self.options.max_name_len).collect()
        }
    }

    /// Picks an avatar nobody at the table uses yet, if one is left.
    fn pick_avatar(&mut self, seated: &[Player]) -> String {
        let free: Vec<&str> = AVATARS
            .iter()
            .copied()
            .filter(|avatar| seated.iter().all(|player| player.avatar() != *avatar))
            .collect();
        let pool: &[&str] = if free.is_empty() { AVATARS } else { &free };

        pool.choose(&mut *self.rng)
            .map_or_else(String::new, |avatar| (*avatar).to_string())
    }

    /// Shuffles fresh decks, deals one secret task per player and starts the reveal.
    fn deal_new_game(&mut self) {
        let mut primary = self.catalog.primary.clone();
        primary.extend(self.state.custom_tasks.iter().cloned());
        self.state.primary_deck = Deck::shuffled(&primary, &mut *self.rng);
        self.state.delegation_deck = Deck::shuffled(&self.catalog.delegation, &mut *self.rng);
        self.state.penalty_deck = Deck::shuffled(&self.catalog.penalty, &mut *self.rng);

        for player in &mut self.state.players {
            let secret = self.state.delegation_deck.draw().map(|task| task.text);
            player.set_secret(secret);
        }

        self.clear_turn();
        self.state.current_player_index = 0;
        self.state.revealing_player_index = 0;
        self.state.pending = None;
        self.state.winner_id = None;
        self.state.penalty_target_id = None;
        self.state.penalty_task = None;
        self.state.last_action_message.clear();
        self.set_phase(Phase::RevealingSecret);

        let first = self.state.players.first().map_or("", Player::name);
        self.state.message = format!("{first}, look at your secret card.");
    }

    pub(super) fn show_secret(&mut self) -> Result<(), ActionError> {
        if self.state.phase != Phase::RevealingSecret {
            return Err(ActionError::InvalidState);
        }

        let player = self
            .state
            .players
            .get(self.state.revealing_player_index)
            .ok_or(ActionError::PlayerNotFound)?;
        let text = player.secret_task().ok_or(ActionError::NoSecret)?.to_string();
        let for_player_id = player.id();

        self.state.active_secret_reveal = Some(SecretReveal {
            text,
            for_player_id,
            visible: true,
        });
        self.state.message = String::from("Memorize it, then hide the card.");
        self.cue(Cue::CardDraw);
        Ok(())
    }

    pub(super) fn hide_and_proceed(&mut self) -> Result<(), ActionError> {
        if self.state.phase != Phase::RevealingSecret {
            return Err(ActionError::InvalidState);
        }

        self.state.active_secret_reveal = None;
        let next = self.state.revealing_player_index + 1;

        if let Some(player) = self.state.players.get(next) {
            let name = player.name().to_string();
            self.state.revealing_player_index = next;
            self.state.message = format!("{name}, look at your secret card.");
        } else {
            self.state.revealing_player_index = 0;
            self.state.current_player_index = 0;
            self.set_phase(Phase::Playing);
            let first = self.state.players.first().map_or("", Player::name);
            self.state.message = format!("{first}, your turn! Draw a task.");
        }

        self.cue(Cue::TurnChange);
        Ok(())
    }

    pub(super) fn restart(&mut self) {
        let from = self.state.phase;
        self.state = GameState::new();
        self.state.message = String::from("Who is playing?");

        if from != Phase::Setup {
            self.effects.push(Effect::PhaseChanged {
                from,
                to: Phase::Setup,
            });
        }
        self.cue(Cue::ButtonClick);
    }

    pub(super) fn replay_same_players(&mut self) -> Result<(), SetupError> {
        if self.state.players.is_empty() {
            return Err(SetupError::NoPlayers);
        }

        for player in &mut self.state.players {
            player.reset();
        }
        self.deal_new_game();
        self.cue(Cue::ButtonClick);

        tracing::info!(players = self.state.players.len(), "game replayed");
        Ok(())
    }
}

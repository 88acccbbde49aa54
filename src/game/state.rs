//! Game state types.

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use crate::deck::Deck;
use crate::player::{Player, PlayerId};
use crate::result::{GameResult, Standing};
use crate::task::{ActiveTask, SecretReveal, Task};
use crate::voting::VotingRound;

/// Game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Phase {
    /// Waiting for player names.
    Setup,
    /// Each player privately looks at their first secret task.
    RevealingSecret,
    /// Waiting for the current player to draw.
    Playing,
    /// A task is drawn; the current player decides who performs it.
    Decision,
    /// The current player is choosing a delegate.
    SelectingDelegate,
    /// The delegate's secret task is shown to the delegator.
    RevealingSecretForDelegate,
    /// The delegate is attempting the primary task.
    DelegateAttemptingTask,
    /// The delegate is reading their new secret task.
    ConfirmingNewSecret,
    /// The other players are voting on an attempt.
    Voting,
    /// A player reached the target score.
    Ending,
    /// The lowest scorer is about to draw a penalty.
    AssigningPenalty,
    /// The game is over.
    Ended,
}

impl Phase {
    /// Returns whether scores can still change in this phase.
    #[must_use]
    pub const fn is_active_play(self) -> bool {
        matches!(
            self,
            Self::Playing
                | Self::Decision
                | Self::DelegateAttemptingTask
                | Self::ConfirmingNewSecret
                | Self::Voting
        )
    }
}

/// A transition that fires after a result has been on screen for a while.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PendingKind {
    /// Apply the result of a completed vote.
    ResolveVote,
    /// Move to the end phase after a player reached the target score.
    EnterEnding,
    /// Pick the lowest scorer for the penalty.
    SelectPenaltyTarget,
    /// Hand the turn to the next player.
    PassTurn,
}

/// A paused transition attached to the state.
///
/// The host shows the current state for at least `min_display` and then
/// dispatches [`Event::Advance`](super::Event::Advance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingTransition {
    /// What happens on advance.
    pub kind: PendingKind,
    /// Minimum time the current state should stay on screen.
    pub min_display: Duration,
}

/// Complete game state.
///
/// Values are never mutated in place by the engine: every transition builds
/// a new state from the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Seated players in seat order.
    pub players: Vec<Player>,
    /// Index of the player whose turn it is.
    pub current_player_index: usize,
    /// Index of the player looking at their secret during the initial reveal.
    pub revealing_player_index: usize,
    /// Public per-turn tasks.
    pub primary_deck: Deck,
    /// Secret tasks.
    pub delegation_deck: Deck,
    /// End-of-game penalties.
    pub penalty_deck: Deck,
    /// Custom tasks entered at setup, reused on replay.
    pub custom_tasks: Vec<Task>,
    /// The drawn primary task.
    pub active_task: Option<ActiveTask>,
    /// The secret task currently on screen.
    pub active_secret_reveal: Option<SecretReveal>,
    /// Current phase.
    pub phase: Phase,
    /// Player the current task was handed to.
    pub selected_delegate_id: Option<PlayerId>,
    /// Open vote.
    pub voting_round: Option<VotingRound>,
    /// Paused transition waiting for [`Event::Advance`](super::Event::Advance).
    pub pending: Option<PendingTransition>,
    /// Winner, once the game is ending.
    pub winner_id: Option<PlayerId>,
    /// Player who draws the penalty.
    pub penalty_target_id: Option<PlayerId>,
    /// The drawn penalty.
    pub penalty_task: Option<Task>,
    /// Prompt for the players.
    pub message: String,
    /// Feedback about the last scored action.
    pub last_action_message: String,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Creates an empty state in the setup phase.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            players: Vec::new(),
            current_player_index: 0,
            revealing_player_index: 0,
            primary_deck: Deck::new(),
            delegation_deck: Deck::new(),
            penalty_deck: Deck::new(),
            custom_tasks: Vec::new(),
            active_task: None,
            active_secret_reveal: None,
            phase: Phase::Setup,
            selected_delegate_id: None,
            voting_round: None,
            pending: None,
            winner_id: None,
            penalty_target_id: None,
            penalty_task: None,
            message: String::new(),
            last_action_message: String::new(),
        }
    }

    /// Returns the player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Returns a player by id.
    #[must_use]
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.get(usize::from(player_id))
    }

    pub(crate) fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(usize::from(player_id))
    }

    /// Returns the highest scorer; the lowest seat wins ties.
    #[must_use]
    pub fn leader(&self) -> Option<&Player> {
        self.players.iter().fold(None, |best, player| match best {
            Some(best) if best.score() >= player.score() => Some(best),
            _ => Some(player),
        })
    }

    /// Returns the lowest scorer; the lowest seat loses ties.
    #[must_use]
    pub fn trailer(&self) -> Option<&Player> {
        self.players.iter().fold(None, |worst, player| match worst {
            Some(worst) if worst.score() <= player.score() => Some(worst),
            _ => Some(player),
        })
    }

    /// Returns whether someone has reached `target`.
    #[must_use]
    pub fn target_reached(&self, target: u32) -> bool {
        self.players.iter().any(|player| player.score() >= target)
    }

    /// Returns the players other than the current one who hold a secret task.
    pub fn delegate_candidates(&self) -> impl Iterator<Item = &Player> {
        let current = self.current_player_index;
        self.players
            .iter()
            .enumerate()
            .filter(move |(index, player)| *index != current && player.has_secret())
            .map(|(_, player)| player)
    }

    /// Returns the summary of a game that has entered its end phases.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        Some(GameResult {
            winner_id: self.winner_id?,
            penalty_target_id: self.penalty_target_id?,
            penalty_task: self.penalty_task.clone(),
            standings: self
                .players
                .iter()
                .map(|player| Standing {
                    player_id: player.id(),
                    score: player.score(),
                })
                .collect(),
        })
    }
}

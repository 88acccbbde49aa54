//! Events fed into the state machine and effects it hands back.

use alloc::string::String;
use alloc::vec::Vec;

use crate::player::PlayerId;
use crate::tracker::{Achievement, Stat};
use crate::voting::Vote;

use super::state::{GameState, Phase};

/// A player action or host signal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "data", rename_all = "snake_case")
)]
pub enum Event {
    /// Seat the players and deal.
    SetupGame {
        /// Player names in seat order. Blank names get a default.
        names: Vec<String>,
        /// Extra primary tasks for this table.
        custom_tasks: Vec<String>,
    },
    /// Show the revealing player their secret task.
    ShowSecret,
    /// Hide the secret task and hand the phone on.
    HideAndProceed,
    /// Draw a primary task.
    DrawPrimary,
    /// The current player performs the task.
    AcceptSelf,
    /// The current player wants to hand the task over.
    StartDelegation,
    /// Hand the task to a player.
    SelectDelegate {
        /// The delegate.
        player_id: PlayerId,
    },
    /// Back out of delegate selection, or withdraw a vote nobody has answered.
    Cancel,
    /// The delegator performed the delegate's secret task.
    DelegatorCompletesSecret,
    /// The delegate performed the primary task.
    DelegateCompletesPrimary,
    /// The delegate closed their new secret card.
    ConfirmClose,
    /// Cast a ballot.
    CastVote {
        /// The voter.
        voter_id: PlayerId,
        /// The ballot.
        vote: Vote,
    },
    /// End the game if a player reached the target score.
    EndGameCheck,
    /// Draw the penalty for the lowest scorer.
    AssignPenalty,
    /// Discard the table and return to setup.
    Restart,
    /// Start over with the same players.
    ReplaySamePlayers,
    /// Fire the pending transition.
    Advance,
}

impl Event {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetupGame { .. } => "setup_game",
            Self::ShowSecret => "show_secret",
            Self::HideAndProceed => "hide_and_proceed",
            Self::DrawPrimary => "draw_primary",
            Self::AcceptSelf => "accept_self",
            Self::StartDelegation => "start_delegation",
            Self::SelectDelegate { .. } => "select_delegate",
            Self::Cancel => "cancel",
            Self::DelegatorCompletesSecret => "delegator_completes_secret",
            Self::DelegateCompletesPrimary => "delegate_completes_primary",
            Self::ConfirmClose => "confirm_close",
            Self::CastVote { .. } => "cast_vote",
            Self::EndGameCheck => "end_game_check",
            Self::AssignPenalty => "assign_penalty",
            Self::Restart => "restart",
            Self::ReplaySamePlayers => "replay_same_players",
            Self::Advance => "advance",
        }
    }
}

/// Sound and haptic triggers for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Cue {
    /// Plain confirmation.
    ButtonClick,
    /// A card was drawn or revealed.
    CardDraw,
    /// The phone passes to another player.
    TurnChange,
    /// Points were awarded.
    ScorePoint,
    /// A vote opened.
    VotingStart,
    /// Something could not be done.
    Error,
    /// The game is over.
    GameEnd,
}

/// A side effect described by a transition, executed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "data", rename_all = "snake_case")
)]
pub enum Effect {
    /// The phase changed. Chained transitions report every step.
    PhaseChanged {
        /// Previous phase.
        from: Phase,
        /// New phase.
        to: Phase,
    },
    /// Play a sound or haptic.
    Cue(Cue),
    /// Unlock an achievement in the ledger.
    Unlock(Achievement),
    /// Add to a ledger counter.
    RecordStat {
        /// The counter.
        stat: Stat,
        /// Amount to add.
        delta: u64,
        /// Player for per-player counters.
        player_id: Option<PlayerId>,
    },
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The new state.
    pub state: GameState,
    /// Effects to execute, in order.
    pub effects: Vec<Effect>,
}

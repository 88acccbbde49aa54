//! Error types for game operations.
//!
//! Every error is a guard rejection: the state the action was applied to is
//! left unchanged.

use thiserror::Error;

/// Errors that can occur while setting up or replaying a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SetupError {
    /// Invalid game phase for setup.
    #[error("a game is already in progress")]
    InvalidState,
    /// No player names were given.
    #[error("at least one player is required")]
    NoPlayers,
    /// More players than the table allows.
    #[error("too many players")]
    TooManyPlayers,
    /// More custom tasks than the table allows.
    #[error("too many custom tasks")]
    TooManyCustomTasks,
}

/// Errors that can occur during turn actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Invalid game phase for this action.
    #[error("invalid game phase for this action")]
    InvalidState,
    /// The primary task card is face down.
    #[error("the task card is not visible")]
    TaskHidden,
    /// The player has no secret task.
    #[error("that player has no secret task")]
    NoSecret,
    /// Player not found.
    #[error("player not found")]
    PlayerNotFound,
    /// A player tried to delegate to themselves.
    #[error("you cannot hand a task to yourself")]
    CannotDelegateToSelf,
    /// Nobody else holds a secret task.
    #[error("no other player can take this task")]
    NoDelegateAvailable,
}

/// Errors that can occur during voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VoteError {
    /// No vote is open.
    #[error("no vote is open")]
    InvalidState,
    /// The performer tried to vote on their own attempt.
    #[error("the performer cannot vote")]
    SelfVote,
    /// The voter has no ballot in this round.
    #[error("voter not found")]
    VoterNotFound,
    /// The voter has already cast a ballot.
    #[error("this player has already voted")]
    AlreadyVoted,
    /// A vote cannot be withdrawn once ballots are in.
    #[error("ballots have already been cast")]
    BallotsCast,
}

/// Errors that can occur while ending the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EndError {
    /// Invalid game phase for this step.
    #[error("invalid game phase for ending")]
    InvalidState,
    /// No player has reached the target score.
    #[error("no player has reached the target score")]
    TargetNotReached,
}

/// Any rejection produced by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    /// Setup or replay was rejected.
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// A turn action was rejected.
    #[error(transparent)]
    Action(#[from] ActionError),
    /// A vote action was rejected.
    #[error(transparent)]
    Vote(#[from] VoteError),
    /// An ending step was rejected.
    #[error(transparent)]
    End(#[from] EndError),
    /// A paused transition must be advanced first.
    #[error("waiting for the current result to finish showing")]
    Pending,
    /// `Advance` was dispatched with nothing pending.
    #[error("nothing to advance")]
    NothingPending,
}

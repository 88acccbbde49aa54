//! A pass-and-play party card game engine with optional `no_std` support.
//!
//! Players take turns drawing task cards. A task can be performed by the
//! player who drew it, or handed to another player after the drawer performs
//! that player's secret task. Some tasks are ratified by a vote of the rest
//! of the table. The first player to reach the target score ends the game and
//! the lowest scorer draws a penalty card.
//!
//! The engine is a pure state machine: [`transition`] maps a state and an
//! [`Event`] to a new state plus a list of [`Effect`]s. [`Game`] wraps it
//! with a seeded RNG and the achievement [`Tracker`].
//!
//! # Example
//!
//! ```
//! use partydeck::{Game, GameOptions, Phase};
//!
//! let mut game = Game::new(GameOptions::default().without_pauses(), 42);
//! game.setup_game(&["Ada", "Linus", "Grace"], &[]).unwrap();
//! assert_eq!(game.phase(), Phase::RevealingSecret);
//!
//! for _ in 0..3 {
//!     game.show_secret().unwrap();
//!     game.hide_and_proceed().unwrap();
//! }
//! assert_eq!(game.phase(), Phase::Playing);
//!
//! game.draw_primary().unwrap();
//! assert_eq!(game.phase(), Phase::Decision);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(not(feature = "std"), not(feature = "alloc")))]
compile_error!(
    "`std` is disabled but `alloc` feature is not enabled. Enable `alloc` or keep `std` enabled."
);

extern crate alloc;

pub mod catalog;
pub mod deck;
pub mod error;
pub mod game;
pub mod options;
pub mod player;
pub mod result;
pub mod task;
pub mod tracker;
pub mod voting;

// Re-export main types
pub use catalog::{AVATARS, TaskCatalog};
pub use deck::Deck;
pub use error::{ActionError, EndError, GameError, SetupError, VoteError};
pub use game::{
    Cue, Effect, Event, Game, GameState, PendingKind, PendingTransition, Phase, Transition,
    transition,
};
pub use options::GameOptions;
pub use player::{Player, PlayerId};
pub use result::{GameResult, Standing, VoteTally};
pub use task::{ActiveTask, SecretReveal, Task};
pub use tracker::{
    Achievement, AchievementStatus, Counter, LedgerSnapshot, LedgerStore, MemoryStore, Stat,
    Tracker,
};
pub use voting::{Vote, VotingRound};

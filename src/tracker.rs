//! Achievement and statistics ledger.
//!
//! The tracker only observes the game: it is updated by applying the ledger
//! effects a transition returns and is never consulted to decide one. It
//! outlives individual games and is only reset by building a new one.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::convert::Infallible;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use hashbrown::HashMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::game::Effect;
use crate::player::PlayerId;

/// Unlockable achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Achievement {
    /// Finish a first game.
    FirstGame,
    /// Win a game.
    FirstWin,
    /// Delegate three times in one game.
    DelegatorMaster,
    /// Take on five tasks yourself in one game.
    BraveSoul,
    /// Reach the high score threshold.
    HighScorer,
    /// Earn the delegation bonus.
    BlueMaster,
    /// Complete a delegated task.
    RedMaster,
    /// Draw a penalty task.
    BlackCardVictim,
    /// Start a game with custom tasks.
    CustomTaskAdded,
    /// Win a task by vote.
    VotedTaskWin,
    /// Start a game with a full table.
    FullHouse,
}

impl Achievement {
    /// Every achievement, in display order.
    pub const ALL: [Self; 11] = [
        Self::FirstGame,
        Self::FirstWin,
        Self::DelegatorMaster,
        Self::BraveSoul,
        Self::HighScorer,
        Self::BlueMaster,
        Self::RedMaster,
        Self::BlackCardVictim,
        Self::CustomTaskAdded,
        Self::VotedTaskWin,
        Self::FullHouse,
    ];

    /// Stable key used for persistence.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::FirstGame => "first_game",
            Self::FirstWin => "first_win",
            Self::DelegatorMaster => "delegator_master",
            Self::BraveSoul => "brave_soul",
            Self::HighScorer => "high_scorer",
            Self::BlueMaster => "blue_master",
            Self::RedMaster => "red_master",
            Self::BlackCardVictim => "black_card_victim",
            Self::CustomTaskAdded => "custom_task_added",
            Self::VotedTaskWin => "voted_task_win",
            Self::FullHouse => "full_house",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstGame => "Welcome!",
            Self::FirstWin => "First Victory!",
            Self::DelegatorMaster => "Task Dodger",
            Self::BraveSoul => "Brave Soul",
            Self::HighScorer => "Score Monster",
            Self::BlueMaster => "Secret Expert",
            Self::RedMaster => "Stand-in Star",
            Self::BlackCardVictim => "Bad Luck",
            Self::CustomTaskAdded => "Creative Mind",
            Self::VotedTaskWin => "People's Choice",
            Self::FullHouse => "Full House",
        }
    }

    /// Display description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::FirstGame => "Finish your first game.",
            Self::FirstWin => "Win a game.",
            Self::DelegatorMaster => "Hand a task to someone else 3 times in one game.",
            Self::BraveSoul => "Take on a task yourself 5 times in one game.",
            Self::HighScorer => "Reach 30 points in a game.",
            Self::BlueMaster => "Earn 10 points by handing a task over.",
            Self::RedMaster => "Complete a task someone handed to you.",
            Self::BlackCardVictim => "Draw a penalty card.",
            Self::CustomTaskAdded => "Add your own task to a game.",
            Self::VotedTaskWin => "Complete a task by popular vote.",
            Self::FullHouse => "Start a game with a full table.",
        }
    }

    /// Looks up an achievement by its persistence key.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|achievement| achievement.id() == id)
    }
}

/// Tracked counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stat {
    /// Games that reached the end phase.
    GamesPlayed,
    /// Points awarded across all games.
    TotalScoreAccumulated,
    /// Custom tasks entered at setup.
    CustomTasksAdded,
    /// Primary tasks completed, per player.
    TasksCompleted,
    /// Delegation bonuses earned, per player.
    TasksDelegated,
    /// Games won, per player.
    Wins,
    /// Penalty tasks drawn, per player.
    BlackCardsDrawn,
    /// Votable tasks won, per player.
    VotableTasksWon,
}

impl Stat {
    /// Every counter.
    pub const ALL: [Self; 8] = [
        Self::GamesPlayed,
        Self::TotalScoreAccumulated,
        Self::CustomTasksAdded,
        Self::TasksCompleted,
        Self::TasksDelegated,
        Self::Wins,
        Self::BlackCardsDrawn,
        Self::VotableTasksWon,
    ];

    /// Stable key used for persistence.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::GamesPlayed => "games_played",
            Self::TotalScoreAccumulated => "total_score_accumulated",
            Self::CustomTasksAdded => "custom_tasks_added",
            Self::TasksCompleted => "tasks_completed",
            Self::TasksDelegated => "tasks_delegated",
            Self::Wins => "wins",
            Self::BlackCardsDrawn => "black_cards_drawn",
            Self::VotableTasksWon => "votable_tasks_won",
        }
    }

    /// Returns whether the counter is kept per player.
    #[must_use]
    pub const fn is_per_player(self) -> bool {
        !matches!(
            self,
            Self::GamesPlayed | Self::TotalScoreAccumulated | Self::CustomTasksAdded
        )
    }

    /// Looks up a counter by its persistence key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stat| stat.key() == key)
    }
}

/// Unlock state of one achievement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AchievementStatus {
    /// Whether the achievement has been earned.
    pub unlocked: bool,
    /// Whether the unlock has been shown to the players.
    pub notified: bool,
}

/// Value of one counter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Counter {
    /// A single running total.
    Global(u64),
    /// One running total per player.
    PerPlayer(BTreeMap<PlayerId, u64>),
}

impl Counter {
    /// Returns the global total, or the sum over players.
    #[must_use]
    pub fn total(&self) -> u64 {
        match self {
            Self::Global(value) => *value,
            Self::PerPlayer(values) => values.values().sum(),
        }
    }

    /// Returns the count for one player (zero for global counters).
    #[must_use]
    pub fn for_player(&self, player_id: PlayerId) -> u64 {
        match self {
            Self::Global(_) => 0,
            Self::PerPlayer(values) => values.get(&player_id).copied().unwrap_or(0),
        }
    }
}

/// Key-value view of the ledger used for persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedgerSnapshot {
    /// Achievement id to unlock state.
    pub achievements: BTreeMap<String, AchievementStatus>,
    /// Stat key to counter.
    pub stats: BTreeMap<String, Counter>,
}

/// Somewhere a ledger snapshot can be kept between sessions.
pub trait LedgerStore {
    /// Error produced by the backing storage.
    type Error;

    /// Loads the last saved snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns the storage error if reading fails.
    fn load(&mut self) -> Result<Option<LedgerSnapshot>, Self::Error>;

    /// Replaces the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns the storage error if writing fails.
    fn save(&mut self, snapshot: &LedgerSnapshot) -> Result<(), Self::Error>;
}

/// In-memory [`LedgerStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Option<LedgerSnapshot>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { snapshot: None }
    }
}

impl LedgerStore for MemoryStore {
    type Error = Infallible;

    fn load(&mut self) -> Result<Option<LedgerSnapshot>, Self::Error> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &LedgerSnapshot) -> Result<(), Self::Error> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }
}

/// Process-wide achievement and statistics ledger.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    achievements: HashMap<Achievement, AchievementStatus>,
    stats: HashMap<Stat, Counter>,
    /// Unlocked achievements not yet shown, oldest first.
    pending_notifications: Vec<Achievement>,
}

impl Tracker {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlocks an achievement.
    ///
    /// Returns `true` if it was newly unlocked; unlocking twice is a no-op.
    pub fn unlock(&mut self, achievement: Achievement) -> bool {
        let status = self.achievements.entry(achievement).or_default();
        if status.unlocked {
            return false;
        }

        status.unlocked = true;
        status.notified = false;
        self.pending_notifications.push(achievement);
        tracing::info!(achievement = achievement.id(), "achievement unlocked");
        true
    }

    /// Returns whether an achievement has been unlocked.
    #[must_use]
    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.status(achievement).unlocked
    }

    /// Returns the unlock state of an achievement.
    #[must_use]
    pub fn status(&self, achievement: Achievement) -> AchievementStatus {
        self.achievements
            .get(&achievement)
            .copied()
            .unwrap_or_default()
    }

    /// Returns unlocked achievements that have not been shown yet, oldest first.
    #[must_use]
    pub fn pending_notifications(&self) -> &[Achievement] {
        &self.pending_notifications
    }

    /// Marks an unlock as shown and removes it from the notification queue.
    pub fn mark_notified(&mut self, achievement: Achievement) {
        if let Some(status) = self.achievements.get_mut(&achievement) {
            status.notified = true;
        }
        self.pending_notifications.retain(|&id| id != achievement);
    }

    /// Adds `delta` to a counter, creating it on first use.
    ///
    /// Per-player counters need a `player_id` and global counters must not
    /// get one; mismatched records are dropped.
    pub fn record_stat(&mut self, stat: Stat, delta: u64, player_id: Option<PlayerId>) {
        match (stat.is_per_player(), player_id) {
            (false, None) => {
                let counter = self.stats.entry(stat).or_insert(Counter::Global(0));
                if let Counter::Global(value) = counter {
                    *value = value.saturating_add(delta);
                }
            }
            (true, Some(player_id)) => {
                let counter = self
                    .stats
                    .entry(stat)
                    .or_insert_with(|| Counter::PerPlayer(BTreeMap::new()));
                if let Counter::PerPlayer(values) = counter {
                    let value = values.entry(player_id).or_insert(0);
                    *value = value.saturating_add(delta);
                }
            }
            _ => {
                tracing::warn!(stat = stat.key(), ?player_id, "stat record has the wrong shape");
            }
        }
    }

    /// Returns a counter, if it has been recorded at least once.
    #[must_use]
    pub fn stat(&self, stat: Stat) -> Option<&Counter> {
        self.stats.get(&stat)
    }

    /// Returns a global counter, or the sum of a per-player counter.
    #[must_use]
    pub fn total(&self, stat: Stat) -> u64 {
        self.stat(stat).map_or(0, Counter::total)
    }

    /// Returns one player's count for a per-player counter.
    #[must_use]
    pub fn player_stat(&self, stat: Stat, player_id: PlayerId) -> u64 {
        self.stat(stat)
            .map_or(0, |counter| counter.for_player(player_id))
    }

    /// Applies a ledger effect. Presentation effects are ignored.
    pub fn apply(&mut self, effect: &Effect) {
        match *effect {
            Effect::Unlock(achievement) => {
                self.unlock(achievement);
            }
            Effect::RecordStat {
                stat,
                delta,
                player_id,
            } => self.record_stat(stat, delta, player_id),
            Effect::PhaseChanged { .. } | Effect::Cue(_) => {}
        }
    }

    /// Exports the ledger as a key-value snapshot.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            achievements: self
                .achievements
                .iter()
                .map(|(achievement, status)| (achievement.id().to_string(), *status))
                .collect(),
            stats: self
                .stats
                .iter()
                .map(|(stat, counter)| (stat.key().to_string(), counter.clone()))
                .collect(),
        }
    }

    /// Replaces the ledger with a snapshot.
    ///
    /// Unknown keys and counters of the wrong shape are skipped. Unlocked
    /// achievements that were never shown are queued for notification again.
    pub fn restore(&mut self, snapshot: &LedgerSnapshot) {
        self.achievements.clear();
        self.stats.clear();
        self.pending_notifications.clear();

        for (id, status) in &snapshot.achievements {
            let Some(achievement) = Achievement::from_id(id) else {
                tracing::warn!(id = id.as_str(), "skipping unknown achievement");
                continue;
            };
            self.achievements.insert(achievement, *status);
        }

        // Queue in display order so restores are deterministic.
        for achievement in Achievement::ALL {
            let status = self.status(achievement);
            if status.unlocked && !status.notified {
                self.pending_notifications.push(achievement);
            }
        }

        for (key, counter) in &snapshot.stats {
            let Some(stat) = Stat::from_key(key) else {
                tracing::warn!(key = key.as_str(), "skipping unknown stat");
                continue;
            };
            let shape_matches = matches!(
                (stat.is_per_player(), counter),
                (false, Counter::Global(_)) | (true, Counter::PerPlayer(_))
            );
            if !shape_matches {
                tracing::warn!(key = key.as_str(), "skipping stat with the wrong shape");
                continue;
            }
            self.stats.insert(stat, counter.clone());
        }
    }
}

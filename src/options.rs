//! Game configuration options.

use core::time::Duration;

/// Rules and presentation pauses for a game.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use partydeck::GameOptions;
///
/// let options = GameOptions::default()
///     .with_target_score(30)
///     .with_max_players(8)
///     .without_pauses();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOptions {
    /// Score that ends the game.
    pub target_score: u32,
    /// Points for completing a primary task.
    pub self_task_points: u32,
    /// Points for the delegator after completing the delegate's secret task.
    pub delegation_bonus_points: u32,
    /// Maximum number of seated players.
    pub max_players: usize,
    /// Maximum number of custom tasks entered at setup.
    pub max_custom_tasks: usize,
    /// Player names are truncated to this many characters.
    pub max_name_len: usize,
    /// Score that unlocks the high scorer achievement.
    pub high_score_threshold: u32,
    /// Player count that unlocks the full house achievement.
    pub full_house_players: usize,
    /// Self-accepted tasks in one game that unlock the brave soul achievement.
    pub brave_soul_accepts: u32,
    /// Delegations in one game that unlock the delegator master achievement.
    pub delegator_master_delegations: u32,
    /// Pause after the last ballot before the vote result is applied.
    pub vote_result_pause: Duration,
    /// Pause before entering the end phase and before choosing the penalty target.
    pub end_game_pause: Duration,
    /// Pause after a new secret card is closed before the turn passes.
    pub card_close_pause: Duration,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            target_score: 20,
            self_task_points: 5,
            delegation_bonus_points: 10,
            max_players: 6,
            max_custom_tasks: 5,
            max_name_len: 12,
            high_score_threshold: 30,
            full_house_players: 6,
            brave_soul_accepts: 5,
            delegator_master_delegations: 3,
            vote_result_pause: Duration::from_millis(1500),
            end_game_pause: Duration::from_millis(2000),
            card_close_pause: Duration::from_millis(500),
        }
    }
}

impl GameOptions {
    /// Sets the score that ends the game.
    ///
    /// # Example
    ///
    /// ```
    /// use partydeck::GameOptions;
    ///
    /// let options = GameOptions::default().with_target_score(15);
    /// assert_eq!(options.target_score, 15);
    /// ```
    #[must_use]
    pub const fn with_target_score(mut self, score: u32) -> Self {
        self.target_score = score;
        self
    }

    /// Sets the points for completing a primary task.
    #[must_use]
    pub const fn with_self_task_points(mut self, points: u32) -> Self {
        self.self_task_points = points;
        self
    }

    /// Sets the delegator's bonus for completing a secret task.
    #[must_use]
    pub const fn with_delegation_bonus_points(mut self, points: u32) -> Self {
        self.delegation_bonus_points = points;
        self
    }

    /// Sets the maximum number of players.
    ///
    /// # Example
    ///
    /// ```
    /// use partydeck::GameOptions;
    ///
    /// let options = GameOptions::default().with_max_players(8);
    /// assert_eq!(options.max_players, 8);
    /// ```
    #[must_use]
    pub const fn with_max_players(mut self, players: usize) -> Self {
        self.max_players = players;
        self
    }

    /// Sets the maximum number of custom tasks.
    #[must_use]
    pub const fn with_max_custom_tasks(mut self, tasks: usize) -> Self {
        self.max_custom_tasks = tasks;
        self
    }

    /// Sets the maximum player name length in characters.
    #[must_use]
    pub const fn with_max_name_len(mut self, len: usize) -> Self {
        self.max_name_len = len;
        self
    }

    /// Sets the pause applied after the last ballot.
    #[must_use]
    pub const fn with_vote_result_pause(mut self, pause: Duration) -> Self {
        self.vote_result_pause = pause;
        self
    }

    /// Sets the pause applied around the end of the game.
    #[must_use]
    pub const fn with_end_game_pause(mut self, pause: Duration) -> Self {
        self.end_game_pause = pause;
        self
    }

    /// Sets the pause applied after a new secret card is closed.
    #[must_use]
    pub const fn with_card_close_pause(mut self, pause: Duration) -> Self {
        self.card_close_pause = pause;
        self
    }

    /// Disables every presentation pause.
    ///
    /// Pending transitions are then applied inside the dispatch that
    /// scheduled them.
    ///
    /// # Example
    ///
    /// ```
    /// use core::time::Duration;
    /// use partydeck::GameOptions;
    ///
    /// let options = GameOptions::default().without_pauses();
    /// assert_eq!(options.vote_result_pause, Duration::ZERO);
    /// assert_eq!(options.end_game_pause, Duration::ZERO);
    /// assert_eq!(options.card_close_pause, Duration::ZERO);
    /// ```
    #[must_use]
    pub const fn without_pauses(self) -> Self {
        self.with_vote_result_pause(Duration::ZERO)
            .with_end_game_pause(Duration::ZERO)
            .with_card_close_pause(Duration::ZERO)
    }
}

//! Game engine and state transitions.

use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::catalog::TaskCatalog;
use crate::error::GameError;
use crate::options::GameOptions;
use crate::player::{Player, PlayerId};
use crate::result::GameResult;
use crate::tracker::{Achievement, LedgerSnapshot, LedgerStore, Stat, Tracker};
use crate::voting::Vote;

mod ending;
mod event;
mod setup;
pub mod state;
mod turn;
mod vote;

pub use event::{Cue, Effect, Event, Transition};
pub use state::{GameState, PendingKind, PendingTransition, Phase};

/// Applies one event to a state.
///
/// The input state is never modified. On success the new state is returned
/// together with the effects the caller should execute, in order. A paused
/// step is returned as [`GameState::pending`]; when its pause is zero it is
/// applied within this call instead.
///
/// # Errors
///
/// Returns an error if the event is not allowed in the current phase or its
/// guard fails.
///
/// # Example
///
/// ```
/// use partydeck::{transition, Event, GameOptions, GameState, Phase, TaskCatalog};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let options = GameOptions::default();
/// let catalog = TaskCatalog::default();
///
/// let setup = Event::SetupGame {
///     names: vec!["Ada".into(), "Linus".into()],
///     custom_tasks: Vec::new(),
/// };
/// let step = transition(&GameState::new(), &setup, &options, &catalog, &mut rng).unwrap();
/// assert_eq!(step.state.phase, Phase::RevealingSecret);
/// ```
pub fn transition<R: Rng + ?Sized>(
    state: &GameState,
    event: &Event,
    options: &GameOptions,
    catalog: &TaskCatalog,
    rng: &mut R,
) -> Result<Transition, GameError> {
    let from = state.phase;
    let mut step = Step {
        state: state.clone(),
        options,
        catalog,
        rng,
        effects: Vec::new(),
    };

    if let Err(err) = step.apply(event) {
        tracing::warn!(event = event.name(), phase = ?from, %err, "event rejected");
        return Err(err);
    }

    tracing::debug!(
        event = event.name(),
        ?from,
        to = ?step.state.phase,
        pending = ?step.state.pending.map(|pending| pending.kind),
        "transition applied"
    );

    Ok(Transition {
        state: step.state,
        effects: step.effects,
    })
}

/// Working copy of a state while one event is applied.
struct Step<'a, R: Rng + ?Sized> {
    state: GameState,
    options: &'a GameOptions,
    catalog: &'a TaskCatalog,
    rng: &'a mut R,
    effects: Vec<Effect>,
}

impl<R: Rng + ?Sized> Step<'_, R> {
    fn apply(&mut self, event: &Event) -> Result<(), GameError> {
        let allowed_while_pending = matches!(
            event,
            Event::Advance | Event::Restart | Event::ReplaySamePlayers
        );
        if self.state.pending.is_some() && !allowed_while_pending {
            return Err(GameError::Pending);
        }

        match event {
            Event::SetupGame {
                names,
                custom_tasks,
            } => self.setup_game(names, custom_tasks)?,
            Event::ShowSecret => self.show_secret()?,
            Event::HideAndProceed => self.hide_and_proceed()?,
            Event::DrawPrimary => self.draw_primary()?,
            Event::AcceptSelf => self.accept_self()?,
            Event::StartDelegation => self.start_delegation()?,
            Event::SelectDelegate { player_id } => self.select_delegate(*player_id)?,
            Event::Cancel => self.cancel()?,
            Event::DelegatorCompletesSecret => self.delegator_completes_secret()?,
            Event::DelegateCompletesPrimary => self.delegate_completes_primary()?,
            Event::ConfirmClose => self.confirm_close()?,
            Event::CastVote { voter_id, vote } => self.cast_vote(*voter_id, *vote)?,
            Event::EndGameCheck => self.end_game_check()?,
            Event::AssignPenalty => self.assign_penalty()?,
            Event::Restart => self.restart(),
            Event::ReplaySamePlayers => self.replay_same_players()?,
            Event::Advance => self.advance()?,
        }

        Ok(())
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.state.phase;
        if from != to {
            self.state.phase = to;
            self.effects.push(Effect::PhaseChanged { from, to });
        }
    }

    fn cue(&mut self, cue: Cue) {
        self.effects.push(Effect::Cue(cue));
    }

    fn unlock(&mut self, achievement: Achievement) {
        self.effects.push(Effect::Unlock(achievement));
    }

    fn record(&mut self, stat: Stat, delta: u64, player_id: Option<PlayerId>) {
        self.effects.push(Effect::RecordStat {
            stat,
            delta,
            player_id,
        });
    }

    fn current_id(&self) -> Option<PlayerId> {
        self.state.current_player().map(Player::id)
    }

    fn player_name(&self, player_id: PlayerId) -> &str {
        self.state.player(player_id).map_or("", Player::name)
    }

    /// Adds points to a player's score.
    fn award(&mut self, player_id: PlayerId, points: u32) {
        let Some(player) = self.state.player_mut(player_id) else {
            return;
        };
        let score = player.award(points);
        let name = player.name().to_string();

        self.record(Stat::TotalScoreAccumulated, u64::from(points), None);
        self.cue(Cue::ScorePoint);
        if score >= self.options.high_score_threshold {
            self.unlock(Achievement::HighScorer);
        }
        self.state.last_action_message = format!("{name} +{points} points!");
    }

    /// Clears everything that belongs to a single turn.
    fn clear_turn(&mut self) {
        self.state.active_task = None;
        self.state.active_secret_reveal = None;
        self.state.selected_delegate_id = None;
        self.state.voting_round = None;
    }

    /// Passes the phone to the player after the one whose turn it was.
    fn end_turn(&mut self) {
        let count = self.state.players.len();
        self.state.current_player_index = (self.state.current_player_index + 1)
            .checked_rem(count)
            .unwrap_or(0);
        self.clear_turn();
        self.set_phase(Phase::Playing);

        let name = self.state.current_player().map_or("", Player::name);
        self.state.message = format!("{name}, your turn! Draw a task.");
        self.cue(Cue::TurnChange);

        if self.state.target_reached(self.options.target_score) {
            self.schedule(PendingKind::EnterEnding);
        }
    }

    /// Queues a paused step, or runs it now when its pause is zero.
    fn schedule(&mut self, kind: PendingKind) {
        let min_display = match kind {
            PendingKind::ResolveVote => self.options.vote_result_pause,
            PendingKind::EnterEnding | PendingKind::SelectPenaltyTarget => {
                self.options.end_game_pause
            }
            PendingKind::PassTurn => self.options.card_close_pause,
        };

        if min_display.is_zero() {
            self.run_pending(kind);
        } else {
            self.state.pending = Some(PendingTransition { kind, min_display });
        }
    }

    fn advance(&mut self) -> Result<(), GameError> {
        let pending = self.state.pending.take().ok_or(GameError::NothingPending)?;
        self.run_pending(pending.kind);
        Ok(())
    }

    fn run_pending(&mut self, kind: PendingKind) {
        match kind {
            PendingKind::ResolveVote => self.resolve_vote(),
            PendingKind::EnterEnding => self.enter_ending(),
            PendingKind::SelectPenaltyTarget => self.select_penalty_target(),
            PendingKind::PassTurn => self.end_turn(),
        }
    }
}

/// A party game table: the current state, its rules and the ledger.
///
/// Every action goes through [`Game::dispatch`], which applies
/// [`transition`] and feeds the resulting ledger effects into the
/// [`Tracker`]. Rejected actions leave the state as it was, apart from an
/// advisory [`GameState::message`].
#[derive(Debug, Clone)]
pub struct Game {
    options: GameOptions,
    catalog: TaskCatalog,
    state: GameState,
    tracker: Tracker,
    rng: ChaCha8Rng,
}

impl Game {
    /// Creates a table with the built-in tasks and the given seed.
    ///
    /// # Example
    ///
    /// ```
    /// use partydeck::{Game, GameOptions, Phase};
    ///
    /// let game = Game::new(GameOptions::default(), 42);
    /// assert_eq!(game.phase(), Phase::Setup);
    /// ```
    #[must_use]
    pub fn new(options: GameOptions, seed: u64) -> Self {
        Self::with_catalog(options, TaskCatalog::default(), seed)
    }

    /// Creates a table that draws from a custom catalog.
    #[must_use]
    pub fn with_catalog(options: GameOptions, catalog: TaskCatalog, seed: u64) -> Self {
        Self {
            options,
            catalog,
            state: GameState::new(),
            tracker: Tracker::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Applies an event and returns the effects it produced.
    ///
    /// Ledger effects have already been applied to [`Game::tracker`] when
    /// this returns; cues and phase changes are left to the caller.
    ///
    /// # Errors
    ///
    /// Returns the rejection if the event is not allowed now. The error text
    /// is also written to the state's message.
    pub fn dispatch(&mut self, event: Event) -> Result<Vec<Effect>, GameError> {
        match transition(
            &self.state,
            &event,
            &self.options,
            &self.catalog,
            &mut self.rng,
        ) {
            Ok(Transition { state, effects }) => {
                self.state = state;
                for effect in &effects {
                    self.tracker.apply(effect);
                }
                Ok(effects)
            }
            Err(err) => {
                self.state.message = err.to_string();
                Err(err)
            }
        }
    }

    /// Seats the players and deals.
    ///
    /// # Errors
    ///
    /// Returns an error if a game is already running, no names are given, or
    /// a limit is exceeded.
    pub fn setup_game(
        &mut self,
        names: &[&str],
        custom_tasks: &[&str],
    ) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::SetupGame {
            names: names.iter().map(ToString::to_string).collect(),
            custom_tasks: custom_tasks.iter().map(ToString::to_string).collect(),
        })
    }

    /// Shows the revealing player their secret task.
    ///
    /// # Errors
    ///
    /// Returns an error outside the reveal phase or if the player has no secret.
    pub fn show_secret(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::ShowSecret)
    }

    /// Hides the secret and hands the phone to the next player.
    ///
    /// # Errors
    ///
    /// Returns an error outside the reveal phase.
    pub fn hide_and_proceed(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::HideAndProceed)
    }

    /// Draws a primary task for the current player.
    ///
    /// # Errors
    ///
    /// Returns an error outside the playing phase.
    pub fn draw_primary(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::DrawPrimary)
    }

    /// The current player performs the drawn task.
    ///
    /// # Errors
    ///
    /// Returns an error if no visible task is waiting for a decision.
    pub fn accept_self(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::AcceptSelf)
    }

    /// Starts choosing a player to hand the task to.
    ///
    /// # Errors
    ///
    /// Returns an error if no visible task is waiting or nobody can take it.
    pub fn start_delegation(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::StartDelegation)
    }

    /// Hands the task to `player_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the player does not exist, is the current player,
    /// or holds no secret task.
    pub fn select_delegate(&mut self, player_id: PlayerId) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::SelectDelegate { player_id })
    }

    /// Backs out of delegate selection or withdraws an unanswered vote.
    ///
    /// # Errors
    ///
    /// Returns an error in any other phase or once ballots are in.
    pub fn cancel(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::Cancel)
    }

    /// The delegator performed the delegate's secret task.
    ///
    /// # Errors
    ///
    /// Returns an error unless a delegate's secret is on screen.
    pub fn delegator_completes_secret(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::DelegatorCompletesSecret)
    }

    /// The delegate performed the primary task.
    ///
    /// # Errors
    ///
    /// Returns an error unless a delegate is attempting the task.
    pub fn delegate_completes_primary(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::DelegateCompletesPrimary)
    }

    /// The delegate closed their new secret card.
    ///
    /// # Errors
    ///
    /// Returns an error unless a new secret is on screen.
    pub fn confirm_close(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::ConfirmClose)
    }

    /// Casts a ballot in the open vote.
    ///
    /// # Errors
    ///
    /// Returns an error if no vote is open, the voter is the performer, has
    /// no ballot, or has already voted.
    pub fn cast_vote(&mut self, voter_id: PlayerId, vote: Vote) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::CastVote { voter_id, vote })
    }

    /// Ends the game if someone reached the target score.
    ///
    /// # Errors
    ///
    /// Returns an error outside active play or below the target.
    pub fn end_game_check(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::EndGameCheck)
    }

    /// Draws the penalty for the lowest scorer.
    ///
    /// # Errors
    ///
    /// Returns an error unless the penalty target has been chosen.
    pub fn assign_penalty(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::AssignPenalty)
    }

    /// Discards the table and returns to setup. The ledger is kept.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the other actions.
    pub fn restart(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::Restart)
    }

    /// Starts over with the same players, scores reset and decks reshuffled.
    ///
    /// Custom tasks from the last setup stay in the primary deck; call
    /// [`Game::restart`] to enter a new set.
    ///
    /// # Errors
    ///
    /// Returns an error if nobody is seated.
    pub fn replay_same_players(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::ReplaySamePlayers)
    }

    /// Fires the pending transition.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is pending.
    pub fn advance(&mut self) -> Result<Vec<Effect>, GameError> {
        self.dispatch(Event::Advance)
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Returns the seated players.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    /// Returns the player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.state.current_player()
    }

    /// Returns the paused transition, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<PendingTransition> {
        self.state.pending
    }

    /// Returns the game summary once a winner has been decided.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.state.result()
    }

    /// Returns the achievement and statistics ledger.
    #[must_use]
    pub const fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Returns the rules in effect.
    #[must_use]
    pub const fn options(&self) -> &GameOptions {
        &self.options
    }

    /// Marks an achievement unlock as shown.
    pub fn mark_notified(&mut self, achievement: Achievement) {
        self.tracker.mark_notified(achievement);
    }

    /// Writes the ledger to a store.
    ///
    /// # Errors
    ///
    /// Returns the store's error if saving fails.
    pub fn save_ledger<S: LedgerStore>(&self, store: &mut S) -> Result<(), S::Error> {
        store.save(&self.tracker.snapshot())
    }

    /// Replaces the ledger with the one saved in a store.
    ///
    /// Returns `false` if the store was empty and the ledger was left as is.
    ///
    /// # Errors
    ///
    /// Returns the store's error if loading fails.
    pub fn load_ledger<S: LedgerStore>(&mut self, store: &mut S) -> Result<bool, S::Error> {
        let Some(snapshot) = store.load()? else {
            return Ok(false);
        };
        self.restore_ledger(&snapshot);
        Ok(true)
    }

    /// Replaces the ledger with a snapshot.
    pub fn restore_ledger(&mut self, snapshot: &LedgerSnapshot) {
        self.tracker.restore(snapshot);
    }
}

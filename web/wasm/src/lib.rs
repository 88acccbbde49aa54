use std::collections::BTreeMap;

use partydeck::{
    Achievement, AchievementStatus, Counter, Effect, Event, Game, GameOptions, GameState,
    LedgerSnapshot, Player, Vote,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmGame {
    game: Game,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Self {
        Self {
            game: Game::new(GameOptions::default(), u64::from(seed)),
        }
    }

    /// Starts a fresh table, keeping the achievement ledger.
    pub fn reset(&mut self, seed: u32) {
        let ledger = self.game.tracker().snapshot();
        self.game = Game::new(GameOptions::default(), u64::from(seed));
        self.game.restore_ledger(&ledger);
    }

    pub fn setup(&mut self, names: Vec<String>, custom_tasks: Vec<String>) -> Result<JsValue, JsValue> {
        self.apply(Event::SetupGame {
            names,
            custom_tasks,
        })
    }

    /// Applies an action that takes no arguments, by name.
    pub fn action(&mut self, name: &str) -> Result<JsValue, JsValue> {
        let event = match name {
            "show_secret" => Event::ShowSecret,
            "hide_and_proceed" => Event::HideAndProceed,
            "draw_primary" => Event::DrawPrimary,
            "accept_self" => Event::AcceptSelf,
            "start_delegation" => Event::StartDelegation,
            "cancel" => Event::Cancel,
            "delegator_completes_secret" => Event::DelegatorCompletesSecret,
            "delegate_completes_primary" => Event::DelegateCompletesPrimary,
            "confirm_close" => Event::ConfirmClose,
            "end_game_check" => Event::EndGameCheck,
            "assign_penalty" => Event::AssignPenalty,
            "restart" => Event::Restart,
            "replay_same_players" => Event::ReplaySamePlayers,
            "advance" => Event::Advance,
            _ => return Err(JsValue::from_str(&format!("unknown action: {name}"))),
        };
        self.apply(event)
    }

    /// Applies an event given as `{ type, data }`.
    pub fn dispatch(&mut self, event: JsValue) -> Result<JsValue, JsValue> {
        let event: Event = serde_wasm_bindgen::from_value(event)
            .map_err(|err| JsValue::from_str(&format!("unrecognized event: {err}")))?;
        self.apply(event)
    }

    pub fn select_delegate(&mut self, player_id: u8) -> Result<JsValue, JsValue> {
        self.apply(Event::SelectDelegate { player_id })
    }

    pub fn cast_vote(&mut self, voter_id: u8, yes: bool) -> Result<JsValue, JsValue> {
        let vote = if yes { Vote::Yes } else { Vote::No };
        self.apply(Event::CastVote { voter_id, vote })
    }

    /// Milliseconds the current screen should stay up before `advance`.
    pub fn pending_ms(&self) -> Option<u32> {
        self.game
            .pending()
            .map(|pending| u32::try_from(pending.min_display.as_millis()).unwrap_or(u32::MAX))
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let state = self.game.state();
        let snapshot = Snapshot {
            state,
            current_player: self.game.current_player().map(Player::id),
            pending_ms: self.pending_ms(),
            notifications: self
                .game
                .tracker()
                .pending_notifications()
                .iter()
                .copied()
                .map(JsAchievement::from)
                .collect(),
        };

        to_js_value(&snapshot)
    }

    pub fn mark_notified(&mut self, id: &str) -> Result<(), JsValue> {
        let achievement = Achievement::from_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("unknown achievement: {id}")))?;
        self.game.mark_notified(achievement);
        Ok(())
    }

    pub fn achievements(&self) -> Result<JsValue, JsValue> {
        let tracker = self.game.tracker();
        let achievements: Vec<JsAchievementStatus> = Achievement::ALL
            .into_iter()
            .map(|achievement| JsAchievementStatus {
                achievement: JsAchievement::from(achievement),
                unlocked: tracker.is_unlocked(achievement),
            })
            .collect();
        to_js_value(&achievements)
    }

    pub fn export_ledger(&self) -> Result<JsValue, JsValue> {
        to_js_value(&JsLedger::from(self.game.tracker().snapshot()))
    }

    pub fn import_ledger(&mut self, ledger: JsValue) -> Result<(), JsValue> {
        let ledger: JsLedger = serde_wasm_bindgen::from_value(ledger).map_err(js_err)?;
        self.game.restore_ledger(&ledger.into_snapshot()?);
        Ok(())
    }
}

impl WasmGame {
    fn apply(&mut self, event: Event) -> Result<JsValue, JsValue> {
        let effects: Vec<Effect> = self.game.dispatch(event).map_err(js_err)?;
        to_js_value(&effects)
    }
}

#[derive(Serialize)]
struct Snapshot<'a> {
    state: &'a GameState,
    current_player: Option<u8>,
    pending_ms: Option<u32>,
    notifications: Vec<JsAchievement>,
}

#[derive(Serialize)]
struct JsAchievement {
    id: &'static str,
    name: &'static str,
    description: &'static str,
}

impl From<Achievement> for JsAchievement {
    fn from(achievement: Achievement) -> Self {
        Self {
            id: achievement.id(),
            name: achievement.name(),
            description: achievement.description(),
        }
    }
}

#[derive(Serialize)]
struct JsAchievementStatus {
    #[serde(flatten)]
    achievement: JsAchievement,
    unlocked: bool,
}

/// Ledger with string player keys, so it survives `JSON.stringify`.
#[derive(Serialize, Deserialize)]
struct JsLedger {
    achievements: BTreeMap<String, AchievementStatus>,
    stats: BTreeMap<String, JsCounter>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum JsCounter {
    Global(u64),
    PerPlayer(BTreeMap<String, u64>),
}

impl From<LedgerSnapshot> for JsLedger {
    fn from(snapshot: LedgerSnapshot) -> Self {
        let stats = snapshot
            .stats
            .into_iter()
            .map(|(key, counter)| {
                let counter = match counter {
                    Counter::Global(value) => JsCounter::Global(value),
                    Counter::PerPlayer(values) => JsCounter::PerPlayer(
                        values
                            .into_iter()
                            .map(|(player_id, value)| (player_id.to_string(), value))
                            .collect(),
                    ),
                };
                (key, counter)
            })
            .collect();

        Self {
            achievements: snapshot.achievements,
            stats,
        }
    }
}

impl JsLedger {
    fn into_snapshot(self) -> Result<LedgerSnapshot, JsValue> {
        let mut stats = BTreeMap::new();
        for (key, counter) in self.stats {
            let counter = match counter {
                JsCounter::Global(value) => Counter::Global(value),
                JsCounter::PerPlayer(values) => Counter::PerPlayer(
                    values
                        .into_iter()
                        .map(|(player_id, value)| {
                            player_id
                                .parse()
                                .map(|player_id| (player_id, value))
                                .map_err(|_| {
                                    JsValue::from_str(&format!("invalid player id: {player_id}"))
                                })
                        })
                        .collect::<Result<_, _>>()?,
                ),
            };
            stats.insert(key, counter);
        }

        Ok(LedgerSnapshot {
            achievements: self.achievements,
            stats,
        })
    }
}

fn js_err<E: core::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Maps become plain objects so hosts can `JSON.stringify` the result.
fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value.serialize(&serializer).map_err(js_err)
}

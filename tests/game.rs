//! Game integration tests.

use core::time::Duration;
use std::collections::HashSet;

use partydeck::{
    AVATARS, Achievement, ActionError, Cue, Effect, EndError, Event, Game, GameError, GameOptions,
    GameState, PendingKind, Phase, Player, PlayerId, SetupError, Stat, Task, TaskCatalog, Vote,
    VoteError, transition,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn tasks(prefix: &str, count: usize) -> Vec<Task> {
    (0..count)
        .map(|index| Task::plain(&format!("{prefix} {index}")))
        .collect()
}

fn votable_tasks(count: usize) -> Vec<Task> {
    (0..count)
        .map(|index| Task::votable(&format!("dance {index}")))
        .collect()
}

fn catalog(primary: Vec<Task>) -> TaskCatalog {
    TaskCatalog::new(primary, tasks("secret", 10), tasks("penalty", 3))
}

fn quick() -> GameOptions {
    GameOptions::default().without_pauses()
}

/// Sets up a table and walks every player through the secret reveal.
fn seated(options: GameOptions, catalog: TaskCatalog, names: &[&str]) -> Game {
    let mut game = Game::with_catalog(options, catalog, 7);
    game.setup_game(names, &[]).unwrap();
    for _ in names {
        game.show_secret().unwrap();
        game.hide_and_proceed().unwrap();
    }
    assert_eq!(game.phase(), Phase::Playing);
    game
}

fn score(game: &Game, player_id: PlayerId) -> u32 {
    game.state().player(player_id).unwrap().score()
}

fn current(game: &Game) -> PlayerId {
    game.current_player().unwrap().id()
}

fn phase_steps(effects: &[Effect]) -> Vec<Phase> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::PhaseChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}

/// Current player hands the drawn task to `delegate` and both complete their parts.
fn delegate_to(game: &mut Game, delegate: PlayerId) {
    game.draw_primary().unwrap();
    game.start_delegation().unwrap();
    game.select_delegate(delegate).unwrap();
    game.delegator_completes_secret().unwrap();
    game.delegate_completes_primary().unwrap();
    game.confirm_close().unwrap();
}

#[test]
fn setup_seats_players_and_deals_secrets() {
    let mut game = Game::with_catalog(quick(), catalog(tasks("task", 5)), 1);
    let effects = game.setup_game(&["Ada", "Bo", "Cy"], &[]).unwrap();

    assert_eq!(game.phase(), Phase::RevealingSecret);
    assert!(effects.contains(&Effect::PhaseChanged {
        from: Phase::Setup,
        to: Phase::RevealingSecret,
    }));
    assert_eq!(game.players().len(), 3);
    assert!(game.players().iter().all(Player::has_secret));
    assert!(game.players().iter().all(|player| player.score() == 0));
    assert_eq!(game.state().primary_deck.len(), 5);
    assert_eq!(game.state().delegation_deck.len(), 7);
    assert_eq!(game.state().penalty_deck.len(), 3);
    assert_eq!(game.state().message, "Ada, look at your secret card.");
}

#[test]
fn setup_guards() {
    let mut game = Game::new(quick(), 1);
    assert_eq!(
        game.setup_game(&[], &[]).unwrap_err(),
        GameError::Setup(SetupError::NoPlayers)
    );
    assert_eq!(
        game.setup_game(&["a", "b", "c", "d", "e", "f", "g"], &[])
            .unwrap_err(),
        GameError::Setup(SetupError::TooManyPlayers)
    );
    assert_eq!(
        game.setup_game(&["Ada"], &["1", "2", "3", "4", "5", "6"])
            .unwrap_err(),
        GameError::Setup(SetupError::TooManyCustomTasks)
    );
    assert_eq!(game.phase(), Phase::Setup);
    assert!(game.players().is_empty());

    // Blank custom tasks do not count against the limit.
    game.setup_game(&["Ada"], &["1", "2", "3", "4", "5", "  "])
        .unwrap();
    assert_eq!(game.state().custom_tasks.len(), 5);

    let err = game.setup_game(&["Bo"], &[]).unwrap_err();
    assert_eq!(err, GameError::Setup(SetupError::InvalidState));
    assert_eq!(game.state().message, "a game is already in progress");
    assert_eq!(game.phase(), Phase::RevealingSecret);
}

#[test]
fn setup_cleans_up_names() {
    let mut game = Game::new(quick(), 1);
    game.setup_game(&["  Ada  ", "", "Bartholomew-the-Great"], &[])
        .unwrap();

    let names: Vec<&str> = game.players().iter().map(Player::name).collect();
    assert_eq!(names, ["Ada", "Player 2", "Bartholomew-"]);
}

#[test]
fn full_table_gets_unique_avatars() {
    let mut game = Game::new(quick(), 5);
    game.setup_game(&["a", "b", "c", "d", "e", "f"], &[]).unwrap();

    let avatars: HashSet<&str> = game.players().iter().map(Player::avatar).collect();
    assert_eq!(avatars.len(), 6);
    assert!(avatars.iter().all(|avatar| AVATARS.contains(avatar)));
    assert!(game.tracker().is_unlocked(Achievement::FullHouse));

    let mut small = Game::new(quick(), 5);
    small.setup_game(&["a", "b", "c", "d", "e"], &[]).unwrap();
    assert!(!small.tracker().is_unlocked(Achievement::FullHouse));
}

#[test]
fn custom_tasks_join_the_primary_deck() {
    let mut game = Game::with_catalog(quick(), catalog(Vec::new()), 1);
    game.setup_game(&["Ada"], &["  Sing a song  ", " "]).unwrap();

    let custom = &game.state().custom_tasks;
    assert_eq!(custom.len(), 1);
    assert_eq!(custom[0].id, "custom_0");
    assert_eq!(custom[0].text, "Sing a song");
    assert!(game.tracker().is_unlocked(Achievement::CustomTaskAdded));
    assert_eq!(game.tracker().total(Stat::CustomTasksAdded), 1);

    game.show_secret().unwrap();
    game.hide_and_proceed().unwrap();
    game.draw_primary().unwrap();

    let active = game.state().active_task.as_ref().unwrap();
    assert!(active.visible);
    assert!(active.task.is_custom);
    assert_eq!(active.task.text, "Sing a song");
}

#[test]
fn secret_reveal_walks_every_player() {
    let options = quick();
    let catalog = TaskCatalog::new(tasks("task", 5), tasks("secret", 1), tasks("penalty", 1));
    let mut game = Game::with_catalog(options, catalog, 1);
    game.setup_game(&["Ada", "Bo"], &[]).unwrap();

    game.show_secret().unwrap();
    let reveal = game.state().active_secret_reveal.clone().unwrap();
    assert_eq!(reveal.for_player_id, 0);
    assert_eq!(reveal.text, "secret 0");
    assert!(reveal.visible);

    game.hide_and_proceed().unwrap();
    assert!(game.state().active_secret_reveal.is_none());
    assert_eq!(game.state().revealing_player_index, 1);
    assert_eq!(game.phase(), Phase::RevealingSecret);

    // The delegation deck ran out before Bo was dealt.
    assert_eq!(
        game.show_secret().unwrap_err(),
        GameError::Action(ActionError::NoSecret)
    );
    let effects = game.hide_and_proceed().unwrap();
    assert_eq!(phase_steps(&effects), [Phase::Playing]);
    assert_eq!(current(&game), 0);
    assert_eq!(game.state().message, "Ada, your turn! Draw a task.");
}

#[test]
fn accept_self_scores_and_passes_turn() {
    let mut game = seated(quick(), catalog(tasks("task", 10)), &["Ada", "Bo", "Cy"]);

    let effects = game.draw_primary().unwrap();
    assert_eq!(game.phase(), Phase::Decision);
    assert!(effects.contains(&Effect::Cue(Cue::CardDraw)));
    assert!(game.state().active_task.as_ref().unwrap().visible);

    let effects = game.accept_self().unwrap();
    assert_eq!(phase_steps(&effects), [Phase::Playing]);
    assert!(effects.contains(&Effect::Cue(Cue::ScorePoint)));
    assert!(effects.contains(&Effect::Cue(Cue::TurnChange)));
    assert_eq!(score(&game, 0), 5);
    assert_eq!(current(&game), 1);
    assert!(game.state().active_task.is_none());
    assert_eq!(game.state().last_action_message, "Ada +5 points!");
    assert_eq!(game.state().message, "Bo, your turn! Draw a task.");

    assert_eq!(game.tracker().total(Stat::TotalScoreAccumulated), 5);
    assert_eq!(game.tracker().player_stat(Stat::TasksCompleted, 0), 1);
}

#[test]
fn actions_out_of_phase_are_rejected() {
    let mut game = seated(quick(), catalog(tasks("task", 10)), &["Ada", "Bo"]);

    assert_eq!(
        game.accept_self().unwrap_err(),
        GameError::Action(ActionError::InvalidState)
    );
    assert_eq!(
        game.confirm_close().unwrap_err(),
        GameError::Action(ActionError::InvalidState)
    );
    assert_eq!(
        game.cancel().unwrap_err(),
        GameError::Action(ActionError::InvalidState)
    );
    assert_eq!(
        game.cast_vote(1, Vote::Yes).unwrap_err(),
        GameError::Vote(VoteError::InvalidState)
    );
    assert_eq!(
        game.assign_penalty().unwrap_err(),
        GameError::End(EndError::InvalidState)
    );
    assert_eq!(
        game.advance().unwrap_err(),
        GameError::NothingPending
    );
    assert_eq!(game.phase(), Phase::Playing);
}

#[test]
fn hidden_task_cannot_be_accepted() {
    let options = quick();
    let catalog = catalog(tasks("task", 3));
    let mut game = seated(options, catalog.clone(), &["Ada", "Bo"]);
    game.draw_primary().unwrap();

    let mut state = game.state().clone();
    state.active_task.as_mut().unwrap().visible = false;
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let err = transition(&state, &Event::AcceptSelf, &options, &catalog, &mut rng).unwrap_err();
    assert_eq!(err, GameError::Action(ActionError::TaskHidden));
}

#[test]
fn delegation_round_trip() {
    let mut game = seated(quick(), catalog(tasks("task", 10)), &["Ada", "Bo", "Cy"]);
    game.draw_primary().unwrap();

    let effects = game.start_delegation().unwrap();
    assert_eq!(phase_steps(&effects), [Phase::SelectingDelegate]);

    assert_eq!(
        game.select_delegate(0).unwrap_err(),
        GameError::Action(ActionError::CannotDelegateToSelf)
    );
    assert_eq!(
        game.select_delegate(9).unwrap_err(),
        GameError::Action(ActionError::PlayerNotFound)
    );
    assert_eq!(game.phase(), Phase::SelectingDelegate);

    let bo_secret = game.state().player(1).unwrap().secret_task().unwrap().to_string();
    game.select_delegate(1).unwrap();
    assert_eq!(game.phase(), Phase::RevealingSecretForDelegate);
    assert_eq!(game.state().selected_delegate_id, Some(1));
    let reveal = game.state().active_secret_reveal.clone().unwrap();
    assert_eq!(reveal.for_player_id, 1);
    assert_eq!(reveal.text, bo_secret);
    assert!(!game.state().active_task.as_ref().unwrap().visible);

    game.delegator_completes_secret().unwrap();
    assert_eq!(game.phase(), Phase::DelegateAttemptingTask);
    assert_eq!(score(&game, 0), 10);
    assert!(game.state().active_task.as_ref().unwrap().visible);
    assert!(game.state().active_secret_reveal.is_none());

    game.delegate_completes_primary().unwrap();
    assert_eq!(game.phase(), Phase::ConfirmingNewSecret);
    assert_eq!(score(&game, 1), 5);
    let new_secret = game.state().active_secret_reveal.clone().unwrap();
    assert_eq!(new_secret.for_player_id, 1);
    assert_eq!(
        game.state().player(1).unwrap().secret_task(),
        Some(new_secret.text.as_str())
    );
    assert_ne!(new_secret.text, bo_secret);

    game.confirm_close().unwrap();
    assert_eq!(game.phase(), Phase::Playing);
    // The turn passes on from the delegator, not the delegate.
    assert_eq!(current(&game), 1);
    assert!(game.state().selected_delegate_id.is_none());
    assert!(game.state().active_secret_reveal.is_none());

    let tracker = game.tracker();
    assert!(tracker.is_unlocked(Achievement::BlueMaster));
    assert!(tracker.is_unlocked(Achievement::RedMaster));
    assert_eq!(tracker.player_stat(Stat::TasksDelegated, 0), 1);
    assert_eq!(tracker.player_stat(Stat::TasksCompleted, 1), 1);
    assert_eq!(tracker.total(Stat::TotalScoreAccumulated), 15);
}

#[test]
fn cancel_delegate_selection() {
    let mut game = seated(quick(), catalog(tasks("task", 10)), &["Ada", "Bo"]);
    game.draw_primary().unwrap();
    game.start_delegation().unwrap();

    let effects = game.cancel().unwrap();
    assert_eq!(phase_steps(&effects), [Phase::Decision]);
    assert!(game.state().active_task.as_ref().unwrap().visible);

    game.accept_self().unwrap();
    assert_eq!(score(&game, 0), 5);
}

#[test]
fn delegation_needs_someone_with_a_secret() {
    let catalog = TaskCatalog::new(tasks("task", 5), tasks("secret", 1), tasks("penalty", 1));
    let mut game = Game::with_catalog(quick(), catalog, 1);
    game.setup_game(&["Ada", "Bo"], &[]).unwrap();
    game.hide_and_proceed().unwrap();
    game.hide_and_proceed().unwrap();

    game.draw_primary().unwrap();
    assert_eq!(
        game.start_delegation().unwrap_err(),
        GameError::Action(ActionError::NoDelegateAvailable)
    );
    assert_eq!(game.phase(), Phase::Decision);
}

#[test]
fn delegate_without_secret_is_rejected() {
    let catalog = TaskCatalog::new(tasks("task", 5), tasks("secret", 2), tasks("penalty", 1));
    let mut game = Game::with_catalog(quick(), catalog, 1);
    game.setup_game(&["Ada", "Bo", "Cy"], &[]).unwrap();
    for _ in 0..3 {
        game.hide_and_proceed().unwrap();
    }
    assert!(!game.state().player(2).unwrap().has_secret());

    game.draw_primary().unwrap();
    game.start_delegation().unwrap();
    assert_eq!(
        game.select_delegate(2).unwrap_err(),
        GameError::Action(ActionError::NoSecret)
    );
}

#[test]
fn empty_secret_deck_passes_turn_after_delegate_success() {
    let catalog = TaskCatalog::new(tasks("task", 5), tasks("secret", 2), tasks("penalty", 1));
    let mut game = seated(quick(), catalog, &["Ada", "Bo"]);
    assert!(game.state().delegation_deck.is_empty());

    game.draw_primary().unwrap();
    game.start_delegation().unwrap();
    game.select_delegate(1).unwrap();
    game.delegator_completes_secret().unwrap();
    game.delegate_completes_primary().unwrap();

    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(current(&game), 1);
    assert_eq!(score(&game, 1), 5);
    assert!(!game.state().player(1).unwrap().has_secret());
    assert!(game.state().message.starts_with("The secret deck is empty!"));
}

#[test]
fn empty_primary_deck_skips_the_turn() {
    let mut game = seated(quick(), catalog(Vec::new()), &["Ada", "Bo"]);

    let effects = game.draw_primary().unwrap();
    assert!(effects.contains(&Effect::Cue(Cue::Error)));
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(current(&game), 1);
    assert!(game.state().active_task.is_none());
    assert!(game.state().message.starts_with("The task deck is empty!"));

    game.draw_primary().unwrap();
    assert_eq!(current(&game), 0);
    assert!(game.state().primary_deck.is_empty());
}

#[test]
fn votable_task_goes_to_the_table() {
    let mut game = seated(quick(), catalog(votable_tasks(10)), &["Ada", "Bo", "Cy"]);
    game.draw_primary().unwrap();

    let effects = game.accept_self().unwrap();
    assert_eq!(phase_steps(&effects), [Phase::Voting]);
    assert!(effects.contains(&Effect::Cue(Cue::VotingStart)));
    assert!(game.state().active_task.is_none());
    let round = game.state().voting_round.clone().unwrap();
    assert_eq!(round.performer_id(), 0);
    assert_eq!(round.eligible_count(), 2);
    assert!(!round.is_delegated());

    assert_eq!(
        game.cast_vote(0, Vote::Yes).unwrap_err(),
        GameError::Vote(VoteError::SelfVote)
    );
    game.cast_vote(1, Vote::Yes).unwrap();
    assert_eq!(game.phase(), Phase::Voting);
    assert_eq!(game.state().message, "1/2 votes in, waiting for 1.");
    assert_eq!(
        game.cast_vote(1, Vote::No).unwrap_err(),
        GameError::Vote(VoteError::AlreadyVoted)
    );
    assert_eq!(
        game.cast_vote(7, Vote::No).unwrap_err(),
        GameError::Vote(VoteError::VoterNotFound)
    );

    // A tie passes.
    game.cast_vote(2, Vote::No).unwrap();
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(score(&game, 0), 5);
    assert_eq!(current(&game), 1);
    assert!(game.state().voting_round.is_none());
    assert!(game.state().last_action_message.contains("1 yes / 1 no"));

    game.draw_primary().unwrap();
    game.accept_self().unwrap();
    game.cast_vote(0, Vote::No).unwrap();
    game.cast_vote(2, Vote::No).unwrap();
    assert_eq!(score(&game, 1), 0);
    assert_eq!(current(&game), 2);

    let tracker = game.tracker();
    assert!(tracker.is_unlocked(Achievement::VotedTaskWin));
    assert_eq!(tracker.player_stat(Stat::VotableTasksWon, 0), 1);
    assert_eq!(tracker.player_stat(Stat::VotableTasksWon, 1), 0);
    assert_eq!(tracker.total(Stat::TasksCompleted), 1);
}

#[test]
fn delegated_vote_success_draws_a_new_secret() {
    let mut game = seated(quick(), catalog(votable_tasks(10)), &["Ada", "Bo"]);
    game.draw_primary().unwrap();
    game.start_delegation().unwrap();
    game.select_delegate(1).unwrap();
    game.delegator_completes_secret().unwrap();

    game.delegate_completes_primary().unwrap();
    assert_eq!(game.phase(), Phase::Voting);
    let round = game.state().voting_round.clone().unwrap();
    assert_eq!(round.performer_id(), 1);
    assert!(round.is_delegated());
    assert_eq!(
        game.cast_vote(1, Vote::Yes).unwrap_err(),
        GameError::Vote(VoteError::SelfVote)
    );

    game.cast_vote(0, Vote::Yes).unwrap();
    assert_eq!(game.phase(), Phase::ConfirmingNewSecret);
    assert_eq!(score(&game, 0), 10);
    assert_eq!(score(&game, 1), 5);
    assert!(game.tracker().is_unlocked(Achievement::RedMaster));

    game.confirm_close().unwrap();
    assert_eq!(current(&game), 1);
}

#[test]
fn vote_can_be_withdrawn_until_someone_votes() {
    let mut game = seated(quick(), catalog(votable_tasks(10)), &["Ada", "Bo", "Cy"]);
    game.draw_primary().unwrap();
    game.accept_self().unwrap();

    let effects = game.cancel().unwrap();
    assert_eq!(phase_steps(&effects), [Phase::Decision]);
    assert!(game.state().voting_round.is_none());
    assert!(game.state().active_task.as_ref().unwrap().visible);

    game.accept_self().unwrap();
    game.cast_vote(1, Vote::Yes).unwrap();
    assert_eq!(
        game.cancel().unwrap_err(),
        GameError::Vote(VoteError::BallotsCast)
    );
    assert_eq!(game.phase(), Phase::Voting);
}

#[test]
fn withdrawn_votes_do_not_count_as_accepted_tasks() {
    let mut game = seated(quick(), catalog(votable_tasks(10)), &["Ada", "Bo", "Cy"]);
    game.draw_primary().unwrap();

    for _ in 0..5 {
        game.accept_self().unwrap();
        game.cancel().unwrap();
    }
    assert_eq!(game.phase(), Phase::Decision);
    assert_eq!(game.players()[0].self_accepts(), 0);
    assert_eq!(score(&game, 0), 0);
    assert!(!game.tracker().is_unlocked(Achievement::BraveSoul));

    game.accept_self().unwrap();
    game.cast_vote(1, Vote::No).unwrap();
    game.cast_vote(2, Vote::No).unwrap();
    assert_eq!(game.players()[0].self_accepts(), 1);
}

#[test]
fn two_of_three_votes_carry_the_task() {
    let mut game = seated(
        quick(),
        catalog(votable_tasks(10)),
        &["Ada", "Bo", "Cy", "Di"],
    );
    game.draw_primary().unwrap();
    game.accept_self().unwrap();
    assert_eq!(game.state().voting_round.as_ref().unwrap().eligible_count(), 3);

    game.cast_vote(1, Vote::Yes).unwrap();
    game.cast_vote(3, Vote::No).unwrap();
    assert_eq!(game.phase(), Phase::Voting);
    assert_eq!(game.state().message, "2/3 votes in, waiting for 1.");

    game.cast_vote(2, Vote::Yes).unwrap();
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(score(&game, 0), 5);
    assert_eq!(current(&game), 1);
    assert!(game.state().voting_round.is_none());
    assert!(game.state().last_action_message.contains("2 yes / 1 no"));
    assert_eq!(game.tracker().player_stat(Stat::VotableTasksWon, 0), 1);
}

#[test]
fn withdrawn_delegated_vote_returns_to_the_delegate() {
    let mut game = seated(quick(), catalog(votable_tasks(10)), &["Ada", "Bo"]);
    game.draw_primary().unwrap();
    game.start_delegation().unwrap();
    game.select_delegate(1).unwrap();
    game.delegator_completes_secret().unwrap();
    game.delegate_completes_primary().unwrap();

    game.cancel().unwrap();
    assert_eq!(game.phase(), Phase::DelegateAttemptingTask);
    assert_eq!(game.state().selected_delegate_id, Some(1));
}

#[test]
fn vote_without_voters_fails() {
    let mut game = seated(quick(), catalog(votable_tasks(3)), &["Solo"]);
    game.draw_primary().unwrap();

    let effects = game.accept_self().unwrap();
    assert_eq!(phase_steps(&effects), [Phase::Voting, Phase::Playing]);
    assert_eq!(score(&game, 0), 0);
    assert_eq!(current(&game), 0);
}

#[test]
fn vote_result_waits_for_advance() {
    let options = GameOptions::default();
    let mut game = seated(options, catalog(votable_tasks(10)), &["Ada", "Bo", "Cy"]);
    game.draw_primary().unwrap();
    game.accept_self().unwrap();
    game.cast_vote(1, Vote::Yes).unwrap();
    game.cast_vote(2, Vote::Yes).unwrap();

    let pending = game.pending().unwrap();
    assert_eq!(pending.kind, PendingKind::ResolveVote);
    assert_eq!(pending.min_display, Duration::from_millis(1500));
    assert_eq!(game.phase(), Phase::Voting);
    assert_eq!(score(&game, 0), 0);

    assert_eq!(game.draw_primary().unwrap_err(), GameError::Pending);
    assert_eq!(
        game.cast_vote(1, Vote::No).unwrap_err(),
        GameError::Pending
    );
    assert_eq!(game.cancel().unwrap_err(), GameError::Pending);

    game.advance().unwrap();
    assert!(game.pending().is_none());
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(score(&game, 0), 5);
    assert_eq!(game.advance().unwrap_err(), GameError::NothingPending);
}

#[test]
fn closing_a_new_secret_waits_for_advance() {
    let options = GameOptions::default();
    let mut game = seated(options, catalog(tasks("task", 10)), &["Ada", "Bo"]);
    game.draw_primary().unwrap();
    game.start_delegation().unwrap();
    game.select_delegate(1).unwrap();
    game.delegator_completes_secret().unwrap();
    game.delegate_completes_primary().unwrap();

    game.confirm_close().unwrap();
    assert_eq!(game.phase(), Phase::ConfirmingNewSecret);
    assert_eq!(game.pending().unwrap().kind, PendingKind::PassTurn);
    assert!(!game.state().active_secret_reveal.as_ref().unwrap().visible);
    assert_eq!(game.state().message, "Card closed.");

    game.advance().unwrap();
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(current(&game), 1);
}

#[test]
fn reaching_the_target_ends_the_game() {
    let options = quick().with_target_score(5);
    let mut game = seated(options, catalog(tasks("task", 10)), &["Ada", "Bo", "Cy"]);
    game.draw_primary().unwrap();

    let effects = game.accept_self().unwrap();
    assert_eq!(
        phase_steps(&effects),
        [Phase::Playing, Phase::Ending, Phase::AssigningPenalty]
    );
    assert!(effects.contains(&Effect::Cue(Cue::GameEnd)));
    assert_eq!(game.state().winner_id, Some(0));
    // Bo and Cy tie on zero; the lower seat draws.
    assert_eq!(game.state().penalty_target_id, Some(1));

    game.assign_penalty().unwrap();
    assert_eq!(game.phase(), Phase::Ended);
    let penalty = game.state().penalty_task.clone().unwrap();
    assert!(penalty.text.starts_with("penalty"));

    let result = game.result().unwrap();
    assert_eq!(result.winner_id, 0);
    assert_eq!(result.penalty_target_id, 1);
    assert_eq!(result.penalty_task, Some(penalty));
    let scores: Vec<u32> = result.standings.iter().map(|standing| standing.score).collect();
    assert_eq!(scores, [5, 0, 0]);

    let tracker = game.tracker();
    assert_eq!(tracker.total(Stat::GamesPlayed), 1);
    assert_eq!(tracker.player_stat(Stat::Wins, 0), 1);
    assert_eq!(tracker.player_stat(Stat::BlackCardsDrawn, 1), 1);
    assert!(tracker.is_unlocked(Achievement::FirstGame));
    assert!(tracker.is_unlocked(Achievement::FirstWin));
    assert!(tracker.is_unlocked(Achievement::BlackCardVictim));
}

#[test]
fn ending_steps_wait_for_advance() {
    let options = GameOptions::default().with_target_score(5);
    let mut game = seated(options, catalog(tasks("task", 10)), &["Ada", "Bo"]);
    game.draw_primary().unwrap();
    game.accept_self().unwrap();

    assert_eq!(game.phase(), Phase::Playing);
    let pending = game.pending().unwrap();
    assert_eq!(pending.kind, PendingKind::EnterEnding);
    assert_eq!(pending.min_display, Duration::from_millis(2000));
    assert_eq!(game.draw_primary().unwrap_err(), GameError::Pending);

    game.advance().unwrap();
    assert_eq!(game.phase(), Phase::Ending);
    assert_eq!(game.state().winner_id, Some(0));
    assert_eq!(
        game.pending().unwrap().kind,
        PendingKind::SelectPenaltyTarget
    );
    assert_eq!(game.assign_penalty().unwrap_err(), GameError::Pending);

    game.advance().unwrap();
    assert_eq!(game.phase(), Phase::AssigningPenalty);
    assert!(game.pending().is_none());
    assert_eq!(game.state().penalty_target_id, Some(1));
}

#[test]
fn empty_penalty_deck_lets_the_loser_off() {
    let options = quick().with_target_score(5);
    let catalog = TaskCatalog::new(tasks("task", 5), tasks("secret", 5), Vec::new());
    let mut game = seated(options, catalog, &["Ada", "Bo"]);
    game.draw_primary().unwrap();
    game.accept_self().unwrap();

    game.assign_penalty().unwrap();
    assert_eq!(game.phase(), Phase::Ended);
    assert!(game.state().penalty_task.is_none());
    assert!(game.state().message.contains("off the hook"));
    assert!(!game.tracker().is_unlocked(Achievement::BlackCardVictim));
    assert_eq!(game.result().unwrap().penalty_task, None);
}

#[test]
fn explicit_end_check() {
    let mut fresh = Game::new(quick(), 1);
    assert_eq!(
        fresh.end_game_check().unwrap_err(),
        GameError::End(EndError::InvalidState)
    );

    let options = quick().with_target_score(10);
    let mut game = seated(options, catalog(tasks("task", 10)), &["Ada", "Bo"]);
    assert_eq!(
        game.end_game_check().unwrap_err(),
        GameError::End(EndError::TargetNotReached)
    );

    game.draw_primary().unwrap();
    game.start_delegation().unwrap();
    game.select_delegate(1).unwrap();
    game.delegator_completes_secret().unwrap();
    // The delegate's attempt is not cut short automatically.
    assert_eq!(game.phase(), Phase::DelegateAttemptingTask);
    assert_eq!(score(&game, 0), 10);

    game.end_game_check().unwrap();
    assert_eq!(game.phase(), Phase::AssigningPenalty);
    assert_eq!(game.state().winner_id, Some(0));
    assert_eq!(game.state().penalty_target_id, Some(1));
    assert!(game.state().active_task.is_none());
}

#[test]
fn tied_leaders_go_to_the_lowest_seat() {
    let options = quick()
        .with_target_score(10)
        .with_self_task_points(10);
    let mut game = seated(options, catalog(tasks("task", 10)), &["Ada", "Bo", "Cy"]);

    delegate_to(&mut game, 1);
    assert_eq!(score(&game, 0), 10);
    assert_eq!(score(&game, 1), 10);
    assert_eq!(game.phase(), Phase::AssigningPenalty);
    assert_eq!(game.state().winner_id, Some(0));
    assert_eq!(game.state().penalty_target_id, Some(2));
}

#[test]
fn per_game_tallies_unlock_achievements() {
    let options = quick().with_target_score(100);
    let mut game = seated(options, catalog(tasks("task", 12)), &["Solo"]);

    for round in 1..=6 {
        game.draw_primary().unwrap();
        game.accept_self().unwrap();
        let tracker = game.tracker();
        assert_eq!(tracker.is_unlocked(Achievement::BraveSoul), round >= 5);
        assert_eq!(tracker.is_unlocked(Achievement::HighScorer), round >= 6);
    }
    assert_eq!(game.players()[0].self_accepts(), 6);

    let mut game = seated(options, catalog(tasks("task", 12)), &["Ada", "Bo"]);
    for round in 1..=3 {
        delegate_to(&mut game, 1);
        assert_eq!(
            game.tracker().is_unlocked(Achievement::DelegatorMaster),
            round == 3
        );
        game.draw_primary().unwrap();
        game.accept_self().unwrap();
    }
    assert_eq!(game.players()[0].delegations(), 3);
}

#[test]
fn replay_resets_scores_and_keeps_the_ledger() {
    let options = quick().with_target_score(5);
    let mut game = Game::with_catalog(options, catalog(tasks("task", 10)), 3);
    game.setup_game(&["Ada", "Bo"], &["Juggle"]).unwrap();
    game.hide_and_proceed().unwrap();
    game.hide_and_proceed().unwrap();
    game.draw_primary().unwrap();
    game.accept_self().unwrap();
    game.assign_penalty().unwrap();
    assert_eq!(game.phase(), Phase::Ended);

    let effects = game.replay_same_players().unwrap();
    assert_eq!(phase_steps(&effects), [Phase::RevealingSecret]);
    let names: Vec<&str> = game.players().iter().map(Player::name).collect();
    assert_eq!(names, ["Ada", "Bo"]);
    assert!(game.players().iter().all(|player| player.score() == 0));
    assert!(game.players().iter().all(Player::has_secret));
    assert_eq!(game.state().custom_tasks.len(), 1);
    assert_eq!(game.state().primary_deck.len(), 11);
    assert!(game.state().winner_id.is_none());
    assert!(game.state().penalty_task.is_none());
    assert!(game.result().is_none());
    assert_eq!(game.tracker().total(Stat::GamesPlayed), 1);

    let mut empty = Game::new(quick(), 1);
    assert_eq!(
        empty.replay_same_players().unwrap_err(),
        GameError::Setup(SetupError::NoPlayers)
    );
}

#[test]
fn restart_clears_the_table_even_while_pending() {
    let options = GameOptions::default();
    let mut game = seated(options, catalog(votable_tasks(10)), &["Ada", "Bo"]);
    game.draw_primary().unwrap();
    game.accept_self().unwrap();
    game.cast_vote(1, Vote::Yes).unwrap();
    assert!(game.pending().is_some());

    let effects = game.restart().unwrap();
    assert!(effects.contains(&Effect::PhaseChanged {
        from: Phase::Voting,
        to: Phase::Setup,
    }));
    assert_eq!(game.phase(), Phase::Setup);
    assert!(game.pending().is_none());
    assert!(game.players().is_empty());
    assert!(game.state().primary_deck.is_empty());

    game.setup_game(&["Cy"], &[]).unwrap();
    assert_eq!(game.phase(), Phase::RevealingSecret);
}

#[test]
fn transition_leaves_its_input_alone() {
    let options = quick();
    let catalog = TaskCatalog::default();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let state = GameState::new();

    let setup = Event::SetupGame {
        names: vec!["Ada".into(), "Bo".into()],
        custom_tasks: Vec::new(),
    };
    let next = transition(&state, &setup, &options, &catalog, &mut rng).unwrap();
    assert_eq!(state, GameState::new());
    assert_eq!(next.state.phase, Phase::RevealingSecret);

    let err = transition(&next.state, &Event::DrawPrimary, &options, &catalog, &mut rng)
        .unwrap_err();
    assert_eq!(err, GameError::Action(ActionError::InvalidState));
    assert_eq!(next.state.phase, Phase::RevealingSecret);
}

#[test]
fn same_seed_same_game() {
    let play = || {
        let mut game = Game::new(quick(), 99);
        game.setup_game(&["Ada", "Bo", "Cy"], &[]).unwrap();
        game.state().clone()
    };
    assert_eq!(play(), play());
}

#[test]
fn scores_never_decrease_over_a_full_game() {
    let mut game = Game::new(quick(), 3);
    game.setup_game(&["Ada", "Bo", "Cy", "Di"], &[]).unwrap();
    let mut previous = vec![0; 4];
    let mut turns = 0_u32;

    for _ in 0..500 {
        match game.phase() {
            Phase::RevealingSecret => {
                game.hide_and_proceed().unwrap();
            }
            Phase::Playing => {
                game.draw_primary().unwrap();
            }
            Phase::Decision => {
                turns += 1;
                let candidate = game.state().delegate_candidates().next().map(Player::id);
                match candidate {
                    Some(delegate) if turns % 2 == 0 => {
                        game.start_delegation().unwrap();
                        game.select_delegate(delegate).unwrap();
                    }
                    _ => {
                        game.accept_self().unwrap();
                    }
                }
            }
            Phase::RevealingSecretForDelegate => {
                game.delegator_completes_secret().unwrap();
            }
            Phase::DelegateAttemptingTask => {
                game.delegate_completes_primary().unwrap();
            }
            Phase::ConfirmingNewSecret => {
                game.confirm_close().unwrap();
            }
            Phase::Voting => {
                let voters: Vec<PlayerId> = game
                    .state()
                    .voting_round
                    .as_ref()
                    .unwrap()
                    .ballots()
                    .iter()
                    .filter(|(_, vote)| vote.is_none())
                    .map(|(id, _)| *id)
                    .collect();
                for voter in voters {
                    game.cast_vote(voter, Vote::Yes).unwrap();
                }
            }
            Phase::AssigningPenalty => {
                game.assign_penalty().unwrap();
            }
            Phase::Ended => break,
            phase => panic!("unexpected phase {phase:?}"),
        }

        let scores: Vec<u32> = game.players().iter().map(Player::score).collect();
        assert!(scores.iter().zip(&previous).all(|(now, before)| now >= before));
        previous = scores;
    }

    assert_eq!(game.phase(), Phase::Ended);
    let result = game.result().unwrap();
    let winner = result.standings[usize::from(result.winner_id)].score;
    assert!(winner >= game.options().target_score);
}

//! CLI party game example.

#![allow(clippy::missing_docs_in_private_items)]

use std::io::{self, Write};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use partydeck::{Effect, Game, GameError, GameOptions, Phase, Player, PlayerId, Vote};

fn main() {
    println!("Party deck CLI example (type 'q' to quit)");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let options = GameOptions::default();
    let mut game = Game::new(options, seed);

    let names = prompt_list(&format!(
        "Player names, comma separated (up to {}): ",
        options.max_players
    ));
    let tasks = prompt_list(&format!(
        "Custom tasks, comma separated (up to {}, blank for none): ",
        options.max_custom_tasks
    ));
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let tasks: Vec<&str> = tasks.iter().map(String::as_str).collect();

    if let Err(err) = game.setup_game(&names, &tasks) {
        println!("Setup error: {err}");
        return;
    }

    loop {
        if let Some(pending) = game.pending() {
            print_message(&game);
            thread::sleep(pending.min_display);
            report(game.advance());
            continue;
        }

        print_message(&game);
        announce_achievements(&mut game);

        let result = match game.phase() {
            Phase::Setup => return,
            Phase::RevealingSecret => reveal_turn(&mut game),
            Phase::Playing => {
                print_scores(&game);
                match prompt_line("[d]raw a task: ").as_str() {
                    "q" | "quit" => return,
                    _ => game.draw_primary(),
                }
            }
            Phase::Decision => decision_turn(&mut game),
            Phase::SelectingDelegate => {
                print_candidates(&game);
                match prompt_line("Hand the task to (number, [c]ancel): ").as_str() {
                    "q" | "quit" => return,
                    "c" | "cancel" => game.cancel(),
                    input => match input.parse::<PlayerId>() {
                        Ok(player_id) => game.select_delegate(player_id),
                        Err(_) => {
                            println!("Please enter a number.");
                            continue;
                        }
                    },
                }
            }
            Phase::RevealingSecretForDelegate => {
                if let Some(reveal) = &game.state().active_secret_reveal {
                    println!("Secret task: {}", colorize(&reveal.text, "34"));
                }
                prompt_line("Press enter once it is done.");
                game.delegator_completes_secret()
            }
            Phase::DelegateAttemptingTask => {
                print_task(&game);
                prompt_line("Press enter once the delegate has done it.");
                game.delegate_completes_primary()
            }
            Phase::ConfirmingNewSecret => {
                if let Some(reveal) = &game.state().active_secret_reveal {
                    println!("New secret task: {}", colorize(&reveal.text, "34"));
                }
                prompt_line("Press enter to close the card.");
                game.confirm_close()
            }
            Phase::Voting => voting_turn(&mut game),
            Phase::Ending => game.advance(),
            Phase::AssigningPenalty => {
                prompt_line("Press enter to draw the penalty card.");
                game.assign_penalty()
            }
            Phase::Ended => {
                print_scores(&game);
                announce_achievements(&mut game);
                match prompt_line("[r]eplay with the same players or [q]uit: ").as_str() {
                    "r" | "replay" => game.replay_same_players(),
                    _ => return,
                }
            }
        };

        report(result);
    }
}

fn reveal_turn(game: &mut Game) -> Result<Vec<Effect>, GameError> {
    prompt_line("Press enter to see your secret card.");
    match game.show_secret() {
        Ok(_) => {
            if let Some(reveal) = &game.state().active_secret_reveal {
                println!("Secret task: {}", colorize(&reveal.text, "34"));
            }
        }
        Err(err) => println!("{err}"),
    }
    prompt_line("Press enter to hide it and pass the phone.");
    clear_screen();
    game.hide_and_proceed()
}

fn decision_turn(game: &mut Game) -> Result<Vec<Effect>, GameError> {
    print_task(game);
    loop {
        match prompt_line("[a]ccept or [h]and it over: ").as_str() {
            "a" | "accept" => return game.accept_self(),
            "h" | "hand" => return game.start_delegation(),
            "q" | "quit" => std::process::exit(0),
            _ => println!("Unknown action."),
        }
    }
}

fn voting_turn(game: &mut Game) -> Result<Vec<Effect>, GameError> {
    let waiting: Vec<PlayerId> = game
        .state()
        .voting_round
        .as_ref()
        .map(|round| {
            round
                .ballots()
                .iter()
                .filter(|(_, vote)| vote.is_none())
                .map(|(id, _)| *id)
                .collect()
        })
        .unwrap_or_default();

    let Some(&voter) = waiting.first() else {
        return game.advance();
    };
    let name = game.state().player(voter).map_or("", Player::name).to_string();

    loop {
        match prompt_line(&format!("{name}, did they do it? [y]es/[n]o/[c]ancel vote: ")).as_str() {
            "y" | "yes" => return game.cast_vote(voter, Vote::Yes),
            "n" | "no" => return game.cast_vote(voter, Vote::No),
            "c" | "cancel" => return game.cancel(),
            _ => println!("Please answer y or n."),
        }
    }
}

fn report(result: Result<Vec<Effect>, GameError>) {
    if let Err(err) = result {
        println!("{}", colorize(&err.to_string(), "31"));
    }
}

fn announce_achievements(game: &mut Game) {
    let unlocked = game.tracker().pending_notifications().to_vec();
    for achievement in unlocked {
        println!(
            "{} {}",
            colorize(&format!("Achievement unlocked: {}!", achievement.name()), "33"),
            achievement.description()
        );
        game.mark_notified(achievement);
    }
}

fn print_message(game: &Game) {
    let state = game.state();
    if !state.last_action_message.is_empty() {
        println!("{}", colorize(&state.last_action_message, "32"));
    }
    if !state.message.is_empty() {
        println!("{}", state.message);
    }
}

fn print_task(game: &Game) {
    if let Some(active) = &game.state().active_task {
        let marker = if active.task.is_votable { " (vote)" } else { "" };
        println!("Task: {}{marker}", colorize(&active.task.text, "31"));
    }
}

fn print_candidates(game: &Game) {
    for player in game.state().delegate_candidates() {
        println!("  {}: {} {}", player.id(), player.avatar(), player.name());
    }
}

fn print_scores(game: &Game) {
    let target = game.options().target_score;
    println!();
    for player in game.players() {
        let marker = if game.current_player().map(Player::id) == Some(player.id()) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {} {:<12} {:>3}/{target}",
            player.avatar(),
            player.name(),
            player.score()
        );
    }
    println!();
}

fn clear_screen() {
    print!("\u{1b}[2J\u{1b}[H");
    let _ = io::stdout().flush();
}

fn prompt_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_lowercase()
}

fn prompt_list(prompt: &str) -> Vec<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return Vec::new();
    }
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn colorize(text: &str, code: &str) -> String {
    format!("\u{1b}[{code}m{text}\u{1b}[0m")
}

//! Shell Game headless runner
//!
//! Plays a few rounds against the engine with a simulated renderer and an
//! automatic player, logging everything that happens.

use std::path::PathBuf;

use clap::Parser;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use shell_game::sim::{GameError, GameEvent, GamePhase, HeadlessPlayer, ShellGame};
use shell_game::{GameConfig, JsonFileRecordStore, MemoryRecordStore, NullSound, RecordStore};

/// Play the shell game headlessly
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON game config; defaults are used when omitted
    config: Option<PathBuf>,
    /// Number of rounds to win before stopping
    #[arg(default_value_t = 3)]
    rounds: u32,
}

/// Where a headless session ended up
#[derive(Debug, Clone, Copy, PartialEq)]
struct Summary {
    level: u32,
    score: u64,
    record: u64,
    /// Seconds of shuffle animation
    elapsed: f32,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    log::info!("Shell Game (headless) starting...");

    let config = match &args.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    let seed = config.seed_or_random();

    let result = match config.record_path.clone() {
        Some(path) => play(config, seed, JsonFileRecordStore::new(path), args.rounds),
        None => play(config, seed, MemoryRecordStore::default(), args.rounds),
    };
    match result {
        Ok(summary) => println!(
            "Played {} rounds: level {}, score {}, record {}, {:.1}s of shuffling",
            args.rounds, summary.level, summary.score, summary.record, summary.elapsed
        ),
        Err(err) => {
            eprintln!("Game aborted: {err}");
            std::process::exit(1);
        }
    }
}

fn play<R: RecordStore>(
    config: GameConfig,
    seed: u64,
    records: R,
    rounds: u32,
) -> Result<Summary, GameError> {
    let cups = config.cup_count;
    let mut game = ShellGame::new(config, seed, HeadlessPlayer::new(cups), NullSound, records)?;
    // Separate stream for the simulated renderer and guesser
    let mut host_rng = Pcg32::seed_from_u64(seed ^ 0x5eed);

    game.plane_detected();
    game.tap()?;
    game.tap()?;

    let mut played = 0;
    while played < rounds {
        report(game.drain_events());
        match game.phase() {
            GamePhase::InAction if game.player().is_idle() => game.cup_moved()?,
            GamePhase::InAction => {
                // Completions arrive in arbitrary order
                let mut tickets = game.player_mut().finish_all();
                tickets.shuffle(&mut host_rng);
                for ticket in tickets {
                    game.swap_finished(ticket)?;
                }
            }
            GamePhase::Selecting => {
                let guess = host_rng.random_range(0..cups);
                if game.select_cup(guess)? {
                    played += 1;
                }
            }
            GamePhase::Revealed => game.tap()?,
            GamePhase::Positioning | GamePhase::Ready => game.tap()?,
        }
    }
    // The last right guess is still lifting its cup
    while game.phase() == GamePhase::InAction && game.player().is_idle() {
        game.cup_moved()?;
    }
    report(game.drain_events());

    Ok(Summary {
        level: game.level_number(),
        score: game.score(),
        record: game.record(),
        elapsed: game.player().elapsed,
    })
}

fn report(events: Vec<GameEvent>) {
    for event in events {
        match event {
            GameEvent::Message(text) if !text.is_empty() => println!("> {text}"),
            GameEvent::GuessResult { cup, correct } => {
                println!("  picked cup {cup}: {}", if correct { "found it!" } else { "empty" });
            }
            GameEvent::ScoreChanged(score) => println!("  score {score}"),
            other => log::debug!("{other:?}"),
        }
    }
}

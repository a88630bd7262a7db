//! Ice Breaker headless runner
//!
//! Plays one seeded game with the autoplay pivot chooser on a simulated
//! clock, then records the score in the local high score table.
//!
//! Usage: `ice-breaker [seed] [small|large]`. Saves go to `$ICE_BREAKER_DATA`
//! or `./.ice-breaker`.

use std::env;
use std::error::Error;
use std::process::ExitCode;

use ice_breaker::consts::{CASCADE_DELAY_SECS, ROTATION_SECS, TIMER_STEP};
use ice_breaker::persistence::FileStorage;
use ice_breaker::sim::{GameState, RotationOutcome, TimerOutcome, choose_pivot, select_tile, tick};
use ice_breaker::{BoardSize, HighScores, Settings};

/// Hard stop for runs where time bonuses keep the clock alive
const MAX_MOVES: u32 = 5000;

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => 12345,
    };

    let data_dir = env::var("ICE_BREAKER_DATA").unwrap_or_else(|_| ".ice-breaker".to_string());
    let mut storage = FileStorage::open(&data_dir)?;

    let mut settings = Settings::load(&storage);
    if let Some(size) = args.next() {
        settings.board_size = size.parse::<BoardSize>()?;
    }
    log::info!(
        "Ice Breaker (native) seed {} on the {} board",
        seed,
        settings.board_size.as_str()
    );

    let mut state = GameState::new(settings, seed)?;
    let mut applied = 0u32;

    'game: while state.moves < MAX_MOVES {
        // Thinking time
        for _ in 0..4 {
            if tick(&mut state, TIMER_STEP) == TimerOutcome::Expired {
                break 'game;
            }
        }

        let Some(pivot) = choose_pivot(&state) else {
            log::warn!("No rotatable pivot left");
            break;
        };
        if let RotationOutcome::Applied { matches, .. } = select_tile(&mut state, pivot)? {
            applied += 1;
            if matches.is_match() {
                println!(
                    "move {:>4}: {} cleared at {} (combo x{}, +{})",
                    state.moves,
                    matches.destroyed.len(),
                    pivot,
                    matches.combo,
                    matches.score_delta
                );
            }
        }
        if tick(&mut state, ROTATION_SECS) == TimerOutcome::Expired {
            break;
        }

        loop {
            let Some(step) = state.cascade().next() else {
                break;
            };
            let step = step?;
            if step.matches.is_match() {
                println!(
                    "  cascade {}: {} cleared (combo x{}, +{})",
                    step.round,
                    step.matches.destroyed.len(),
                    step.matches.combo,
                    step.matches.score_delta
                );
            }
            if tick(&mut state, CASCADE_DELAY_SECS) == TimerOutcome::Expired {
                break 'game;
            }
        }
    }

    println!(
        "Final score {} after {} rotations ({:.1}s simulated)",
        state.current_score(),
        applied,
        state.clock_ms / 1000.0
    );

    let mut scores = HighScores::load(&storage);
    match scores.add_score(state.current_score()) {
        Some(rank) => {
            scores.save(&mut storage)?;
            println!("New high score, rank #{rank}");
        }
        None => println!("Best so far: {}", scores.top_score()),
    }
    Ok(())
}

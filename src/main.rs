//! Matchlock - lock-step memory match at the terminal
//!
//! One coordinator, N participant seats, one round at a time.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use matchlock::{format_board, GameConfig, GameSession, Seat};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            board_side,
            participants,
            seed,
            delay_ms,
        } => {
            let config = table_config(config, board_side, participants, seed, delay_ms)?;
            let seats = seats_with_human(&config);
            run_table(config, seats).await
        }
        Command::Bots {
            config,
            board_side,
            participants,
            seed,
            delay_ms,
        } => {
            let config = table_config(config, board_side, participants, seed, delay_ms)?;
            let seats = seats_all_bots(&config);
            run_table(config, seats).await
        }
    }
}

/// Builds the table configuration from an optional file plus flag overrides.
fn table_config(
    path: Option<PathBuf>,
    board_side: Option<usize>,
    participants: Option<usize>,
    seed: Option<u64>,
    delay_ms: Option<u64>,
) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(side) = board_side {
        config = config.with_board_side(side);
    }
    if let Some(count) = participants {
        config = config.with_participants(count);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(delay) = delay_ms {
        config = config.with_round_delay_ms(delay);
    }
    config.validate()?;
    Ok(config)
}

/// One human at seat 1, bots in every other seat.
fn seats_with_human(config: &GameConfig) -> Vec<Seat> {
    (1..=*config.participants())
        .map(|id| if id == 1 { Seat::human(id) } else { Seat::auto(id) })
        .collect()
}

/// Bots in every seat.
fn seats_all_bots(config: &GameConfig) -> Vec<Seat> {
    (1..=*config.participants()).map(Seat::auto).collect()
}

/// Plays the table to completion and prints the closing screen.
async fn run_table(config: GameConfig, seats: Vec<Seat>) -> Result<()> {
    let session = GameSession::from_config(&config, seats)?.with_narration(true);
    let summary = session.run().await?;

    let final_state = summary.final_state();
    println!("\nServer: Final board state:");
    print!(
        "{}",
        format_board(final_state.board(), final_state.revealed())
    );
    println!(
        "\nGame over: {} matches in {} rounds.",
        summary.matches(),
        summary.rounds()
    );
    Ok(())
}

//! Command-line interface for matchlock.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Matchlock - lock-step memory match at the terminal
#[derive(Parser, Debug)]
#[command(name = "matchlock")]
#[command(about = "Lock-step memory match over message-passing tasks", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play at the terminal: you take seat 1, bots fill the rest
    Play {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Length of one side of the square board
        #[arg(long)]
        board_side: Option<usize>,

        /// Number of participant seats
        #[arg(long)]
        participants: Option<usize>,

        /// Shuffle seed for a reproducible layout
        #[arg(long)]
        seed: Option<u64>,

        /// Pause between rounds, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Watch bots clear a board, no human input
    Bots {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Length of one side of the square board
        #[arg(long)]
        board_side: Option<usize>,

        /// Number of participant seats
        #[arg(long)]
        participants: Option<usize>,

        /// Shuffle seed for a reproducible layout
        #[arg(long)]
        seed: Option<u64>,

        /// Pause between rounds, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

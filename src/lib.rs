//! Matchlock library - lock-step memory match over message-passing tasks
//!
//! One coordinator task owns a board of face-down pairs; participant tasks
//! take turns revealing two cells per round. Every process advances through
//! the same round structure in lock-step, synchronized purely by blocking
//! message exchange.
//!
//! # Architecture
//!
//! - **Game**: the board, the reveal overlay, and pure move validation
//! - **Protocol**: the coordinator and participant round loops, wired with
//!   per-seat channels and a shared termination gate
//! - **Players**: move sources (human prompts, bots, fixed scripts)
//! - **Session**: seats, seeding, task spawning, and the final summary
//!
//! # Example
//!
//! ```no_run
//! use matchlock::{GameConfig, GameSession, Seat};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GameConfig::default().with_participants(2).with_seed(7);
//! let seats = vec![Seat::auto(1), Seat::auto(2)];
//!
//! let summary = GameSession::from_config(&config, seats)?.run().await?;
//! println!("{} matches in {} rounds", summary.matches(), summary.rounds());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod game;
mod players;
mod protocol;
mod render;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - Game domain
pub use game::{
    validate, Board, GameState, IllegalMove, LayoutError, MoveOutcome, PairValue, RevealedMask,
};

// Crate-level exports - Round protocol
pub use protocol::{
    connect, Coordinator, CoordinatorLink, GameEvent, GameSummary, MoveProposal, Participant,
    ParticipantId, ParticipantLink, ProtocolError, RoundSnapshot, TerminationGate,
    TerminationWatch,
};

// Crate-level exports - Move sources
pub use players::{AutoSource, HumanSource, MoveSource, ScriptedSource};

// Crate-level exports - Rendering
pub use render::{format_board, BoardRenderer, ConsoleRenderer, SilentRenderer};

// Crate-level exports - Session assembly
pub use session::{GameSession, Seat};

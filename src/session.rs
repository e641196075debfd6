//! Assembling and running one table.
//!
//! A session owns everything a match needs before the first round: the
//! shuffled board, one seat per participant, and the pacing. [`run`]
//! wires the channels, spawns one task per seat plus the coordinator,
//! and hands back the coordinator's summary.
//!
//! [`run`]: GameSession::run

use crate::config::GameConfig;
use crate::game::{Board, GameState};
use crate::players::{AutoSource, HumanSource, MoveSource, ScriptedSource};
use crate::protocol::{connect, Coordinator, GameEvent, Participant, ParticipantId, TerminationGate};
use crate::render::{BoardRenderer, ConsoleRenderer, SilentRenderer};
use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

/// One participant seat: a move source plus its renderer.
pub struct Seat {
    source: Box<dyn MoveSource>,
    renderer: Box<dyn BoardRenderer>,
}

impl Seat {
    /// Seats an arbitrary source and renderer.
    pub fn new(source: Box<dyn MoveSource>, renderer: Box<dyn BoardRenderer>) -> Self {
        Self { source, renderer }
    }

    /// A human at the terminal: stdin prompts, console board.
    pub fn human(participant: ParticipantId) -> Self {
        Self::new(
            Box::new(HumanSource::new(participant)),
            Box::new(ConsoleRenderer),
        )
    }

    /// An automated seat that plays silently.
    pub fn auto(participant: ParticipantId) -> Self {
        Self::new(
            Box::new(AutoSource::new(participant)),
            Box::new(SilentRenderer),
        )
    }

    /// A seat that plays a fixed script. Used by tests and demos.
    pub fn scripted(name: impl Into<String>, moves: Vec<(usize, usize)>) -> Self {
        Self::new(
            Box::new(ScriptedSource::new(name, moves)),
            Box::new(SilentRenderer),
        )
    }
}

/// A fully assembled table, ready to play one match.
pub struct GameSession {
    state: GameState,
    seats: Vec<Seat>,
    pacing: Duration,
    narrate: bool,
}

impl GameSession {
    /// Builds a session from configuration: resolves the seed, shuffles
    /// the board, and pairs the given seats with participant ids
    /// `1..=N` in order.
    #[instrument(skip(config, seats), fields(participants = seats.len()))]
    pub fn from_config(config: &GameConfig, seats: Vec<Seat>) -> Result<Self> {
        config.validate()?;
        anyhow::ensure!(
            seats.len() == *config.participants(),
            "config expects {} participants but {} seats were provided",
            config.participants(),
            seats.len()
        );

        let seed = (*config.seed()).unwrap_or_else(rand::random);
        info!(seed, "shuffle seed");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let board = Board::shuffled(*config.board_side(), &mut rng)?;

        Ok(Self {
            state: GameState::new(board),
            seats,
            pacing: Duration::from_millis(*config.round_delay_ms()),
            narrate: false,
        })
    }

    /// Builds a session over an explicit state. Used by tests that need a
    /// known layout rather than a shuffled one.
    pub fn with_state(state: GameState, seats: Vec<Seat>) -> Self {
        Self {
            state,
            seats,
            pacing: Duration::ZERO,
            narrate: false,
        }
    }

    /// Echoes match and miss announcements to stdout as they happen.
    pub fn with_narration(mut self, narrate: bool) -> Self {
        self.narrate = narrate;
        self
    }

    /// Plays the match to completion.
    ///
    /// Spawns one task per seat and runs the coordinator on this task.
    /// On a clean finish every seat has already observed the termination
    /// flag, so joining them cannot block. Seats are joined on the error
    /// path too: a desync at the table usually starts with one seat, and
    /// that seat's own error names the root cause.
    #[instrument(skip(self), fields(participants = self.seats.len()))]
    pub async fn run(self) -> Result<crate::protocol::GameSummary> {
        let gate = TerminationGate::new();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let mut links = Vec::with_capacity(self.seats.len());
        let mut runners = Vec::with_capacity(self.seats.len());
        for (index, seat) in self.seats.into_iter().enumerate() {
            let id = index + 1;
            let (coordinator_side, participant_side) = connect(id, &gate);
            links.push(coordinator_side);

            let participant = Participant::new(participant_side, seat.source, seat.renderer);
            runners.push((id, tokio::spawn(participant.run())));
        }

        let narration = if self.narrate {
            Some(tokio::spawn(narrate_events(event_rx)))
        } else {
            None
        };

        let coordinator =
            Coordinator::new(self.state, links, gate, event_tx).with_pacing(self.pacing);
        let outcome = coordinator.run().await;

        let mut seat_failure: Option<anyhow::Error> = None;
        for (id, runner) in runners {
            let finished = runner
                .await
                .with_context(|| format!("participant {id} task panicked"))
                .and_then(|result| result.with_context(|| format!("participant {id} failed")));
            if let Err(err) = finished {
                warn!(participant = id, error = %err, "seat did not finish cleanly");
                seat_failure.get_or_insert(err);
            }
        }
        if let Some(narration) = narration {
            narration.await.context("narration task panicked")?;
        }

        match (outcome, seat_failure) {
            (Ok(summary), None) => Ok(summary),
            // The coordinator saw a clean game but a seat still failed on
            // the way out; that failure is the result.
            (Ok(_), Some(seat)) => Err(seat),
            (Err(err), None) => Err(err.into()),
            // The seat failure came first; the coordinator error is the
            // consequence it observed.
            (Err(err), Some(seat)) => Err(seat.context(err)),
        }
    }
}

/// Prints the coordinator's announcements in the server's voice.
async fn narrate_events(mut events: mpsc::UnboundedReceiver<GameEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            GameEvent::Matched {
                participant,
                a,
                b,
                value,
            } => {
                println!("Server: Player {participant} matched cells {a} & {b} (value={value}).");
            }
            GameEvent::Missed { participant, a, b } => {
                println!("Server: Player {participant} missed on {a} & {b}.");
            }
            GameEvent::Rejected {
                participant,
                a,
                b,
                reason,
            } => {
                println!("Server: Player {participant}'s move {a} & {b} rejected ({reason}).");
            }
            GameEvent::RoundStarted { .. } | GameEvent::GameOver { .. } => {}
        }
    }
}

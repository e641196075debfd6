//! The coordinator's round loop.
//!
//! One task owns the authoritative [`GameState`] and drives every round
//! through the same fixed sequence: distribute snapshots, announce the
//! termination flag, collect one move per participant in ascending id
//! order, apply the legal matches, announce the flag again. Every step
//! blocks until its counterpart acts, so a stalled participant stalls the
//! game; a participant that falls out of step ends it with a
//! [`ProtocolError`] instead.

use super::error::ProtocolError;
use super::gate::TerminationGate;
use super::link::ParticipantLink;
use super::message::{ParticipantId, RoundSnapshot};
use crate::game::{validate, GameState, IllegalMove, MoveOutcome, PairValue};
use derive_getters::Getters;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Messages sent from the coordinator to observers.
///
/// Events narrate the game for a UI or a log; the round loop never waits
/// on them and never varies its behavior by whether anyone listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A round's snapshots went out to every participant.
    RoundStarted {
        /// Round number, counted from 1.
        round: u64,
    },
    /// A participant turned over a matching pair.
    Matched {
        /// Who moved.
        participant: ParticipantId,
        /// First cell of the pair.
        a: usize,
        /// Second cell of the pair.
        b: usize,
        /// The face value both cells share.
        value: PairValue,
    },
    /// A legal move that won nothing.
    Missed {
        /// Who moved.
        participant: ParticipantId,
        /// First cell picked.
        a: usize,
        /// Second cell picked.
        b: usize,
    },
    /// A structurally invalid move; the board is unchanged.
    Rejected {
        /// Who moved.
        participant: ParticipantId,
        /// First cell picked.
        a: usize,
        /// Second cell picked.
        b: usize,
        /// Why the move could not be applied.
        reason: IllegalMove,
    },
    /// The final announcement is out and the round loop has ended.
    GameOver {
        /// Rounds in which moves were collected.
        rounds: u64,
        /// Pairs matched over the whole game.
        matches: usize,
    },
}

/// Where the coordinator stands inside the round sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Distributing,
    AwaitingMoves,
    Deciding,
    Terminated,
}

/// Final accounting for a finished game.
#[derive(Debug, Clone, Getters)]
pub struct GameSummary {
    /// Rounds in which moves were collected.
    rounds: u64,
    /// Pairs matched over the whole game.
    matches: usize,
    /// The state as of termination, fully revealed in a normal finish.
    final_state: RoundSnapshot,
}

/// Drives the round loop over a set of participant links.
pub struct Coordinator {
    state: GameState,
    links: Vec<ParticipantLink>,
    gate: TerminationGate,
    event_tx: mpsc::UnboundedSender<GameEvent>,
    pacing: Duration,
    round: u64,
    completed_rounds: u64,
}

impl Coordinator {
    /// Creates a coordinator over `links`.
    ///
    /// Links are reordered by ascending participant id, so distribution
    /// and collection follow the same deterministic order every round.
    pub fn new(
        state: GameState,
        mut links: Vec<ParticipantLink>,
        gate: TerminationGate,
        event_tx: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        links.sort_by_key(ParticipantLink::id);
        Self {
            state,
            links,
            gate,
            event_tx,
            pacing: Duration::ZERO,
            round: 0,
            completed_rounds: 0,
        }
    }

    /// Inserts a delay between rounds to keep console output readable.
    ///
    /// The delay sits after a continue announcement and before the next
    /// distribution; termination is never delayed by it.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Runs rounds until every pair is matched or the protocol desyncs.
    #[instrument(
        skip(self),
        fields(
            participants = self.links.len(),
            pairs = self.state.board().num_pairs(),
        )
    )]
    pub async fn run(mut self) -> Result<GameSummary, ProtocolError> {
        info!(
            side = self.state.board().side(),
            cells = self.state.board().num_cells(),
            participants = self.links.len(),
            "board initialized"
        );

        let mut phase = Phase::Distributing;
        loop {
            phase = match phase {
                Phase::Distributing => self.distribute().await?,
                Phase::AwaitingMoves => self.collect_moves().await?,
                Phase::Deciding => self.decide().await?,
                Phase::Terminated => break,
            };
        }

        let summary = GameSummary {
            rounds: self.completed_rounds,
            matches: self.state.matches_found(),
            final_state: self.state.snapshot(self.round),
        };
        info!(
            rounds = summary.rounds,
            matches = summary.matches,
            "game over"
        );
        self.emit(GameEvent::GameOver {
            rounds: summary.rounds,
            matches: summary.matches,
        });
        Ok(summary)
    }

    /// Opens a round: every participant gets the same snapshot, then the
    /// flag announcement tells them all whether to play it.
    #[instrument(skip(self))]
    async fn distribute(&mut self) -> Result<Phase, ProtocolError> {
        self.round += 1;
        let snapshot = self.state.snapshot(self.round);
        debug!(round = self.round, "distributing snapshots");
        for link in &self.links {
            link.send_snapshot(snapshot.clone()).await?;
        }
        self.emit(GameEvent::RoundStarted { round: self.round });

        if self.gate.announce(self.state.is_complete())? {
            Ok(Phase::Terminated)
        } else {
            Ok(Phase::AwaitingMoves)
        }
    }

    /// Collects and applies one move from every participant in id order.
    ///
    /// A proposal tagged with any round but the current one means that
    /// participant's loop is out of step with this one, and the game ends
    /// with a diagnostic instead of applying the move to state it was not
    /// aimed at.
    #[instrument(skip(self), fields(round = self.round))]
    async fn collect_moves(&mut self) -> Result<Phase, ProtocolError> {
        for i in 0..self.links.len() {
            let participant = self.links[i].id();
            let proposal = self.links[i].recv_move().await?;
            if proposal.round() != self.round {
                return Err(ProtocolError::MoveRoundMismatch {
                    participant,
                    expected: self.round,
                    got: proposal.round(),
                });
            }

            let (a, b) = (proposal.a(), proposal.b());
            match validate(self.state.board(), self.state.revealed(), a, b) {
                MoveOutcome::Matched { value } => {
                    self.state.apply_match(a, b);
                    info!(round = self.round, participant, a, b, value, "pair matched");
                    self.emit(GameEvent::Matched {
                        participant,
                        a,
                        b,
                        value,
                    });
                }
                MoveOutcome::Miss => {
                    debug!(round = self.round, participant, a, b, "no match");
                    self.emit(GameEvent::Missed { participant, a, b });
                }
                MoveOutcome::Illegal(reason) => {
                    warn!(round = self.round, participant, a, b, %reason, "move rejected");
                    self.emit(GameEvent::Rejected {
                        participant,
                        a,
                        b,
                        reason,
                    });
                }
            }
        }
        self.completed_rounds += 1;
        Ok(Phase::Deciding)
    }

    /// Announces the post-collection flag.
    ///
    /// The flag is recomputed here so it reflects the matches applied this
    /// round; a game completed during collection terminates at this
    /// announcement and never opens another round.
    #[instrument(skip(self), fields(round = self.round))]
    async fn decide(&mut self) -> Result<Phase, ProtocolError> {
        if self.gate.announce(self.state.is_complete())? {
            return Ok(Phase::Terminated);
        }
        if !self.pacing.is_zero() {
            sleep(self.pacing).await;
        }
        Ok(Phase::Distributing)
    }

    /// Events are observability; a closed observer never stalls the round.
    fn emit(&self, event: GameEvent) {
        let _ = self.event_tx.send(event);
    }
}

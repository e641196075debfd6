//! Wire types exchanged between the coordinator and participants.
//!
//! Both message types carry the round they belong to. The transport is
//! ordered and reliable (in-process channels), so the tags are not needed
//! for delivery; they exist so both sides can *check* the lock-step
//! ordering instead of trusting it, and fail loudly on a violation.
//! Typed fields also make malformed moves (wrong arity, non-integers)
//! unrepresentable past the parse layer.

use crate::game::{Board, RevealedMask};
use serde::{Deserialize, Serialize};

/// Identifier of one participant. The coordinator is id 0; participants
/// are numbered from 1 in the order they were seated.
pub type ParticipantId = usize;

/// The coordinator's state as distributed at the start of one round.
///
/// A snapshot is exactly the authoritative state at the instant the round
/// began; it never reflects moves applied later in the same round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    round: u64,
    board: Board,
    revealed: RevealedMask,
}

impl RoundSnapshot {
    /// Bundles a board and overlay copy as the snapshot for `round`.
    pub fn new(round: u64, board: Board, revealed: RevealedMask) -> Self {
        Self {
            round,
            board,
            revealed,
        }
    }

    /// The round this snapshot opens.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// The cell layout.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The reveal overlay as of the start of the round.
    pub fn revealed(&self) -> &RevealedMask {
        &self.revealed
    }
}

/// One participant's answer for one round: two cell indices to turn over.
///
/// Transient by design — it exists between the participant's send and the
/// coordinator's validation, and is never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveProposal {
    round: u64,
    a: usize,
    b: usize,
}

impl MoveProposal {
    /// Proposes turning over cells `a` and `b` in `round`.
    pub fn new(round: u64, a: usize, b: usize) -> Self {
        Self { round, a, b }
    }

    /// The round this proposal answers.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// First cell index.
    pub fn a(&self) -> usize {
        self.a
    }

    /// Second cell index.
    pub fn b(&self) -> usize {
        self.b
    }
}

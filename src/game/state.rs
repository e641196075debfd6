//! Authoritative game state, owned and mutated only by the coordinator.

use super::board::{Board, RevealedMask};
use crate::protocol::RoundSnapshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// The canonical board, reveal overlay, and match counter.
///
/// Participants never hold one of these; they see round-scoped
/// [`RoundSnapshot`] copies. The single write path is [`apply_match`],
/// invoked by the coordinator only after a move classified as a match.
///
/// [`apply_match`]: GameState::apply_match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    revealed: RevealedMask,
    matches_found: usize,
}

impl GameState {
    /// Wraps a freshly built board with an all-hidden overlay.
    #[instrument(skip(board), fields(cells = board.num_cells(), pairs = board.num_pairs()))]
    pub fn new(board: Board) -> Self {
        let revealed = RevealedMask::hidden(board.num_cells());
        Self {
            board,
            revealed,
            matches_found: 0,
        }
    }

    /// The immutable cell layout.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The current reveal overlay.
    pub fn revealed(&self) -> &RevealedMask {
        &self.revealed
    }

    /// Confirmed matches so far.
    pub fn matches_found(&self) -> usize {
        self.matches_found
    }

    /// True once every pair has been matched.
    pub fn is_complete(&self) -> bool {
        self.matches_found == self.board.num_pairs()
    }

    /// Reveals both cells of a confirmed match and bumps the counter.
    ///
    /// Callers must have classified `(a, b)` as a match against this exact
    /// state; anything else is a programming error, not a runtime condition.
    pub fn apply_match(&mut self, a: usize, b: usize) {
        debug_assert_ne!(a, b, "a match needs two distinct cells");
        debug_assert!(!self.revealed.is_revealed(a), "cell {a} already revealed");
        debug_assert!(!self.revealed.is_revealed(b), "cell {b} already revealed");
        debug_assert_eq!(
            self.board.value(a),
            self.board.value(b),
            "cells {a} and {b} do not hold the same value"
        );

        self.revealed.reveal(a);
        self.revealed.reveal(b);
        self.matches_found += 1;
        debug!(
            a,
            b,
            matches = self.matches_found,
            pairs = self.board.num_pairs(),
            "match applied"
        );
    }

    /// Clones out the state as the snapshot for `round`.
    pub fn snapshot(&self, round: u64) -> RoundSnapshot {
        RoundSnapshot::new(round, self.board.clone(), self.revealed.clone())
    }
}

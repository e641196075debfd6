//! Move validation.
//!
//! Every collected move passes through [`validate`] before it can touch the
//! board. The checks are pure reads over the layout and the revealed mask, so
//! agents may run the same function locally to screen a candidate before
//! spending their turn on it. The authoritative call is always the
//! coordinator's.

use super::board::{Board, PairValue, RevealedMask};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Why a proposed move cannot be applied.
///
/// Checks run in a fixed order and the first failure wins, so a move that is
/// wrong in more than one way reports a stable reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, Serialize, Deserialize)]
pub enum IllegalMove {
    /// A pick names a cell outside the board.
    #[display("cell {index} is out of range for a board of {num_cells} cells")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Number of cells on the board.
        num_cells: usize,
    },
    /// Both picks name the same cell.
    #[display("both picks name cell {index}")]
    SameCell {
        /// The duplicated index.
        index: usize,
    },
    /// A pick names a cell that is already face up.
    #[display("cell {index} is already revealed")]
    AlreadyRevealed {
        /// The revealed index.
        index: usize,
    },
}

/// Classification of one proposed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Legal, and both cells hold the same value; the pair is won.
    Matched {
        /// The face value both cells share.
        value: PairValue,
    },
    /// Legal, but the values differ; nothing changes.
    Miss,
    /// Structurally invalid; nothing changes.
    Illegal(IllegalMove),
}

/// Classifies the move `(a, b)` against the current board.
///
/// The checks apply in order: each index must be in range, the two indices
/// must differ, neither cell may already be revealed, and only then are the
/// face values compared. A miss is a legal move; it simply wins nothing.
#[instrument(skip(board, revealed))]
pub fn validate(board: &Board, revealed: &RevealedMask, a: usize, b: usize) -> MoveOutcome {
    let num_cells = board.num_cells();
    for index in [a, b] {
        if index >= num_cells {
            return MoveOutcome::Illegal(IllegalMove::OutOfRange { index, num_cells });
        }
    }
    if a == b {
        return MoveOutcome::Illegal(IllegalMove::SameCell { index: a });
    }
    for index in [a, b] {
        if revealed.is_revealed(index) {
            return MoveOutcome::Illegal(IllegalMove::AlreadyRevealed { index });
        }
    }
    match (board.value(a), board.value(b)) {
        (Some(left), Some(right)) if left == right => MoveOutcome::Matched { value: left },
        _ => MoveOutcome::Miss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Board;

    fn fixture() -> (Board, RevealedMask) {
        let board = Board::from_cells(vec![1, 2, 1, 2]).unwrap();
        let revealed = RevealedMask::hidden(board.num_cells());
        (board, revealed)
    }

    #[test]
    fn matching_pair_is_matched() {
        let (board, revealed) = fixture();
        assert_eq!(
            validate(&board, &revealed, 0, 2),
            MoveOutcome::Matched { value: 1 }
        );
        assert_eq!(
            validate(&board, &revealed, 3, 1),
            MoveOutcome::Matched { value: 2 }
        );
    }

    #[test]
    fn unequal_values_are_a_miss() {
        let (board, revealed) = fixture();
        assert_eq!(validate(&board, &revealed, 0, 1), MoveOutcome::Miss);
    }

    #[test]
    fn out_of_range_is_rejected_first() {
        let (board, revealed) = fixture();
        // Index 9 is out of range even though it also "equals itself".
        assert_eq!(
            validate(&board, &revealed, 9, 9),
            MoveOutcome::Illegal(IllegalMove::OutOfRange {
                index: 9,
                num_cells: 4
            })
        );
        assert_eq!(
            validate(&board, &revealed, 1, 4),
            MoveOutcome::Illegal(IllegalMove::OutOfRange {
                index: 4,
                num_cells: 4
            })
        );
    }

    #[test]
    fn same_cell_twice_is_rejected() {
        let (board, revealed) = fixture();
        assert_eq!(
            validate(&board, &revealed, 2, 2),
            MoveOutcome::Illegal(IllegalMove::SameCell { index: 2 })
        );
    }

    #[test]
    fn revealed_cells_cannot_be_picked_again() {
        let (board, mut revealed) = fixture();
        revealed.reveal(0);
        revealed.reveal(2);
        assert_eq!(
            validate(&board, &revealed, 0, 2),
            MoveOutcome::Illegal(IllegalMove::AlreadyRevealed { index: 0 })
        );
        // A mixed pick reports the revealed half.
        assert_eq!(
            validate(&board, &revealed, 1, 2),
            MoveOutcome::Illegal(IllegalMove::AlreadyRevealed { index: 2 })
        );
    }

    #[test]
    fn validation_never_mutates_the_mask() {
        let (board, revealed) = fixture();
        let before = revealed.clone();
        let _ = validate(&board, &revealed, 0, 2);
        let _ = validate(&board, &revealed, 0, 0);
        assert_eq!(revealed, before);
    }
}

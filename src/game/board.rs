//! Board layout and the reveal overlay.

use derive_more::{Display, Error};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Face value of a cell. Values run `1..=num_pairs`, each appearing twice.
pub type PairValue = u16;

/// Square grid of face values, fixed at game start.
///
/// The cell sequence is immutable once constructed; which cells are visible
/// is tracked separately in [`RevealedMask`] so snapshots can share the
/// layout while the overlay evolves round by round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Face values in row-major order.
    cells: Vec<PairValue>,
    /// Length of one side of the square grid.
    side: usize,
}

/// Errors constructing a board layout.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum LayoutError {
    /// The side length is below the minimum playable grid.
    #[display("board side {side} is too small (minimum 2)")]
    SideTooSmall {
        /// Requested side length.
        side: usize,
    },
    /// The grid would hold an odd number of cells and cannot be paired.
    #[display("board side {side} gives an odd cell count; side must be even")]
    OddCellCount {
        /// Requested side length.
        side: usize,
    },
    /// The grid would hold more pairs than a face value can number.
    #[display("board side {side} needs pair values beyond {max}")]
    SideTooLarge {
        /// Requested side length.
        side: usize,
        /// Largest representable pair value.
        max: PairValue,
    },
    /// A fixture layout is not a square grid.
    #[display("{cells} cells do not form a square grid")]
    NotSquare {
        /// Number of cells supplied.
        cells: usize,
    },
    /// A fixture layout does not contain exactly two of each pair value.
    #[display("value {value} appears {count} times; every value must appear exactly twice")]
    UnpairedValue {
        /// The offending face value.
        value: PairValue,
        /// How often it appeared.
        count: usize,
    },
    /// A fixture layout contains a value outside `1..=num_pairs`.
    #[display("value {value} is outside 1..={num_pairs}")]
    ValueOutOfRange {
        /// The offending face value.
        value: PairValue,
        /// Number of pairs the grid holds.
        num_pairs: usize,
    },
}

impl Board {
    /// Builds a shuffled board of `side * side` cells.
    ///
    /// The paired sequence `1,1,2,2,…` is permuted in place with the
    /// Fisher–Yates shuffle behind [`SliceRandom::shuffle`], so every
    /// ordering of the cells is reachable from a suitable RNG state.
    #[instrument(skip(rng))]
    pub fn shuffled<R: Rng>(side: usize, rng: &mut R) -> Result<Self, LayoutError> {
        Self::check_side(side)?;

        let num_cells = side * side;
        let mut cells: Vec<PairValue> = Vec::with_capacity(num_cells);
        for pair in 1..=(num_cells / 2) {
            cells.push(pair as PairValue);
            cells.push(pair as PairValue);
        }
        cells.shuffle(rng);

        Ok(Self { cells, side })
    }

    /// Builds a board from an explicit cell sequence.
    ///
    /// Intended for fixtures and replays; validates that the cells form a
    /// square grid containing exactly two of each value `1..=num_pairs`.
    pub fn from_cells(cells: Vec<PairValue>) -> Result<Self, LayoutError> {
        let side = (cells.len() as f64).sqrt() as usize;
        if side * side != cells.len() {
            return Err(LayoutError::NotSquare { cells: cells.len() });
        }
        Self::check_side(side)?;

        let num_pairs = cells.len() / 2;
        let mut counts = vec![0usize; num_pairs + 1];
        for &value in &cells {
            if value == 0 || value as usize > num_pairs {
                return Err(LayoutError::ValueOutOfRange { value, num_pairs });
            }
            counts[value as usize] += 1;
        }
        for (value, &count) in counts.iter().enumerate().skip(1) {
            if count != 2 {
                return Err(LayoutError::UnpairedValue {
                    value: value as PairValue,
                    count,
                });
            }
        }

        Ok(Self { cells, side })
    }

    fn check_side(side: usize) -> Result<(), LayoutError> {
        if side < 2 {
            return Err(LayoutError::SideTooSmall { side });
        }
        if (side * side) % 2 != 0 {
            return Err(LayoutError::OddCellCount { side });
        }
        // Pair values must fit `PairValue` without wrapping.
        if side * side / 2 > PairValue::MAX as usize {
            return Err(LayoutError::SideTooLarge {
                side,
                max: PairValue::MAX,
            });
        }
        Ok(())
    }

    /// Length of one side of the grid.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of pairs hidden in the grid.
    pub fn num_pairs(&self) -> usize {
        self.cells.len() / 2
    }

    /// Face value at `index`, if in range.
    pub fn value(&self, index: usize) -> Option<PairValue> {
        self.cells.get(index).copied()
    }

    /// All face values in row-major order.
    pub fn cells(&self) -> &[PairValue] {
        &self.cells
    }
}

/// Per-cell visibility overlay, same length as the board.
///
/// Flags only ever transition `false → true`, two at a time, when the
/// coordinator confirms a match; nothing ever hides a cell again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedMask {
    flags: Vec<bool>,
}

impl RevealedMask {
    /// Creates an all-hidden mask for `num_cells` cells.
    pub fn hidden(num_cells: usize) -> Self {
        Self {
            flags: vec![false; num_cells],
        }
    }

    /// Whether the cell at `index` is face up. Out-of-range reads as hidden.
    pub fn is_revealed(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Number of cells currently face up.
    pub fn revealed_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Number of cells tracked by the mask.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// True when the mask tracks no cells.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// The raw flags in cell order.
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Turns the cell at `index` face up. Reveals never revert.
    pub(super) fn reveal(&mut self, index: usize) {
        debug_assert!(index < self.flags.len(), "reveal index out of range");
        self.flags[index] = true;
    }
}

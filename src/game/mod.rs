//! Game domain: board layout, reveal overlay, owned state, move rules.

mod board;
mod state;
mod validate;

pub use board::{Board, LayoutError, PairValue, RevealedMask};
pub use state::GameState;
pub use validate::{validate, IllegalMove, MoveOutcome};

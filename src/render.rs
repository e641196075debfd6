//! Console presentation of a board snapshot.

use crate::game::{Board, RevealedMask};
use crate::protocol::RoundSnapshot;
use anyhow::Result;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Renders round snapshots for one seat.
///
/// Rendering is presentation only; the round loop calls it once per round
/// and otherwise ignores it, so implementations must not block on input.
pub trait BoardRenderer: Send {
    /// Shows `snapshot` to whoever is behind this seat.
    fn render(&mut self, snapshot: &RoundSnapshot) -> Result<()>;
}

/// Formats the grid with revealed values as width-2 numbers and hidden
/// cells as `*`, one row per line.
pub fn format_board(board: &Board, revealed: &RevealedMask) -> String {
    let mut out = String::with_capacity(board.num_cells() * 3 + board.side());
    for (index, &value) in board.cells().iter().enumerate() {
        if revealed.is_revealed(index) {
            let _ = write!(out, "{value:>2} ");
        } else {
            out.push_str(" * ");
        }
        if (index + 1) % board.side() == 0 {
            out.push('\n');
        }
    }
    out
}

/// Prints each snapshot's grid to stdout for a human at the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleRenderer;

impl BoardRenderer for ConsoleRenderer {
    fn render(&mut self, snapshot: &RoundSnapshot) -> Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "\nCurrent Board:")?;
        write!(out, "{}", format_board(snapshot.board(), snapshot.revealed()))?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

/// Discards every snapshot. Used for automated seats.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentRenderer;

impl BoardRenderer for SilentRenderer {
    fn render(&mut self, _snapshot: &RoundSnapshot) -> Result<()> {
        Ok(())
    }
}

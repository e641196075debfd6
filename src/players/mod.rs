//! Move sources: who or what decides a seat's two cells each round.

mod auto;
mod human;
mod scripted;

pub use auto::AutoSource;
pub use human::HumanSource;
pub use scripted::ScriptedSource;

use crate::protocol::RoundSnapshot;
use anyhow::Result;

/// Supplies one move per round for a seat.
#[async_trait::async_trait]
pub trait MoveSource: Send {
    /// Picks two cell indices to turn over, given this round's snapshot.
    ///
    /// The seat screens the answer for structural legality and asks again
    /// after a rejection, so a source may answer optimistically; it must
    /// not assume its last answer was accepted.
    async fn propose_move(&mut self, snapshot: &RoundSnapshot) -> Result<(usize, usize)>;

    /// Display name for logs and prompts.
    fn name(&self) -> &str;
}

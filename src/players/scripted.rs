//! Scripted source for tests and demos.

use super::MoveSource;
use crate::protocol::RoundSnapshot;
use anyhow::Result;
use std::collections::VecDeque;

/// Plays a fixed list of moves in order and fails once it runs dry.
///
/// Running dry is deliberately an error, not a pass: a seat with no move
/// left would otherwise stall the whole table, and a test is better off
/// failing loudly with the script's name in the message.
pub struct ScriptedSource {
    name: String,
    moves: VecDeque<(usize, usize)>,
}

impl ScriptedSource {
    /// Creates a source that will play `moves` front to back.
    pub fn new(name: impl Into<String>, moves: Vec<(usize, usize)>) -> Self {
        Self {
            name: name.into(),
            moves: moves.into(),
        }
    }

    /// Moves not yet played.
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

#[async_trait::async_trait]
impl MoveSource for ScriptedSource {
    async fn propose_move(&mut self, _snapshot: &RoundSnapshot) -> Result<(usize, usize)> {
        match self.moves.pop_front() {
            Some(pair) => Ok(pair),
            None => anyhow::bail!("script '{}' ran out of moves", self.name),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

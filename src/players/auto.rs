//! Automated source with perfect recall of the open board.
//!
//! Cell values are visible in every snapshot, so a bot does not need to
//! memorize anything; it just picks a hidden pair. Seats are given
//! staggered picks so several bots acting on the same snapshot tend to
//! claim different pairs instead of racing for the first one.

use super::MoveSource;
use crate::game::PairValue;
use crate::protocol::{ParticipantId, RoundSnapshot};
use anyhow::Result;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Deterministic bot: takes the `offset`-th hidden pair, wrapping around.
pub struct AutoSource {
    name: String,
    offset: usize,
}

impl AutoSource {
    /// Creates a bot for the seat `participant`.
    ///
    /// The seat number doubles as the stagger: seat 1 takes the first
    /// hidden pair, seat 2 the second, and so on.
    pub fn new(participant: ParticipantId) -> Self {
        Self {
            name: format!("auto-{participant}"),
            offset: participant.saturating_sub(1),
        }
    }
}

#[async_trait::async_trait]
impl MoveSource for AutoSource {
    async fn propose_move(&mut self, snapshot: &RoundSnapshot) -> Result<(usize, usize)> {
        let pairs = hidden_pairs(snapshot);
        if pairs.is_empty() {
            anyhow::bail!("{} was asked to move on a finished board", self.name);
        }
        Ok(pairs[self.offset % pairs.len()])
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Lists every fully hidden pair as `(first, second)` cell indices.
///
/// Reveals only ever happen two matching cells at a time, so any value on
/// the board is either fully hidden or fully revealed; a value seen once
/// among the hidden cells will always be seen again.
fn hidden_pairs(snapshot: &RoundSnapshot) -> Vec<(usize, usize)> {
    let board = snapshot.board();
    let revealed = snapshot.revealed();
    let mut first_seen: HashMap<PairValue, usize> = HashMap::new();
    let mut pairs = Vec::new();
    for (index, &value) in board.cells().iter().enumerate() {
        if revealed.is_revealed(index) {
            continue;
        }
        match first_seen.entry(value) {
            Entry::Occupied(first) => pairs.push((*first.get(), index)),
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, GameState};

    fn snapshot_of(state: &GameState) -> RoundSnapshot {
        state.snapshot(1)
    }

    fn fixture() -> GameState {
        GameState::new(Board::from_cells(vec![1, 2, 1, 2]).unwrap())
    }

    #[tokio::test]
    async fn staggered_seats_claim_distinct_pairs() {
        let state = fixture();
        let snapshot = snapshot_of(&state);

        let mut first = AutoSource::new(1);
        let mut second = AutoSource::new(2);
        assert_eq!(first.propose_move(&snapshot).await.unwrap(), (0, 2));
        assert_eq!(second.propose_move(&snapshot).await.unwrap(), (1, 3));
    }

    #[tokio::test]
    async fn offsets_wrap_when_few_pairs_remain() {
        let mut state = fixture();
        state.apply_match(0, 2);
        let snapshot = snapshot_of(&state);

        // One pair left; every seat falls back to it.
        let mut third = AutoSource::new(3);
        assert_eq!(third.propose_move(&snapshot).await.unwrap(), (1, 3));
    }

    #[tokio::test]
    async fn refuses_to_move_on_a_finished_board() {
        let mut state = fixture();
        state.apply_match(0, 2);
        state.apply_match(1, 3);
        let snapshot = snapshot_of(&state);

        let mut bot = AutoSource::new(1);
        assert!(bot.propose_move(&snapshot).await.is_err());
    }
}

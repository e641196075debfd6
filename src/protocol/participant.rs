//! The participant's round loop.
//!
//! A participant is a thin shell around a [`MoveSource`]: it receives the
//! round snapshot, observes both termination announcements, and relays one
//! move per round. It trusts nothing about ordering it can check: a
//! snapshot that is not for the next round ends the task with
//! [`ProtocolError::StaleSnapshot`].

use super::error::ProtocolError;
use super::link::CoordinatorLink;
use super::message::{MoveProposal, RoundSnapshot};
use crate::game::{validate, MoveOutcome};
use crate::players::MoveSource;
use crate::render::BoardRenderer;
use anyhow::Result;
use tracing::{debug, info, instrument, warn};

/// One seat at the table: a link to the coordinator plus whatever decides
/// the moves.
pub struct Participant {
    link: CoordinatorLink,
    source: Box<dyn MoveSource>,
    renderer: Box<dyn BoardRenderer>,
    round: u64,
}

impl Participant {
    /// Seats `source` behind `link`, rendering each round with `renderer`.
    pub fn new(
        link: CoordinatorLink,
        source: Box<dyn MoveSource>,
        renderer: Box<dyn BoardRenderer>,
    ) -> Self {
        Self {
            link,
            source,
            renderer,
            round: 0,
        }
    }

    /// Plays rounds until the coordinator announces the game is over.
    #[instrument(skip(self), fields(participant = self.link.id()))]
    pub async fn run(mut self) -> Result<()> {
        info!(
            participant = self.link.id(),
            source = self.source.name(),
            "participant ready"
        );

        loop {
            let snapshot = self.link.recv_snapshot().await?;
            let expected = self.round + 1;
            if snapshot.round() != expected {
                return Err(ProtocolError::StaleSnapshot {
                    expected,
                    got: snapshot.round(),
                }
                .into());
            }
            self.round = snapshot.round();

            if self.link.next_flag().await? {
                debug!(
                    participant = self.link.id(),
                    round = self.round,
                    "game over announced at distribution"
                );
                return Ok(());
            }

            let (a, b) = self.request_move(&snapshot).await?;
            self.link
                .send_move(MoveProposal::new(self.round, a, b))
                .await?;

            if self.link.next_flag().await? {
                debug!(
                    participant = self.link.id(),
                    round = self.round,
                    "game over announced after moves"
                );
                return Ok(());
            }
        }
    }

    /// Shows the board, then asks the source until it produces a move that
    /// is at least structurally legal against this round's snapshot.
    ///
    /// The screen is a courtesy: it spares the table a wasted round on a
    /// move the coordinator is certain to reject. Misses pass through; only
    /// the coordinator settles whether a legal move matches anything.
    async fn request_move(&mut self, snapshot: &RoundSnapshot) -> Result<(usize, usize)> {
        self.renderer.render(snapshot)?;
        loop {
            let (a, b) = self.source.propose_move(snapshot).await?;
            match validate(snapshot.board(), snapshot.revealed(), a, b) {
                MoveOutcome::Illegal(reason) => {
                    warn!(
                        participant = self.link.id(),
                        round = self.round,
                        a,
                        b,
                        %reason,
                        "move is not legal here; asking again"
                    );
                }
                _ => return Ok((a, b)),
            }
        }
    }
}

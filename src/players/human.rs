//! Human at a terminal, answering prompts on stdin.

use super::MoveSource;
use crate::protocol::{ParticipantId, RoundSnapshot};
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Prompts on stdout and reads move pairs from stdin, one line per move.
///
/// Only parsing happens here. A pair that parses but names a bad cell is
/// handed up anyway; the seat's legality screen sends it back and the
/// prompt repeats.
pub struct HumanSource {
    participant: ParticipantId,
    name: String,
    lines: Lines<BufReader<Stdin>>,
}

impl HumanSource {
    /// Creates a prompt-driven source for the seat `participant`.
    pub fn new(participant: ParticipantId) -> Self {
        Self {
            participant,
            name: format!("player-{participant}"),
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait::async_trait]
impl MoveSource for HumanSource {
    async fn propose_move(&mut self, snapshot: &RoundSnapshot) -> Result<(usize, usize)> {
        let limit = snapshot.board().num_cells() - 1;
        loop {
            {
                let mut out = std::io::stdout().lock();
                write!(
                    out,
                    "Player {}, enter two hidden positions (0–{limit}): ",
                    self.participant
                )?;
                out.flush()?;
            }

            let Some(line) = self.lines.next_line().await? else {
                anyhow::bail!("input closed while player {} was choosing", self.participant);
            };
            if let Some(pair) = parse_pair(&line) {
                return Ok(pair);
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Parses a line holding exactly two whitespace-separated cell indices.
fn parse_pair(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let a = parts.next()?.parse().ok()?;
    let b = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((a, b))
}

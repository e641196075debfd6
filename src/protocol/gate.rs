//! Termination agreement between the coordinator and every participant.
//!
//! The coordinator is the only process that can decide the game is over,
//! but every process must observe that decision before any of them leaves
//! the round loop. The gate fans one boolean out to all participants per
//! announcement; in a round it is called at exactly two fixed points —
//! after distributing snapshots and after collecting moves — and each
//! watch consumes exactly one value per announcement, in order. Any watch
//! that falls out of step has broken the lock-step contract and fails
//! rather than resynchronize silently.

use super::error::ProtocolError;
use super::message::ParticipantId;
use tokio::sync::broadcast;
use tracing::{debug, instrument};

/// Announcements in flight per watch never exceed two in lock-step (the
/// post-collection flag of one round plus the post-distribution flag of
/// the next); the extra slack keeps a lag strictly diagnostic.
const FLAG_CAPACITY: usize = 8;

/// Coordinator-side handle announcing the termination flag to all watches.
#[derive(Debug)]
pub struct TerminationGate {
    tx: broadcast::Sender<bool>,
}

impl TerminationGate {
    /// Creates a gate with no watches yet.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FLAG_CAPACITY);
        Self { tx }
    }

    /// Registers a watch for `participant`. Must happen before the first
    /// announcement the watch is expected to observe.
    pub fn watch(&self, participant: ParticipantId) -> TerminationWatch {
        TerminationWatch {
            participant,
            rx: self.tx.subscribe(),
        }
    }

    /// Announces `game_over` to every watch and hands the value back.
    ///
    /// All watches observe announcements in the same order, so every
    /// process that proceeds past announcement *k* has seen the same
    /// boolean for *k*.
    #[instrument(skip(self))]
    pub fn announce(&self, game_over: bool) -> Result<bool, ProtocolError> {
        match self.tx.send(game_over) {
            Ok(listeners) => {
                debug!(game_over, listeners, "termination flag announced");
                Ok(game_over)
            }
            Err(_) => Err(ProtocolError::NoListeners),
        }
    }
}

impl Default for TerminationGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Participant-side view of the announcement stream.
#[derive(Debug)]
pub struct TerminationWatch {
    participant: ParticipantId,
    rx: broadcast::Receiver<bool>,
}

impl TerminationWatch {
    /// Waits for the next announcement.
    ///
    /// A closed stream means the coordinator is gone; a lagged stream
    /// means this watch skipped an announcement. Both are fatal.
    pub async fn next(&mut self) -> Result<bool, ProtocolError> {
        match self.rx.recv().await {
            Ok(flag) => Ok(flag),
            Err(broadcast::error::RecvError::Closed) => Err(ProtocolError::CoordinatorGone {
                participant: self.participant,
            }),
            Err(broadcast::error::RecvError::Lagged(missed)) => Err(ProtocolError::FlagsMissed {
                participant: self.participant,
                missed,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_watch_observes_the_same_sequence() {
        let gate = TerminationGate::new();
        let mut watches: Vec<_> = (1..=3).map(|id| gate.watch(id)).collect();

        assert!(!gate.announce(false).unwrap());
        assert!(!gate.announce(false).unwrap());
        assert!(gate.announce(true).unwrap());

        for watch in &mut watches {
            assert!(!watch.next().await.unwrap());
            assert!(!watch.next().await.unwrap());
            assert!(watch.next().await.unwrap());
        }
    }

    #[tokio::test]
    async fn late_watches_are_not_part_of_the_round() {
        let gate = TerminationGate::new();
        let mut early = gate.watch(1);

        gate.announce(false).unwrap();
        let mut late = gate.watch(2);
        gate.announce(true).unwrap();

        assert!(!early.next().await.unwrap());
        assert!(early.next().await.unwrap());
        // The late watch only sees announcements made after it subscribed.
        assert!(late.next().await.unwrap());
    }

    #[tokio::test]
    async fn announcing_into_silence_is_an_error() {
        let gate = TerminationGate::new();
        assert_eq!(gate.announce(true), Err(ProtocolError::NoListeners));
    }

    #[tokio::test]
    async fn a_lagged_watch_reports_the_missed_announcements() {
        let gate = TerminationGate::new();
        let mut watch = gate.watch(1);

        // One announcement more than the stream holds; the idle watch has
        // lost the oldest one and must say so rather than skip it.
        for _ in 0..=FLAG_CAPACITY {
            gate.announce(false).unwrap();
        }

        assert_eq!(
            watch.next().await,
            Err(ProtocolError::FlagsMissed {
                participant: 1,
                missed: 1
            })
        );
    }

    #[tokio::test]
    async fn dropped_gate_fails_the_watch() {
        let gate = TerminationGate::new();
        let mut watch = gate.watch(4);
        drop(gate);

        assert_eq!(
            watch.next().await,
            Err(ProtocolError::CoordinatorGone { participant: 4 })
        );
    }
}

//! Fatal protocol desynchronization errors.
//!
//! Every variant here means a process observed something its current loop
//! state cannot explain: a peer vanished mid-round, a message arrived
//! tagged with the wrong round, or a flag announcement was missed. None of
//! these are recoverable; the owning task stops with the diagnostic instead
//! of guessing at the peer's state.

use crate::protocol::ParticipantId;
use derive_more::{Display, Error};

/// A violated ordering invariant of the round protocol.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProtocolError {
    /// The coordinator lost a participant before its move arrived.
    #[display("participant {participant} disconnected mid-round")]
    ParticipantGone {
        /// Which participant vanished.
        participant: ParticipantId,
    },
    /// A participant lost the coordinator while waiting on it.
    #[display("coordinator closed the channel while participant {participant} was mid-round")]
    CoordinatorGone {
        /// The participant that observed the closure.
        participant: ParticipantId,
    },
    /// A snapshot arrived tagged with an unexpected round.
    #[display("expected the snapshot for round {expected}, got round {got}")]
    StaleSnapshot {
        /// Round the participant was waiting for.
        expected: u64,
        /// Round the snapshot claims to belong to.
        got: u64,
    },
    /// A move arrived tagged with an unexpected round.
    #[display("participant {participant} answered round {got} during round {expected}")]
    MoveRoundMismatch {
        /// The participant whose move is out of step.
        participant: ParticipantId,
        /// Round the coordinator is collecting.
        expected: u64,
        /// Round the proposal claims to answer.
        got: u64,
    },
    /// A termination watch fell behind the announcement stream.
    #[display("termination watch for participant {participant} missed {missed} announcement(s)")]
    FlagsMissed {
        /// The participant whose watch lagged.
        participant: ParticipantId,
        /// How many announcements were skipped.
        missed: u64,
    },
    /// The coordinator announced a flag with no participant left listening.
    #[display("termination announcement had no listeners")]
    NoListeners,
}

//! The lock-step round protocol.
//!
//! A game is one coordinator task and N participant tasks advancing through
//! rounds in strict lock-step. Each round runs the same fixed sequence:
//!
//! 1. the coordinator distributes a [`RoundSnapshot`] to every participant,
//! 2. it announces the termination flag (true ends the game for everyone),
//! 3. it collects one [`MoveProposal`] per participant in ascending id
//!    order and applies the legal matches,
//! 4. it announces the flag again, recomputed over the round's matches.
//!
//! Every exchange blocks until the peer acts; there are no timeouts. The
//! protocol is synchronized by construction, and both sides carry round
//! tags so a broken interleaving surfaces as a [`ProtocolError`] instead of
//! a silent desync.

mod coordinator;
mod error;
mod gate;
mod link;
mod message;
mod participant;

pub use coordinator::{Coordinator, GameEvent, GameSummary};
pub use error::ProtocolError;
pub use gate::{TerminationGate, TerminationWatch};
pub use link::{connect, CoordinatorLink, ParticipantLink};
pub use message::{MoveProposal, ParticipantId, RoundSnapshot};
pub use participant::Participant;

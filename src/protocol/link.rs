//! Point-to-point channel pair between the coordinator and one participant.
//!
//! Each participant is wired with its own snapshot channel (coordinator →
//! participant) and move channel (participant → coordinator), plus a watch
//! on the shared termination gate. Channels are bounded with capacity one:
//! the closest async analogue of the rendezvous send/receive the protocol
//! is built around. Lock-step keeps each queue at depth at most one, so a
//! send only parks when the peer is about to consume; neither side can run
//! a round ahead of the other.

use super::error::ProtocolError;
use super::gate::{TerminationGate, TerminationWatch};
use super::message::{MoveProposal, ParticipantId, RoundSnapshot};
use tokio::sync::mpsc;
use tracing::trace;

const CHANNEL_CAPACITY: usize = 1;

/// Coordinator-side endpoints for one participant.
#[derive(Debug)]
pub struct ParticipantLink {
    id: ParticipantId,
    snapshot_tx: mpsc::Sender<RoundSnapshot>,
    move_rx: mpsc::Receiver<MoveProposal>,
}

/// Participant-side endpoints for the coordinator.
#[derive(Debug)]
pub struct CoordinatorLink {
    id: ParticipantId,
    snapshot_rx: mpsc::Receiver<RoundSnapshot>,
    move_tx: mpsc::Sender<MoveProposal>,
    flags: TerminationWatch,
}

/// Wires both sides of the connection for `participant`, registering its
/// termination watch on `gate`.
pub fn connect(
    participant: ParticipantId,
    gate: &TerminationGate,
) -> (ParticipantLink, CoordinatorLink) {
    let (snapshot_tx, snapshot_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (move_tx, move_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let coordinator_side = ParticipantLink {
        id: participant,
        snapshot_tx,
        move_rx,
    };
    let participant_side = CoordinatorLink {
        id: participant,
        snapshot_rx,
        move_tx,
        flags: gate.watch(participant),
    };
    (coordinator_side, participant_side)
}

impl ParticipantLink {
    /// The participant this link reaches.
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// Delivers the round snapshot to the participant.
    pub async fn send_snapshot(&self, snapshot: RoundSnapshot) -> Result<(), ProtocolError> {
        trace!(participant = self.id, round = snapshot.round(), "sending snapshot");
        self.snapshot_tx
            .send(snapshot)
            .await
            .map_err(|_| ProtocolError::ParticipantGone {
                participant: self.id,
            })
    }

    /// Waits for the participant's move. Blocks the round until it arrives.
    pub async fn recv_move(&mut self) -> Result<MoveProposal, ProtocolError> {
        self.move_rx
            .recv()
            .await
            .ok_or(ProtocolError::ParticipantGone {
                participant: self.id,
            })
    }
}

impl CoordinatorLink {
    /// This participant's own id.
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// Waits for the next round's snapshot.
    pub async fn recv_snapshot(&mut self) -> Result<RoundSnapshot, ProtocolError> {
        self.snapshot_rx
            .recv()
            .await
            .ok_or(ProtocolError::CoordinatorGone {
                participant: self.id,
            })
    }

    /// Sends this round's move to the coordinator.
    pub async fn send_move(&self, proposal: MoveProposal) -> Result<(), ProtocolError> {
        trace!(participant = self.id, round = proposal.round(), "sending move");
        self.move_tx
            .send(proposal)
            .await
            .map_err(|_| ProtocolError::CoordinatorGone {
                participant: self.id,
            })
    }

    /// Waits for the next termination announcement.
    pub async fn next_flag(&mut self) -> Result<bool, ProtocolError> {
        self.flags.next().await
    }
}

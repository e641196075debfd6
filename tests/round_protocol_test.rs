//! Tests for the lock-step round protocol, driving the coordinator over
//! raw participant links so every message and flag is visible.

use matchlock::{
    connect, Board, Coordinator, GameEvent, GameState, IllegalMove, MoveProposal, ProtocolError,
    TerminationGate,
};
use tokio::sync::mpsc;

fn fixture_state() -> GameState {
    GameState::new(Board::from_cells(vec![1, 2, 1, 2]).unwrap())
}

fn drain(events: &mut mpsc::UnboundedReceiver<GameEvent>) -> Vec<GameEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

#[tokio::test]
async fn a_full_game_follows_the_lock_step_trajectory() {
    let gate = TerminationGate::new();
    let (link, mut side) = connect(1, &gate);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let coordinator = Coordinator::new(fixture_state(), vec![link], gate, event_tx);
    let run = tokio::spawn(coordinator.run());

    // Round 1: snapshot, continue flag, one match, continue flag.
    let snapshot = side.recv_snapshot().await.unwrap();
    assert_eq!(snapshot.round(), 1);
    assert_eq!(snapshot.revealed().revealed_count(), 0);
    assert!(!side.next_flag().await.unwrap());
    side.send_move(MoveProposal::new(1, 0, 2)).await.unwrap();
    assert!(!side.next_flag().await.unwrap());

    // Round 2: the snapshot reflects round 1's match, and the flag after
    // the last match ends the game without opening a third round.
    let snapshot = side.recv_snapshot().await.unwrap();
    assert_eq!(snapshot.round(), 2);
    assert_eq!(snapshot.revealed().flags(), &[true, false, true, false]);
    assert!(!side.next_flag().await.unwrap());
    side.send_move(MoveProposal::new(2, 1, 3)).await.unwrap();
    assert!(side.next_flag().await.unwrap());

    // Nothing is distributed after the final announcement.
    assert_eq!(
        side.recv_snapshot().await,
        Err(ProtocolError::CoordinatorGone { participant: 1 })
    );

    let summary = run.await.unwrap().unwrap();
    assert_eq!(*summary.rounds(), 2);
    assert_eq!(*summary.matches(), 2);
    assert_eq!(summary.final_state().revealed().revealed_count(), 4);

    assert_eq!(
        drain(&mut event_rx),
        vec![
            GameEvent::RoundStarted { round: 1 },
            GameEvent::Matched {
                participant: 1,
                a: 0,
                b: 2,
                value: 1
            },
            GameEvent::RoundStarted { round: 2 },
            GameEvent::Matched {
                participant: 1,
                a: 1,
                b: 3,
                value: 2
            },
            GameEvent::GameOver {
                rounds: 2,
                matches: 2
            },
        ]
    );
}

#[tokio::test]
async fn one_match_on_a_larger_board_reveals_exactly_that_pair() {
    let cells = vec![1, 2, 3, 4, 1, 2, 3, 4, 5, 6, 7, 8, 5, 6, 7, 8];
    let state = GameState::new(Board::from_cells(cells).unwrap());
    let gate = TerminationGate::new();
    let (link, mut side) = connect(1, &gate);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let coordinator = Coordinator::new(state, vec![link], gate, event_tx);
    let run = tokio::spawn(coordinator.run());

    // Round 1: cells 0 and 4 both hold value 1.
    let snapshot = side.recv_snapshot().await.unwrap();
    assert_eq!(snapshot.board().num_pairs(), 8);
    assert!(!side.next_flag().await.unwrap());
    side.send_move(MoveProposal::new(1, 0, 4)).await.unwrap();
    assert!(!side.next_flag().await.unwrap());

    // Round 2's snapshot shows that pair and nothing else.
    let snapshot = side.recv_snapshot().await.unwrap();
    assert_eq!(snapshot.revealed().revealed_count(), 2);
    assert!(snapshot.revealed().is_revealed(0));
    assert!(snapshot.revealed().is_revealed(4));
    assert!(!side.next_flag().await.unwrap());
    assert_eq!(
        drain(&mut event_rx),
        vec![
            GameEvent::RoundStarted { round: 1 },
            GameEvent::Matched {
                participant: 1,
                a: 0,
                b: 4,
                value: 1
            },
            GameEvent::RoundStarted { round: 2 },
        ]
    );

    // Seven pairs stay on the table; walking away mid-round is the
    // disconnection case, not a quiet finish.
    drop(side);
    assert_eq!(
        run.await.unwrap().unwrap_err(),
        ProtocolError::ParticipantGone { participant: 1 }
    );
}

#[tokio::test]
async fn misses_and_illegal_moves_leave_the_board_alone() {
    let gate = TerminationGate::new();
    let (link, mut side) = connect(1, &gate);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let coordinator = Coordinator::new(fixture_state(), vec![link], gate, event_tx);
    let run = tokio::spawn(coordinator.run());

    // Round 1: same cell twice. Rejected, nothing revealed.
    let snapshot = side.recv_snapshot().await.unwrap();
    assert!(!side.next_flag().await.unwrap());
    side.send_move(MoveProposal::new(1, 0, 0)).await.unwrap();
    assert!(!side.next_flag().await.unwrap());
    assert_eq!(snapshot.revealed().revealed_count(), 0);

    // Round 2: a legal miss. Still nothing revealed.
    let snapshot = side.recv_snapshot().await.unwrap();
    assert_eq!(snapshot.revealed().revealed_count(), 0);
    assert!(!side.next_flag().await.unwrap());
    side.send_move(MoveProposal::new(2, 0, 1)).await.unwrap();
    assert!(!side.next_flag().await.unwrap());

    // Rounds 3 and 4: clean up both pairs.
    let snapshot = side.recv_snapshot().await.unwrap();
    assert_eq!(snapshot.revealed().revealed_count(), 0);
    assert!(!side.next_flag().await.unwrap());
    side.send_move(MoveProposal::new(3, 0, 2)).await.unwrap();
    assert!(!side.next_flag().await.unwrap());

    let snapshot = side.recv_snapshot().await.unwrap();
    assert_eq!(snapshot.revealed().flags(), &[true, false, true, false]);
    assert!(!side.next_flag().await.unwrap());
    side.send_move(MoveProposal::new(4, 1, 3)).await.unwrap();
    assert!(side.next_flag().await.unwrap());

    let summary = run.await.unwrap().unwrap();
    assert_eq!(*summary.rounds(), 4);
    assert_eq!(*summary.matches(), 2);

    assert_eq!(
        drain(&mut event_rx),
        vec![
            GameEvent::RoundStarted { round: 1 },
            GameEvent::Rejected {
                participant: 1,
                a: 0,
                b: 0,
                reason: IllegalMove::SameCell { index: 0 }
            },
            GameEvent::RoundStarted { round: 2 },
            GameEvent::Missed {
                participant: 1,
                a: 0,
                b: 1
            },
            GameEvent::RoundStarted { round: 3 },
            GameEvent::Matched {
                participant: 1,
                a: 0,
                b: 2,
                value: 1
            },
            GameEvent::RoundStarted { round: 4 },
            GameEvent::Matched {
                participant: 1,
                a: 1,
                b: 3,
                value: 2
            },
            GameEvent::GameOver {
                rounds: 4,
                matches: 2
            },
        ]
    );
}

#[tokio::test]
async fn moves_are_applied_in_participant_id_order() {
    let gate = TerminationGate::new();
    let (link_one, mut side_one) = connect(1, &gate);
    let (link_two, mut side_two) = connect(2, &gate);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    // Links handed over out of order on purpose.
    let coordinator = Coordinator::new(fixture_state(), vec![link_two, link_one], gate, event_tx);
    let run = tokio::spawn(coordinator.run());

    let snapshot_one = side_one.recv_snapshot().await.unwrap();
    let snapshot_two = side_two.recv_snapshot().await.unwrap();
    assert_eq!(snapshot_one, snapshot_two);
    assert!(!side_one.next_flag().await.unwrap());
    assert!(!side_two.next_flag().await.unwrap());

    // Seat 2 answers first, but seat 1's move is applied first.
    side_two.send_move(MoveProposal::new(1, 1, 3)).await.unwrap();
    side_one.send_move(MoveProposal::new(1, 0, 2)).await.unwrap();

    // Both pairs fell in the same round; everyone sees the same final flag.
    assert!(side_one.next_flag().await.unwrap());
    assert!(side_two.next_flag().await.unwrap());

    let summary = run.await.unwrap().unwrap();
    assert_eq!(*summary.rounds(), 1);
    assert_eq!(*summary.matches(), 2);

    assert_eq!(
        drain(&mut event_rx),
        vec![
            GameEvent::RoundStarted { round: 1 },
            GameEvent::Matched {
                participant: 1,
                a: 0,
                b: 2,
                value: 1
            },
            GameEvent::Matched {
                participant: 2,
                a: 1,
                b: 3,
                value: 2
            },
            GameEvent::GameOver {
                rounds: 1,
                matches: 2
            },
        ]
    );
}

#[tokio::test]
async fn a_move_tagged_with_the_wrong_round_ends_the_game() {
    let gate = TerminationGate::new();
    let (link, mut side) = connect(1, &gate);
    let (event_tx, _event_rx) = mpsc::unbounded_channel();

    let coordinator = Coordinator::new(fixture_state(), vec![link], gate, event_tx);
    let run = tokio::spawn(coordinator.run());

    side.recv_snapshot().await.unwrap();
    assert!(!side.next_flag().await.unwrap());
    side.send_move(MoveProposal::new(7, 0, 2)).await.unwrap();

    assert_eq!(
        run.await.unwrap().unwrap_err(),
        ProtocolError::MoveRoundMismatch {
            participant: 1,
            expected: 1,
            got: 7
        }
    );

    // The coordinator is gone; the participant side observes the closure.
    assert_eq!(
        side.recv_snapshot().await,
        Err(ProtocolError::CoordinatorGone { participant: 1 })
    );
}

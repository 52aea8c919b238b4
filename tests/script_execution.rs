//! Integration tests for script execution
//!
//! Exercises the engine against purpose-built fixtures: goal detection,
//! blocked-move semantics, exhaustion, and the per-step event stream.
//! Every test runs under tokio's paused clock, so the pacing holds elapse
//! in virtual time.

use std::collections::HashSet;

use mazequest::session::grid::CellCoord;
use mazequest::session::level::{Level, LevelCatalog, LevelTheme};
use mazequest::session::state::Outcome;
use mazequest::session::{InstructionKind, StepEvent};
use mazequest::{Session, SessionConfig};

fn test_theme() -> LevelTheme {
    LevelTheme {
        name: "Test".to_string(),
        wall_icon: "#".to_string(),
        goal_icon: "G".to_string(),
        floor_color: "#000000".to_string(),
        wall_color: "#111111".to_string(),
        accent: "slate".to_string(),
    }
}

fn fixture(start: (i32, i32), goal: (i32, i32), walls: &[(i32, i32)]) -> Level {
    Level {
        id: 1,
        theme: test_theme(),
        grid_size: 10,
        start: CellCoord::new(start.0, start.1),
        goal: CellCoord::new(goal.0, goal.1),
        walls: walls
            .iter()
            .map(|&(x, y)| CellCoord::new(x, y))
            .collect::<HashSet<_>>(),
    }
}

fn session_on(level: Level) -> Session {
    Session::with_catalog(
        SessionConfig::default(),
        LevelCatalog::from_levels(vec![level]),
        1,
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_two_step_win_on_open_corridor() {
    let session = session_on(fixture((1, 1), (3, 1), &[]));
    session.append(InstructionKind::MoveRight);
    session.append(InstructionKind::MoveRight);

    let record = session.run().await.expect("run should complete");

    assert_eq!(record.outcome, Outcome::Won);
    assert_eq!(record.steps.len(), 2);
    assert_eq!(record.steps[0].from, CellCoord::new(1, 1));
    assert_eq!(record.steps[0].to, CellCoord::new(2, 1));
    assert_eq!(record.steps[1].to, CellCoord::new(3, 1));

    let view = session.view();
    assert_eq!(view.outcome, Outcome::Won);
    assert!(!view.running);
    assert_eq!(view.sprites[0].position, CellCoord::new(3, 1));
    assert!(view.active_instruction.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_win_skips_remaining_instructions() {
    let session = session_on(fixture((1, 1), (3, 1), &[]));
    for kind in [
        InstructionKind::MoveRight,
        InstructionKind::MoveRight,
        InstructionKind::MoveUp,
        InstructionKind::MoveUp,
    ] {
        session.append(kind);
    }

    let record = session.run().await.expect("run should complete");

    assert_eq!(record.outcome, Outcome::Won);
    assert_eq!(record.steps.len(), 2, "instructions after the goal are skipped");
    assert_eq!(session.view().sprites[0].position, CellCoord::new(3, 1));
}

#[tokio::test(start_paused = true)]
async fn test_blocked_move_consumes_instruction_and_loses() {
    let session = session_on(fixture((1, 1), (3, 1), &[(2, 1)]));
    session.append(InstructionKind::MoveRight);

    let record = session.run().await.expect("run should complete");

    assert_eq!(record.outcome, Outcome::Lost);
    assert_eq!(record.steps.len(), 1);
    assert!(record.steps[0].blocked);
    assert_eq!(record.steps[0].from, CellCoord::new(1, 1));
    assert_eq!(record.steps[0].to, CellCoord::new(1, 1));

    let view = session.view();
    assert_eq!(view.sprites[0].position, CellCoord::new(1, 1));
    assert!(view.blocked.is_none(), "blocked marker clears after the step");
    assert_eq!(view.outcome, Outcome::Lost);
}

#[tokio::test(start_paused = true)]
async fn test_blocked_move_does_not_abort_the_run() {
    let session = session_on(fixture((1, 1), (3, 1), &[(1, 0)]));
    for kind in [
        InstructionKind::MoveUp,
        InstructionKind::MoveRight,
        InstructionKind::MoveRight,
    ] {
        session.append(kind);
    }

    let record = session.run().await.expect("run should complete");

    assert_eq!(record.outcome, Outcome::Won);
    assert_eq!(record.steps.len(), 3);
    assert!(record.steps[0].blocked);
    assert!(!record.steps[1].blocked);
    assert_eq!(session.view().sprites[0].position, CellCoord::new(3, 1));
}

#[tokio::test(start_paused = true)]
async fn test_grid_edge_blocks_like_a_wall() {
    let session = session_on(fixture((1, 1), (5, 5), &[]));
    session.append(InstructionKind::MoveLeft);
    session.append(InstructionKind::MoveLeft);

    let record = session.run().await.expect("run should complete");

    assert_eq!(record.outcome, Outcome::Lost);
    assert_eq!(record.steps[0].to, CellCoord::new(0, 1));
    assert!(record.steps[1].blocked);
    assert_eq!(session.view().sprites[0].position, CellCoord::new(0, 1));
}

#[tokio::test(start_paused = true)]
async fn test_empty_script_is_a_noop() {
    let session = session_on(fixture((1, 1), (3, 1), &[]));

    assert!(session.run().await.is_none());

    let view = session.view();
    assert_eq!(view.outcome, Outcome::Playing);
    assert!(!view.running);
}

#[tokio::test(start_paused = true)]
async fn test_wait_holds_position_and_is_consumed() {
    let session = session_on(fixture((1, 1), (3, 1), &[]));
    for kind in [
        InstructionKind::Wait,
        InstructionKind::MoveRight,
        InstructionKind::MoveRight,
    ] {
        session.append(kind);
    }

    let record = session.run().await.expect("run should complete");

    assert_eq!(record.outcome, Outcome::Won);
    assert_eq!(record.steps.len(), 3);
    assert_eq!(record.steps[0].from, record.steps[0].to);
    assert!(!record.steps[0].blocked);
}

#[tokio::test(start_paused = true)]
async fn test_goal_on_start_still_needs_one_step() {
    let session = session_on(fixture((1, 1), (1, 1), &[]));

    // Zero instructions: the empty-script guard keeps the run a no-op.
    assert!(session.run().await.is_none());
    assert_eq!(session.view().outcome, Outcome::Playing);

    // One wait step: the post-step goal check fires.
    session.append(InstructionKind::Wait);
    let record = session.run().await.expect("run should complete");
    assert_eq!(record.outcome, Outcome::Won);
    assert_eq!(record.steps.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_run_rejected_after_terminal_outcome() {
    let session = session_on(fixture((1, 1), (2, 1), &[]));
    session.append(InstructionKind::MoveRight);

    let record = session.run().await.expect("run should complete");
    assert_eq!(record.outcome, Outcome::Won);

    // The session is terminal; both editing and running are rejected.
    session.append(InstructionKind::MoveRight);
    assert!(session.view().script.is_empty());
    assert!(session.run().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_event_stream_for_a_blocked_step() {
    let session = session_on(fixture((1, 1), (3, 1), &[(2, 1)]));
    session.append(InstructionKind::MoveRight);
    let mut events = session.subscribe();

    session.run().await.expect("run should complete");

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }

    assert!(matches!(received[0], StepEvent::RunStarted { .. }));
    assert!(matches!(received[1], StepEvent::StepBegan { index: 0, .. }));
    match &received[2] {
        StepEvent::Blocked { at, toward, .. } => {
            assert_eq!(*at, CellCoord::new(1, 1));
            assert_eq!(*toward, CellCoord::new(2, 1));
        }
        other => panic!("expected Blocked, got {:?}", other),
    }
    assert!(matches!(received[3], StepEvent::StepSettled { index: 0 }));
    assert!(matches!(
        received[4],
        StepEvent::RunFinished {
            outcome: Outcome::Lost
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_event_stream_for_a_winning_run() {
    let session = session_on(fixture((1, 1), (2, 1), &[]));
    session.append(InstructionKind::MoveRight);
    let mut events = session.subscribe();

    session.run().await.expect("run should complete");

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }

    assert!(matches!(
        received[2],
        StepEvent::Moved { from, to, .. }
            if from == CellCoord::new(1, 1) && to == CellCoord::new(2, 1)
    ));
    assert!(matches!(
        received.last(),
        Some(StepEvent::RunFinished {
            outcome: Outcome::Won
        })
    ));
}

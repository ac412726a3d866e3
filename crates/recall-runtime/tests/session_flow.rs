//! End-to-end session flows: tracker bus -> tick loop -> engine -> broadcasts.

#[allow(dead_code)]
mod common;

use recall_core::cursor::LandmarkName;
use recall_core::events::EngineEvent;
use recall_core::game_registry::GameId;
use recall_core::target::Point;
use recall_core::test_helpers::screen_frame;
use recall_runtime::session_loop::{SessionBroadcast, SessionCommand};
use recall_runtime::tracker_bus::TrackerBus;

use common::{Step, drain, next_step, start_session};

#[tokio::test(start_paused = true)]
async fn countdown_runs_out_and_session_ends() {
    let bus = TrackerBus::new();
    let mut handle = start_session(GameId::WordRain, &bus, Some(2));

    let mut finishes = 0;
    let result = loop {
        match next_step(&mut handle.broadcasts).await {
            Step::Frame(_, events) => finishes += events.iter().filter(|e| e.is_finish()).count(),
            Step::Ended(result, events) => {
                finishes += events.iter().filter(|e| e.is_finish()).count();
                break result;
            },
        }
    };

    assert_eq!(finishes, 1, "SessionFinished is reported exactly once");
    assert_eq!(result.duration_seconds, 2);
    assert_eq!(handle.task.await.expect("task completes"), result);
    assert!(drain(&mut handle.broadcasts).await.is_none(), "nothing after Ended");
}

#[tokio::test(start_paused = true)]
async fn hand_on_the_answer_scores() {
    let bus = TrackerBus::new();
    let mut handle = start_session(GameId::WordRain, &bus, None);

    let mut scored = false;
    for _ in 0..600 {
        let Step::Frame(frame, events) = next_step(&mut handle.broadcasts).await else {
            panic!("session ended before the hand reached the answer");
        };
        if events.iter().any(|e| {
            matches!(
                e,
                EngineEvent::Hit {
                    is_correct: true,
                    by: Some(LandmarkName::RightHand),
                    ..
                }
            )
        }) {
            scored = events.iter().any(|e| matches!(e, EngineEvent::Scored { .. }));
            break;
        }
        // Follow the answer once it is on screen.
        if let Some(answer) = frame.targets.iter().find(|t| t.is_correct && t.y > 5.0) {
            let points = screen_frame(0, &[(LandmarkName::RightHand, Point::new(answer.x, answer.y))]).points;
            bus.publish(points);
        }
    }
    assert!(scored, "catching the answer with the tracked hand must score");

    let _ = handle.commands.send(SessionCommand::Stop);
    let result = handle.task.await.expect("task completes");
    assert_eq!(result.correct_answers, 1);
}

#[tokio::test(start_paused = true)]
async fn pointer_selection_scores() {
    let bus = TrackerBus::new();
    let mut handle = start_session(GameId::BalloonPop, &bus, None);

    let answer = loop {
        let Step::Frame(frame, _) = next_step(&mut handle.broadcasts).await else {
            panic!("session ended early");
        };
        if let Some(t) = frame.targets.iter().find(|t| t.is_correct) {
            break t.id;
        }
    };

    let _ = handle.commands.send(SessionCommand::Select(answer));
    let mut scored = false;
    for _ in 0..5 {
        if let Step::Frame(_, events) = next_step(&mut handle.broadcasts).await
            && events.iter().any(|e| matches!(e, EngineEvent::Scored { .. }))
        {
            scored = true;
            break;
        }
    }
    assert!(scored);

    let _ = handle.commands.send(SessionCommand::Stop);
    let _ = handle.task.await;
}

#[tokio::test(start_paused = true)]
async fn dropping_the_command_sender_cancels_the_session() {
    let bus = TrackerBus::new();
    let mut handle = start_session(GameId::HeaderMatch, &bus, None);
    let _ = next_step(&mut handle.broadcasts).await;

    drop(handle.commands);

    match drain(&mut handle.broadcasts).await {
        Some(SessionBroadcast::Ended(result)) => assert_eq!(result.score, 0),
        other => panic!("expected Ended last, got {other:?}"),
    }
    assert!(handle.task.await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn silent_tracker_never_hits() {
    let bus = TrackerBus::new();
    let mut handle = start_session(GameId::GoalKeeper, &bus, None);

    for _ in 0..300 {
        let Step::Frame(frame, events) = next_step(&mut handle.broadcasts).await else {
            break;
        };
        assert!(frame.cursors.is_empty());
        assert!(!events.iter().any(|e| matches!(e, EngineEvent::Hit { .. })));
    }
    assert_eq!(bus.seq(), 0);

    let _ = handle.commands.send(SessionCommand::Stop);
    let _ = handle.task.await;
}

use tokio::sync::mpsc;

use recall_core::engine::RenderFrame;
use recall_core::events::EngineEvent;
use recall_core::game_registry::GameId;
use recall_core::session::SessionResult;
use recall_core::test_helpers::sample_content;
use recall_runtime::registry::GameCatalog;
use recall_runtime::session_loop::{SessionBroadcast, SessionHandle, SessionLaunch, spawn_session};
use recall_runtime::tracker_bus::TrackerBus;

/// Start `game_id` with the sample deck, reading tracker data from `bus`.
pub fn start_session(game_id: GameId, bus: &TrackerBus, custom_time: Option<u32>) -> SessionHandle {
    spawn_session(
        &GameCatalog::new(),
        SessionLaunch {
            game_id,
            content: sample_content(),
            custom_time,
            tracker: bus.subscribe(),
        },
    )
    .expect("session should start")
}

/// What came out of the broadcast channel between two frames.
pub enum Step {
    Frame(RenderFrame, Vec<EngineEvent>),
    Ended(SessionResult, Vec<EngineEvent>),
}

/// Read broadcasts up to and including the next frame or the end marker,
/// collecting the events seen on the way.
pub async fn next_step(rx: &mut mpsc::UnboundedReceiver<SessionBroadcast>) -> Step {
    let mut events = Vec::new();
    loop {
        match rx.recv().await.expect("Ended must arrive before the channel closes") {
            SessionBroadcast::Events(batch) => events.extend(batch),
            SessionBroadcast::Frame(data) => {
                return Step::Frame(RenderFrame::decode(&data).expect("frame decodes"), events);
            },
            SessionBroadcast::Ended(result) => return Step::Ended(result, events),
        }
    }
}

/// Drain every remaining broadcast and return the last one.
pub async fn drain(rx: &mut mpsc::UnboundedReceiver<SessionBroadcast>) -> Option<SessionBroadcast> {
    let mut last = None;
    while let Some(msg) = rx.recv().await {
        last = Some(msg);
    }
    last
}

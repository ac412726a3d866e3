use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use recall_core::content::ContentItem;
use recall_core::engine::TrackerStatus;
use recall_core::events::EngineEvent;
use recall_core::game_registry::GameId;
use recall_core::game_trait::RecallGame;
use recall_core::session::SessionResult;
use recall_core::target::TargetId;

use crate::error::RuntimeError;
use crate::registry::GameCatalog;
use crate::tracker_bus::TrackerReader;

/// Commands sent from the presentation layer to the session tick loop.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    Pause,
    Resume,
    TogglePause,
    /// Pointer/touch selection of a target.
    Select(TargetId),
    SetTrackerStatus(TrackerStatus),
    Stop,
}

/// Messages sent from the tick loop to the presentation layer.
#[derive(Debug, Clone)]
pub enum SessionBroadcast {
    /// Everything the engine reported since the last broadcast. Never empty.
    Events(Vec<EngineEvent>),
    /// Encoded `RenderFrame` for the tick that just ran.
    /// Uses `Bytes` so a fan-out layer can clone it cheaply.
    Frame(Bytes),
    /// The loop has exited. Always the last message.
    Ended(SessionResult),
}

/// Everything needed to start a session.
pub struct SessionLaunch {
    pub game_id: GameId,
    pub content: Vec<ContentItem>,
    /// Countdown length in seconds, overriding the tier duration.
    pub custom_time: Option<u32>,
    pub tracker: TrackerReader,
}

/// Handle to a running session task.
pub struct SessionHandle {
    pub commands: mpsc::UnboundedSender<SessionCommand>,
    pub broadcasts: mpsc::UnboundedReceiver<SessionBroadcast>,
    /// Resolves to the final result once the loop exits.
    pub task: JoinHandle<SessionResult>,
}

/// Create the game, start it with the launch content and spawn its tick loop
/// as a tokio task. Must be called inside a tokio runtime.
///
/// Setup problems are reported here rather than from inside the task, so a
/// handle always refers to a session that reached `playing`. The events
/// produced by `start` are the first broadcast.
pub fn spawn_session(catalog: &GameCatalog, launch: SessionLaunch) -> Result<SessionHandle, RuntimeError> {
    let SessionLaunch {
        game_id,
        content,
        custom_time,
        tracker,
    } = launch;

    let mut game = catalog.create(game_id).ok_or(RuntimeError::UnknownGame(game_id))?;
    let start_events = game.start(content, custom_time)?;

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    tracing::info!(
        game = %game_id,
        session_id = %game.engine().session().id(),
        tick_rate = game.tick_rate(),
        "Session started"
    );
    send_events(&broadcast_tx, start_events);

    let task = tokio::spawn(async move { run_session_loop(&mut *game, tracker, cmd_rx, broadcast_tx).await });

    Ok(SessionHandle {
        commands: cmd_tx,
        broadcasts: broadcast_rx,
        task,
    })
}

/// The per-session tick loop. Exits on `Stop`, when every command sender is
/// dropped, or when the session finishes.
async fn run_session_loop(
    game: &mut dyn RecallGame,
    mut tracker: TrackerReader,
    mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    broadcast_tx: mpsc::UnboundedSender<SessionBroadcast>,
) -> SessionResult {
    let tick_interval = Duration::from_secs_f32(1.0 / game.tick_rate());
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let dt_ms = now.duration_since(last_tick).as_secs_f32() * 1000.0;
                last_tick = now;

                let frame = tracker.latest();
                let events = game.update(dt_ms, &frame);
                let finished = events.iter().any(EngineEvent::is_finish) || game.is_finished();
                send_events(&broadcast_tx, events);

                match game.render_state() {
                    Ok(data) => {
                        let _ = broadcast_tx.send(SessionBroadcast::Frame(Bytes::from(data)));
                    },
                    Err(e) => tracing::error!(error = %e, "Failed to encode render frame"),
                }

                if finished {
                    break;
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SessionCommand::Pause) => game.pause(),
                    Some(SessionCommand::Resume) => game.resume(),
                    Some(SessionCommand::TogglePause) => game.toggle_pause(),
                    Some(SessionCommand::Select(id)) => {
                        let events = game.select_target(id);
                        let finished = events.iter().any(EngineEvent::is_finish);
                        send_events(&broadcast_tx, events);
                        if finished {
                            break;
                        }
                    },
                    Some(SessionCommand::SetTrackerStatus(status)) => game.set_tracker_status(status),
                    Some(SessionCommand::Stop) | None => {
                        if !game.is_finished() {
                            let result = game.stop();
                            tracing::info!(session_id = %result.session_id, score = result.score, "Session stopped");
                        }
                        break;
                    },
                }
            }
        }
    }

    let result = game.result();
    let _ = broadcast_tx.send(SessionBroadcast::Ended(result.clone()));
    result
}

fn send_events(tx: &mpsc::UnboundedSender<SessionBroadcast>, events: Vec<EngineEvent>) {
    if !events.is_empty() {
        let _ = tx.send(SessionBroadcast::Events(events));
    }
}

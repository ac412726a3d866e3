use std::process::ExitCode;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use recall_core::events::EngineEvent;
use recall_core::session::SessionResult;
use recall_runtime::config::RuntimeConfig;
use recall_runtime::error::RuntimeError;
use recall_runtime::registry::GameCatalog;
use recall_runtime::session_loop::{SessionBroadcast, SessionCommand, SessionLaunch, spawn_session};
use recall_runtime::sim::{builtin_deck, load_content, spawn_sim_tracker};
use recall_runtime::tracker_bus::TrackerBus;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = RuntimeConfig::load();
    tracing::info!(game = %config.game, "recall-sim starting");

    match run(config).await {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode session result");
                ExitCode::FAILURE
            },
        },
        Err(e) => {
            tracing::error!(error = %e, "Session failed");
            ExitCode::FAILURE
        },
    }
}

/// Logs go to stderr so stdout carries only the result JSON.
/// `RECALL_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("RECALL_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run(config: RuntimeConfig) -> Result<SessionResult, RuntimeError> {
    let content = match &config.content_path {
        Some(path) => load_content(path)?,
        None => builtin_deck(),
    };

    let catalog = GameCatalog::new();
    let bus = TrackerBus::new();
    let mut handle = spawn_session(
        &catalog,
        SessionLaunch {
            game_id: config.game,
            content,
            custom_time: config.custom_time,
            tracker: bus.subscribe(),
        },
    )?;
    let tracker = spawn_sim_tracker(bus, config.tracker.clone());

    let deadline = tokio::time::sleep(Duration::from_secs(config.max_runtime_secs));
    tokio::pin!(deadline);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut stop_sent = false;
    let mut ended = None;

    loop {
        tokio::select! {
            msg = handle.broadcasts.recv() => {
                match msg {
                    Some(SessionBroadcast::Events(events)) => events.iter().for_each(log_event),
                    Some(SessionBroadcast::Frame(_)) => {},
                    Some(SessionBroadcast::Ended(result)) => {
                        ended = Some(result);
                        break;
                    },
                    None => break,
                }
            }
            _ = &mut deadline, if !stop_sent => {
                tracing::warn!(secs = config.max_runtime_secs, "Runtime limit reached, stopping session");
                let _ = handle.commands.send(SessionCommand::Stop);
                stop_sent = true;
            }
            _ = &mut ctrl_c, if !stop_sent => {
                tracing::info!("Interrupted, stopping session");
                let _ = handle.commands.send(SessionCommand::Stop);
                stop_sent = true;
            }
        }
    }

    tracker.abort();
    ended.ok_or(RuntimeError::SessionLost)
}

fn log_event(event: &EngineEvent) {
    match event {
        EngineEvent::PromptChanged { prompt, .. } => tracing::info!(%prompt, "New prompt"),
        EngineEvent::Hit {
            is_correct, by, gesture, ..
        } => tracing::info!(is_correct, ?by, ?gesture, "Hit"),
        EngineEvent::Missed { reason, .. } => tracing::info!(?reason, "Missed"),
        EngineEvent::LevelUp { level } => tracing::info!(level, "Level up"),
        EngineEvent::SessionFinished(result) => {
            tracing::info!(score = result.score, accuracy = result.accuracy, "Session finished")
        },
        other => tracing::debug!(event = ?other, "Engine event"),
    }
}

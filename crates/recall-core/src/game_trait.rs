use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::content::ContentItem;
use crate::cursor::{LandmarkName, TrackerFrame};
use crate::engine::{Engine, TrackerStatus};
use crate::error::{CodecError, SetupError};
use crate::events::EngineEvent;
use crate::session::{SessionResult, TimerMode};
use crate::target::TargetId;

/// Core trait that all recall motion games implement.
///
/// The runtime owns the tick loop, tracker feed and result delivery; the game
/// only decides how targets move, spawn and get hit.
pub trait RecallGame: Send + Sync {
    /// Metadata for the game picker.
    fn metadata(&self) -> GameMetadata;

    /// Load content and begin a session. Fails without touching the phase
    /// when the content is unusable.
    fn start(&mut self, content: Vec<ContentItem>, custom_time: Option<u32>) -> Result<Vec<EngineEvent>, SetupError>;

    /// Called each frame with the elapsed milliseconds and the latest tracker
    /// snapshot.
    fn update(&mut self, dt_ms: f32, frame: &TrackerFrame) -> Vec<EngineEvent>;

    /// Pointer/touch fallback when no tracker is available.
    fn select_target(&mut self, id: TargetId) -> Vec<EngineEvent>;

    /// Encoded render snapshot for the presentation layer.
    fn render_state(&self) -> Result<Vec<u8>, CodecError>;

    fn pause(&mut self);

    fn resume(&mut self);

    fn toggle_pause(&mut self);

    fn is_finished(&self) -> bool;

    /// Result of the current (or last) session.
    fn result(&self) -> SessionResult;

    /// End the session early.
    fn stop(&mut self) -> SessionResult;

    fn set_tracker_status(&mut self, status: TrackerStatus);

    /// Read access to the underlying engine, mainly for tests and tooling.
    fn engine(&self) -> &Engine;

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }
}

/// Game metadata for the picker screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub tracked_points: Vec<LandmarkName>,
    pub timer_mode: TimerMode,
    pub estimated_round_duration: Duration,
}

/// Generates the `RecallGame` methods that only delegate to the engine:
/// everything except `metadata` and `tick_rate`.
///
/// Requires the implementing struct to have an `engine: Engine` field.
#[macro_export]
macro_rules! recall_game_boilerplate {
    () => {
        fn start(
            &mut self,
            content: Vec<$crate::content::ContentItem>,
            custom_time: Option<u32>,
        ) -> Result<Vec<$crate::events::EngineEvent>, $crate::error::SetupError> {
            self.engine.load_content(content)?;
            self.engine.start(custom_time)
        }

        fn update(
            &mut self,
            dt_ms: f32,
            frame: &$crate::cursor::TrackerFrame,
        ) -> Vec<$crate::events::EngineEvent> {
            self.engine.tick(dt_ms, frame)
        }

        fn select_target(&mut self, id: $crate::target::TargetId) -> Vec<$crate::events::EngineEvent> {
            self.engine.select_target(id)
        }

        fn render_state(&self) -> Result<Vec<u8>, $crate::error::CodecError> {
            self.engine.render_frame().encode()
        }

        fn pause(&mut self) {
            self.engine.pause();
        }

        fn resume(&mut self) {
            self.engine.resume();
        }

        fn toggle_pause(&mut self) {
            self.engine.toggle_pause();
        }

        fn is_finished(&self) -> bool {
            self.engine.session().is_finished()
        }

        fn result(&self) -> $crate::session::SessionResult {
            self.engine.session().result()
        }

        fn stop(&mut self) -> $crate::session::SessionResult {
            self.engine.stop()
        }

        fn set_tracker_status(&mut self, status: $crate::engine::TrackerStatus) {
            self.engine.set_tracker_status(status);
        }

        fn engine(&self) -> &$crate::engine::Engine {
            &self.engine
        }
    };
}

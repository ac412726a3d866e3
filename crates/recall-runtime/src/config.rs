use serde::Deserialize;

use recall_core::game_registry::GameId;

/// Top-level runtime configuration, loaded from `recall.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub game: GameId,
    /// JSON array of content items. The built-in deck is used when unset.
    pub content_path: Option<String>,
    /// Countdown length in seconds, overriding the game's tier duration.
    pub custom_time: Option<u32>,
    /// Give up after this many seconds even if the session is still running.
    pub max_runtime_secs: u64,
    pub tracker: SimTrackerConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameId::WordRain,
            content_path: None,
            custom_time: None,
            max_runtime_secs: 300,
            tracker: SimTrackerConfig::default(),
        }
    }
}

/// Synthetic tracker that sweeps one hand across the screen.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimTrackerConfig {
    /// Tracker callbacks per second.
    pub rate_hz: f32,
    /// Seconds for one left-right-left sweep.
    pub sweep_period_secs: f32,
    /// Normalized height of the hand, 0 = top of the camera image.
    pub height: f32,
    /// Maximum random offset added to each sample, in normalized units.
    pub jitter: f32,
    pub seed: u64,
    /// Seconds before the simulated hand first appears.
    pub startup_delay_secs: f32,
}

impl Default for SimTrackerConfig {
    fn default() -> Self {
        Self {
            rate_hz: 30.0,
            sweep_period_secs: 4.0,
            height: 0.6,
            jitter: 0.01,
            seed: 7,
            startup_delay_secs: 0.5,
        }
    }
}

impl RuntimeConfig {
    /// Load config from the file at `RECALL_CONFIG` (default `recall.toml`),
    /// then apply environment overrides. A missing file yields defaults.
    pub fn load() -> Self {
        let mut config: Self = recall_core::config::load_toml_or_default("RECALL_CONFIG", "recall.toml");
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `RECALL_GAME` and `RECALL_CONTENT` overrides read through `get`.
    /// Empty values are ignored; an unknown game name logs and keeps the
    /// configured game.
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("RECALL_GAME")
            && !v.is_empty()
        {
            match v.parse::<GameId>() {
                Ok(game) => self.game = game,
                Err(e) => tracing::warn!("Ignoring RECALL_GAME: {e}"),
            }
        }
        if let Some(v) = get("RECALL_CONTENT")
            && !v.is_empty()
        {
            self.content_path = Some(v);
        }
    }
}

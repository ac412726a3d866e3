use serde::{Deserialize, Serialize};

use recall_core::pacer::PacingCurve;
use recall_core::profile::{Difficulty, DifficultyProfile};
use recall_core::session::TimerMode;

/// Data-driven configuration for Word Rain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordRainConfig {
    pub difficulty: Difficulty,
    /// Practice sessions never cost lives.
    pub practice: bool,
    pub seed: u64,
    /// Height words appear at, just above the visible area.
    pub spawn_y: f32,
    /// Horizontal band words may appear in.
    pub min_x: f32,
    pub max_x: f32,
    /// Minimum horizontal gap between words of one round.
    pub min_separation: f32,
    /// Placement attempts per word before accepting an overlap.
    pub max_retries: u32,
    /// Overrides the tier's catch radius.
    pub hit_radius: Option<f32>,
    /// Overrides the tier's round duration.
    pub round_duration_secs: Option<u32>,
    /// Points lost for catching a wrong word.
    pub wrong_penalty: u32,
    /// Unset: practice counts up with no deadline, scored play counts down.
    pub timer_mode: Option<TimerMode>,
    pub pacing: PacingCurve,
}

impl Default for WordRainConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            practice: false,
            seed: 0x57_0a_11,
            spawn_y: -5.0,
            min_x: 10.0,
            max_x: 90.0,
            min_separation: 18.0,
            max_retries: 12,
            hit_radius: None,
            round_duration_secs: None,
            wrong_penalty: 25,
            timer_mode: None,
            pacing: PacingCurve::default(),
        }
    }
}

impl WordRainConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        recall_core::config::load_toml_or_default("RECALL_WORD_RAIN_CONFIG", "config/word-rain.toml")
    }

    pub fn timer_mode(&self) -> TimerMode {
        self.timer_mode.unwrap_or(if self.practice {
            TimerMode::CountUp
        } else {
            TimerMode::Countdown
        })
    }

    /// The tier's profile with this config's overrides applied.
    pub fn profile(&self) -> DifficultyProfile {
        let mut profile = DifficultyProfile::preset(self.difficulty);
        if let Some(radius) = self.hit_radius {
            profile.hit_radius = radius;
        }
        if let Some(secs) = self.round_duration_secs {
            profile.round_duration_secs = secs;
        }
        profile.max_targets = profile.round_size();
        profile
    }
}

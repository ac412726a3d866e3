use serde::{Deserialize, Serialize};

use recall_core::detector::{
    DEFAULT_GESTURE_COOLDOWN_MS, DEFAULT_PUNCH_THRESHOLD, DEFAULT_SLAP_THRESHOLD, DEFAULT_WHACK_TOLERANCE,
};
use recall_core::pacer::PacingCurve;
use recall_core::profile::{Difficulty, DifficultyProfile};
use recall_core::target::Point;

/// Data-driven configuration for Whack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhackConfig {
    pub difficulty: Difficulty,
    pub practice: bool,
    pub seed: u64,
    /// Hole columns, as screen x percentages.
    pub columns: Vec<f32>,
    /// Hole rows, as screen y percentages.
    pub rows: Vec<f32>,
    /// How long a mole stays up (ms).
    pub lifetime_min_ms: f32,
    pub lifetime_max_ms: f32,
    /// Distance from a hole center that still counts as on the hole.
    pub tolerance: f32,
    /// Depth velocity for a punch, normalized z per tracker frame.
    pub punch_threshold: f32,
    /// Downward velocity for a slap, normalized y per tracker frame.
    pub slap_threshold: f32,
    /// Per-hand lockout after a whack (ms).
    pub cooldown_ms: f32,
    /// Keep exactly one answer mole up. With this off, every mole holds the
    /// answer with probability `correct_chance`.
    pub single_correct: bool,
    pub correct_chance: f32,
    /// Points lost for whacking a wrong mole.
    pub wrong_penalty: u32,
    pub round_duration_secs: Option<u32>,
    pub pacing: PacingCurve,
}

impl Default for WhackConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            practice: false,
            seed: 0x3a_c0_1e,
            columns: vec![20.0, 50.0, 80.0],
            rows: vec![30.0, 55.0, 80.0],
            lifetime_min_ms: 1600.0,
            lifetime_max_ms: 2800.0,
            tolerance: DEFAULT_WHACK_TOLERANCE,
            punch_threshold: DEFAULT_PUNCH_THRESHOLD,
            slap_threshold: DEFAULT_SLAP_THRESHOLD,
            cooldown_ms: DEFAULT_GESTURE_COOLDOWN_MS,
            single_correct: true,
            correct_chance: 0.35,
            wrong_penalty: 25,
            round_duration_secs: None,
            pacing: PacingCurve {
                base_interval_ms: 900.0,
                floor_interval_ms: 400.0,
                ..PacingCurve::default()
            },
        }
    }
}

impl WhackConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        recall_core::config::load_toml_or_default("RECALL_WHACK_CONFIG", "config/whack.toml")
    }

    /// Hole centers, row by row.
    pub fn slots(&self) -> Vec<Point> {
        self.rows
            .iter()
            .flat_map(|&y| self.columns.iter().map(move |&x| Point::new(x, y)))
            .collect()
    }

    pub fn profile(&self) -> DifficultyProfile {
        let mut profile = DifficultyProfile::preset(self.difficulty);
        profile.max_targets = profile.max_targets.min(self.slots().len());
        if let Some(secs) = self.round_duration_secs {
            profile.round_duration_secs = secs;
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_three_by_three() {
        let slots = WhackConfig::default().slots();
        assert_eq!(slots.len(), 9);
        assert_eq!(slots[0], Point::new(20.0, 30.0));
        assert_eq!(slots[8], Point::new(80.0, 80.0));
    }

    #[test]
    fn small_grid_caps_targets() {
        let config = WhackConfig {
            columns: vec![50.0],
            rows: vec![40.0, 70.0],
            ..WhackConfig::default()
        };
        assert_eq!(config.profile().max_targets, 2);
    }

    #[test]
    fn thresholds_load_from_toml() {
        let config: WhackConfig = toml::from_str("punch_threshold = 0.02\ncooldown_ms = 250.0\n").unwrap();
        assert_eq!(config.punch_threshold, 0.02);
        assert_eq!(config.cooldown_ms, 250.0);
        assert_eq!(config.slap_threshold, DEFAULT_SLAP_THRESHOLD);
        assert!(config.single_correct);
    }

    #[test]
    fn answer_mix_loads_from_toml() {
        let config: WhackConfig =
            toml::from_str("single_correct = false
correct_chance = 0.5
wrong_penalty = 10
").unwrap();
        assert!(!config.single_correct);
        assert_eq!(config.correct_chance, 0.5);
        assert_eq!(config.wrong_penalty, 10);
    }
}

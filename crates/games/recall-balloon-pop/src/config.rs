use serde::{Deserialize, Serialize};

use recall_core::pacer::PacingCurve;
use recall_core::profile::{Difficulty, DifficultyProfile};

/// Data-driven configuration for Balloon Pop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalloonPopConfig {
    pub difficulty: Difficulty,
    pub practice: bool,
    pub seed: u64,
    /// Vertical float amplitude (percent) and frequency (radians/s).
    pub float_amplitude: f32,
    pub float_frequency: f32,
    /// Horizontal wobble amplitude (percent) and frequency (radians/s).
    pub wobble_amplitude: f32,
    pub wobble_frequency: f32,
    /// Vertical band balloons bounce inside.
    pub band_min: f32,
    pub band_max: f32,
    /// Keep exactly one answer balloon in the air. With this off, every
    /// spawn is the answer with probability `correct_chance`.
    pub single_correct: bool,
    pub correct_chance: f32,
    pub base_points: u32,
    /// Scale base points by the running combo before adding the flat bonus.
    pub combo_multiplier: bool,
    /// Points lost for popping a wrong balloon.
    pub wrong_penalty: u32,
    /// Flat bonus per combo step, and its cap.
    pub combo_bonus_step: u32,
    pub combo_bonus_cap: u32,
    /// Points per level.
    pub level_threshold: u32,
    /// Consecutive pops that earn a life.
    pub streak_for_life: u32,
    pub round_duration_secs: Option<u32>,
    pub pacing: PacingCurve,
}

impl Default for BalloonPopConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            practice: false,
            seed: 0xba_11_00,
            float_amplitude: 2.5,
            float_frequency: 2.0,
            wobble_amplitude: 1.5,
            wobble_frequency: 1.3,
            band_min: 15.0,
            band_max: 85.0,
            single_correct: true,
            correct_chance: 0.3,
            base_points: 10,
            combo_multiplier: true,
            wrong_penalty: 5,
            combo_bonus_step: 5,
            combo_bonus_cap: 25,
            level_threshold: 50,
            streak_for_life: 10,
            round_duration_secs: None,
            pacing: PacingCurve {
                base_interval_ms: 1400.0,
                floor_interval_ms: 500.0,
                ..PacingCurve::default()
            },
        }
    }
}

impl BalloonPopConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        recall_core::config::load_toml_or_default("RECALL_BALLOON_POP_CONFIG", "config/balloon-pop.toml")
    }

    /// Balloons crowd the screen more than falling words: two more on
    /// screen than the tier's default cap.
    pub fn profile(&self) -> DifficultyProfile {
        let mut profile = DifficultyProfile::preset(self.difficulty);
        profile.max_targets += 2;
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
    fn toml_overrides_scoring_knobs() {
        let config: BalloonPopConfig = toml::from_str(
            r#"
            combo_bonus_cap = 40
            level_threshold = 100

            [pacing]
            base_interval_ms = 900.0
            "#,
        )
        .unwrap();
        assert_eq!(config.combo_bonus_cap, 40);
        assert_eq!(config.level_threshold, 100);
        assert_eq!(config.pacing.base_interval_ms, 900.0);
        assert_eq!(config.pacing.decay, PacingCurve::default().decay);
        assert_eq!(config.combo_bonus_step, 5);
        assert!(config.combo_multiplier);
        assert_eq!(config.wrong_penalty, 5);
    }

    #[test]
    fn profile_allows_more_balloons() {
        let config = BalloonPopConfig::default();
        assert_eq!(
            config.profile().max_targets,
            DifficultyProfile::preset(Difficulty::Medium).max_targets + 2
        );
    }
}

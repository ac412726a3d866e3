use serde::{Deserialize, Serialize};

use recall_core::motion::DEFAULT_PASS_SCALE;
use recall_core::pacer::PacingCurve;
use recall_core::profile::{Difficulty, DifficultyProfile};

/// Data-driven configuration shared by Goal Keeper and Header Match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalKeeperConfig {
    pub difficulty: Difficulty,
    pub practice: bool,
    pub seed: u64,
    /// Progress scale at which a ball has passed the keeper.
    pub pass_scale: f32,
    /// Balls smaller than this are still too far away to block.
    pub min_scale: f32,
    /// Block radius at full scale; the tier value applies when unset.
    pub hit_radius: Option<f32>,
    /// Keep exactly one answer ball in flight. With this off, every shot
    /// carries the answer with probability `correct_chance`.
    pub single_correct: bool,
    pub correct_chance: f32,
    /// Points lost for blocking a wrong ball.
    pub wrong_penalty: u32,
    pub round_duration_secs: Option<u32>,
    pub pacing: PacingCurve,
}

impl Default for GoalKeeperConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            practice: false,
            seed: 0x60_a1,
            pass_scale: DEFAULT_PASS_SCALE,
            min_scale: 0.7,
            hit_radius: None,
            single_correct: true,
            correct_chance: 0.4,
            wrong_penalty: 25,
            round_duration_secs: None,
            pacing: PacingCurve {
                base_interval_ms: 1800.0,
                floor_interval_ms: 700.0,
                ..PacingCurve::default()
            },
        }
    }
}

impl GoalKeeperConfig {
    /// Load Goal Keeper config from environment or TOML file.
    pub fn load() -> Self {
        recall_core::config::load_toml_or_default("RECALL_GOAL_KEEPER_CONFIG", "config/goal-keeper.toml")
    }

    /// Load Header Match config from environment or TOML file.
    pub fn load_header_match() -> Self {
        recall_core::config::load_toml_or_default("RECALL_HEADER_MATCH_CONFIG", "config/header-match.toml")
    }

    /// Approach games measure speed in progress-scale units per frame, so they
    /// carry their own tier table.
    pub fn profile(&self) -> DifficultyProfile {
        let base = DifficultyProfile::preset(self.difficulty);
        let (min_speed, max_speed, hit_radius, max_targets) = match self.difficulty {
            Difficulty::Easy => (0.004, 0.006, 16.0, 2),
            Difficulty::Medium => (0.005, 0.008, 13.0, 3),
            Difficulty::Hard => (0.007, 0.011, 11.0, 4),
        };
        DifficultyProfile {
            min_speed,
            max_speed,
            hit_radius: self.hit_radius.unwrap_or(hit_radius),
            max_targets,
            round_duration_secs: self.round_duration_secs.unwrap_or(base.round_duration_secs),
            ..base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approach_speeds_are_slow() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let profile = GoalKeeperConfig {
                difficulty,
                ..GoalKeeperConfig::default()
            }
            .profile();
            // At least a second from spawn to the keeper at 60 Hz.
            assert!((DEFAULT_PASS_SCALE - 0.1) / profile.max_speed > 60.0);
        }
    }

    #[test]
    fn toml_overrides() {
        let config: GoalKeeperConfig = toml::from_str("min_scale = 0.5\nhit_radius = 20.0\n").unwrap();
        assert_eq!(config.min_scale, 0.5);
        assert_eq!(config.profile().hit_radius, 20.0);
        assert_eq!(config.pass_scale, DEFAULT_PASS_SCALE);
        assert_eq!(config.wrong_penalty, 25);
    }

    #[test]
    fn multi_answer_shots_from_toml() {
        let config: GoalKeeperConfig = toml::from_str("single_correct = false
correct_chance = 0.6
").unwrap();
        assert!(!config.single_correct);
        assert_eq!(config.correct_chance, 0.6);
    }
}

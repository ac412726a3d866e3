use serde::{Deserialize, Serialize};

/// Difficulty tier chosen at setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Per-tier configuration, read-only once a session starts.
///
/// Speeds are in game units per 60 Hz frame: percent of the screen for moving
/// targets, progress-scale units for approaching ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyProfile {
    /// Incorrect options shown alongside the correct one.
    pub distractors: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    pub round_duration_secs: u32,
    /// Catch radius in percentage space.
    pub hit_radius: f32,
    pub starting_lives: u32,
    pub max_lives: u32,
    /// Concurrent target cap for streaming and slot games.
    pub max_targets: usize,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::preset(Difficulty::Medium)
    }
}

impl DifficultyProfile {
    pub fn preset(tier: Difficulty) -> Self {
        match tier {
            Difficulty::Easy => Self {
                distractors: 2,
                min_speed: 0.12,
                max_speed: 0.22,
                round_duration_secs: 120,
                hit_radius: 10.0,
                starting_lives: 5,
                max_lives: 7,
                max_targets: 3,
            },
            Difficulty::Medium => Self {
                distractors: 3,
                min_speed: 0.18,
                max_speed: 0.32,
                round_duration_secs: 90,
                hit_radius: 8.0,
                starting_lives: 3,
                max_lives: 5,
                max_targets: 4,
            },
            Difficulty::Hard => Self {
                distractors: 4,
                min_speed: 0.25,
                max_speed: 0.45,
                round_duration_secs: 60,
                hit_radius: 6.5,
                starting_lives: 3,
                max_lives: 3,
                max_targets: 5,
            },
        }
    }

    /// Targets in one full round: the correct answer plus its distractors.
    pub fn round_size(&self) -> usize {
        self.distractors + 1
    }
}

pub mod config;

use std::time::Duration;

use recall_core::cursor::LandmarkName;
use recall_core::detector::InteractionMode;
use recall_core::engine::{Engine, GameRules, SpawnEdge, SpawnLayout};
use recall_core::game_trait::{GameMetadata, RecallGame};
use recall_core::motion::MotionMode;
use recall_core::recall_game_boilerplate;
use recall_core::scoring::{MissPolicy, ScoringRules};
use recall_core::session::TimerMode;

use config::BalloonPopConfig;

/// Build the engine rules for a Balloon Pop session.
pub fn rules(config: &BalloonPopConfig) -> GameRules {
    let profile = config.profile();
    GameRules {
        motion: MotionMode::Drift {
            float_amplitude: config.float_amplitude,
            float_frequency: config.float_frequency,
            wobble_amplitude: config.wobble_amplitude,
            wobble_frequency: config.wobble_frequency,
            band: Some((config.band_min, config.band_max)),
        },
        interaction: InteractionMode::catch(profile.hit_radius),
        layout: SpawnLayout::Stream {
            edge: SpawnEdge::Sides,
            correct_chance: config.correct_chance,
        },
        single_correct: config.single_correct,
        tracked_points: LandmarkName::HANDS.to_vec(),
        timer_mode: TimerMode::Countdown,
        pacing: config.pacing.clone(),
        scoring: ScoringRules {
            base_points: config.base_points,
            apply_combo_multiplier: config.combo_multiplier,
            combo_bonus_step: config.combo_bonus_step,
            combo_bonus_cap: config.combo_bonus_cap,
            level_threshold: config.level_threshold,
            streak_for_life: config.streak_for_life,
            wrong_penalty: config.wrong_penalty,
            practice: config.practice,
            // A balloon that floats away only breaks the combo.
            miss_policy: MissPolicy::ResetCombo,
            ..ScoringRules::default()
        },
        profile,
        prompt_timeout_ms: None,
        lifetime_ms: None,
        seed: config.seed,
    }
}

/// Balloons drift across the screen; pop the one carrying the answer.
pub struct BalloonPop {
    engine: Engine,
    config: BalloonPopConfig,
}

impl BalloonPop {
    pub fn new() -> Self {
        Self::with_config(BalloonPopConfig::load())
    }

    pub fn with_config(config: BalloonPopConfig) -> Self {
        tracing::debug!(difficulty = ?config.difficulty, practice = config.practice, "Balloon Pop configured");
        Self {
            engine: Engine::new(rules(&config)),
            config,
        }
    }

    pub fn config(&self) -> &BalloonPopConfig {
        &self.config
    }

    /// Current level, starting at 1.
    pub fn level(&self) -> u32 {
        self.engine.level()
    }
}

impl Default for BalloonPop {
    fn default() -> Self {
        Self::with_config(BalloonPopConfig::default())
    }
}

impl RecallGame for BalloonPop {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Balloon Pop".to_string(),
            description: "Pop the drifting balloon with the right answer. Chain pops for bonus points.".to_string(),
            tracked_points: LandmarkName::HANDS.to_vec(),
            timer_mode: TimerMode::Countdown,
            estimated_round_duration: Duration::from_secs(u64::from(self.config.profile().round_duration_secs)),
        }
    }

    recall_game_boilerplate!();
}

pub mod config;

use std::time::Duration;

use recall_core::cursor::LandmarkName;
use recall_core::detector::InteractionMode;
use recall_core::engine::{Engine, GameRules, SpawnLayout};
use recall_core::game_trait::{GameMetadata, RecallGame};
use recall_core::motion::MotionMode;
use recall_core::recall_game_boilerplate;
use recall_core::scoring::{MissPolicy, ScoringRules};
use recall_core::session::TimerMode;

use config::WhackConfig;

/// Build the engine rules for a Whack session.
///
/// Moles pop out of fixed holes and duck back after their lifetime. A hit
/// needs a punch or slap on the hole, not just a touch.
pub fn rules(config: &WhackConfig) -> GameRules {
    GameRules {
        motion: MotionMode::Stationary,
        interaction: InteractionMode::Whack {
            tolerance: config.tolerance,
            punch_threshold: config.punch_threshold,
            slap_threshold: config.slap_threshold,
            cooldown_ms: config.cooldown_ms,
        },
        layout: SpawnLayout::Slots {
            slots: config.slots(),
            correct_chance: config.correct_chance,
        },
        single_correct: config.single_correct,
        tracked_points: LandmarkName::HANDS.to_vec(),
        timer_mode: TimerMode::Countdown,
        pacing: config.pacing.clone(),
        scoring: ScoringRules {
            wrong_penalty: config.wrong_penalty,
            practice: config.practice,
            // A correct mole that ducks away is a wrong answer, but free.
            miss_policy: MissPolicy::CountWrong,
            ..ScoringRules::default()
        },
        profile: config.profile(),
        prompt_timeout_ms: None,
        lifetime_ms: Some((config.lifetime_min_ms, config.lifetime_max_ms)),
        seed: config.seed,
    }
}

/// Whack the mole holding the answer before it ducks away.
pub struct Whack {
    engine: Engine,
    config: WhackConfig,
}

impl Whack {
    pub fn new() -> Self {
        Self::with_config(WhackConfig::load())
    }

    pub fn with_config(config: WhackConfig) -> Self {
        tracing::debug!(difficulty = ?config.difficulty, holes = config.slots().len(), "Whack configured");
        Self {
            engine: Engine::new(rules(&config)),
            config,
        }
    }

    pub fn config(&self) -> &WhackConfig {
        &self.config
    }
}

impl Default for Whack {
    fn default() -> Self {
        Self::with_config(WhackConfig::default())
    }
}

impl RecallGame for Whack {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Whack".to_string(),
            description: "Punch or slap the mole with the right answer before it hides.".to_string(),
            tracked_points: LandmarkName::HANDS.to_vec(),
            timer_mode: TimerMode::Countdown,
            estimated_round_duration: Duration::from_secs(u64::from(self.config.profile().round_duration_secs)),
        }
    }

    recall_game_boilerplate!();
}

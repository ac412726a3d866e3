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
use recall_core::target::Point;

use config::GoalKeeperConfig;

/// Build the engine rules for an approach game blocked with `tracked`.
///
/// Balls start small at the screen center and grow toward a random spot on
/// the goal. Blocking the answer scores; letting it through costs a life.
pub fn rules(config: &GoalKeeperConfig, tracked: &[LandmarkName]) -> GameRules {
    let profile = config.profile();
    GameRules {
        motion: MotionMode::Approach {
            origin: Point::CENTER,
            pass_scale: config.pass_scale,
        },
        interaction: InteractionMode::Catch {
            hit_radius: profile.hit_radius,
            min_scale: config.min_scale,
        },
        layout: SpawnLayout::Stream {
            edge: SpawnEdge::Center,
            correct_chance: config.correct_chance,
        },
        single_correct: config.single_correct,
        tracked_points: tracked.to_vec(),
        timer_mode: TimerMode::Countdown,
        pacing: config.pacing.clone(),
        scoring: ScoringRules {
            wrong_penalty: config.wrong_penalty,
            practice: config.practice,
            miss_policy: MissPolicy::LoseLife,
            ..ScoringRules::default()
        },
        profile,
        prompt_timeout_ms: None,
        lifetime_ms: None,
        seed: config.seed,
    }
}

fn approach_metadata(name: &str, description: &str, tracked: &[LandmarkName], config: &GoalKeeperConfig) -> GameMetadata {
    GameMetadata {
        name: name.to_string(),
        description: description.to_string(),
        tracked_points: tracked.to_vec(),
        timer_mode: TimerMode::Countdown,
        estimated_round_duration: Duration::from_secs(u64::from(config.profile().round_duration_secs)),
    }
}

/// Block the incoming ball with the answer using either hand.
pub struct GoalKeeper {
    engine: Engine,
    config: GoalKeeperConfig,
}

impl GoalKeeper {
    pub fn new() -> Self {
        Self::with_config(GoalKeeperConfig::load())
    }

    pub fn with_config(config: GoalKeeperConfig) -> Self {
        tracing::debug!(difficulty = ?config.difficulty, "Goal Keeper configured");
        Self {
            engine: Engine::new(rules(&config, &LandmarkName::HANDS)),
            config,
        }
    }

    pub fn config(&self) -> &GoalKeeperConfig {
        &self.config
    }
}

impl Default for GoalKeeper {
    fn default() -> Self {
        Self::with_config(GoalKeeperConfig::default())
    }
}

impl RecallGame for GoalKeeper {
    fn metadata(&self) -> GameMetadata {
        approach_metadata(
            "Goal Keeper",
            "Save the shot carrying the right answer. Let it through and you lose a life.",
            &LandmarkName::HANDS,
            &self.config,
        )
    }

    recall_game_boilerplate!();
}

/// Goal Keeper played with the head: only the nose is tracked.
pub struct HeaderMatch {
    engine: Engine,
    config: GoalKeeperConfig,
}

impl HeaderMatch {
    pub fn new() -> Self {
        Self::with_config(GoalKeeperConfig::load_header_match())
    }

    pub fn with_config(config: GoalKeeperConfig) -> Self {
        tracing::debug!(difficulty = ?config.difficulty, "Header Match configured");
        Self {
            engine: Engine::new(rules(&config, &[LandmarkName::Nose])),
            config,
        }
    }

    pub fn config(&self) -> &GoalKeeperConfig {
        &self.config
    }
}

impl Default for HeaderMatch {
    fn default() -> Self {
        Self::with_config(GoalKeeperConfig::default())
    }
}

impl RecallGame for HeaderMatch {
    fn metadata(&self) -> GameMetadata {
        approach_metadata(
            "Header Match",
            "Head the ball with the right answer back into play.",
            &[LandmarkName::Nose],
            &self.config,
        )
    }

    recall_game_boilerplate!();
}

pub mod config;

use std::time::Duration;

use recall_core::cursor::LandmarkName;
use recall_core::detector::InteractionMode;
use recall_core::engine::{Engine, GameRules, SpawnLayout};
use recall_core::game_trait::{GameMetadata, RecallGame};
use recall_core::motion::MotionMode;
use recall_core::recall_game_boilerplate;
use recall_core::scoring::{MissPolicy, ScoringRules};

use config::WordRainConfig;

/// Build the engine rules for a Word Rain session.
///
/// A full round falls at once; catching the matching word with either hand
/// scores, and letting it fall off the bottom costs a life.
pub fn rules(config: &WordRainConfig) -> GameRules {
    let profile = config.profile();
    GameRules {
        motion: MotionMode::Linear,
        interaction: InteractionMode::catch(profile.hit_radius),
        layout: SpawnLayout::Round {
            spawn_y: config.spawn_y,
            min_x: config.min_x,
            max_x: config.max_x,
            min_separation: config.min_separation,
            max_retries: config.max_retries,
        },
        single_correct: true,
        tracked_points: LandmarkName::HANDS.to_vec(),
        timer_mode: config.timer_mode(),
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

/// Words fall from the top; catch the one that answers the prompt.
pub struct WordRain {
    engine: Engine,
    config: WordRainConfig,
}

impl WordRain {
    pub fn new() -> Self {
        Self::with_config(WordRainConfig::load())
    }

    pub fn with_config(config: WordRainConfig) -> Self {
        tracing::debug!(difficulty = ?config.difficulty, practice = config.practice, "Word Rain configured");
        Self {
            engine: Engine::new(rules(&config)),
            config,
        }
    }

    pub fn config(&self) -> &WordRainConfig {
        &self.config
    }
}

impl Default for WordRain {
    fn default() -> Self {
        Self::with_config(WordRainConfig::default())
    }
}

impl RecallGame for WordRain {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Word Rain".to_string(),
            description: "Catch the falling word that matches the prompt before it hits the ground.".to_string(),
            tracked_points: LandmarkName::HANDS.to_vec(),
            timer_mode: self.config.timer_mode(),
            estimated_round_duration: Duration::from_secs(u64::from(self.config.profile().round_duration_secs)),
        }
    }

    recall_game_boilerplate!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::events::EngineEvent;
    use recall_core::profile::Difficulty;
    use recall_core::session::TimerMode;
    use recall_core::target::Point;
    use recall_core::test_helpers::{decode_render, find_target, run_game_ticks, sample_content, screen_frame};

    fn started() -> WordRain {
        let mut game = WordRain::default();
        game.start(sample_content(), None).unwrap();
        run_game_ticks(&mut game, 1, 16.67);
        game
    }

    #[test]
    fn round_spawns_answer_and_distractors() {
        let game = started();
        let render = decode_render(&game);
        assert_eq!(render.targets.len(), 4);
        assert_eq!(render.targets.iter().filter(|t| t.is_correct).count(), 1);
        for t in &render.targets {
            assert!((10.0..=90.0).contains(&t.x));
            assert!(t.y < 0.0, "words start above the screen");
        }
    }

    #[test]
    fn words_fall() {
        let mut game = started();
        let before = decode_render(&game).targets;
        run_game_ticks(&mut game, 10, 16.67);
        let after = decode_render(&game).targets;
        for (a, b) in before.iter().zip(&after) {
            assert_eq!(a.id, b.id);
            assert!(b.y > a.y);
            assert_eq!(a.x, b.x);
        }
    }

    #[test]
    fn hand_catches_correct_word() {
        let mut game = started();
        let correct = decode_render(&game).targets.into_iter().find(|t| t.is_correct).unwrap();
        let frame = screen_frame(1, &[(LandmarkName::RightHand, Point::new(correct.x, correct.y + 1.0))]);
        let events = game.update(16.67, &frame);
        assert!(events.iter().any(|e| matches!(
            e,
            EngineEvent::Hit {
                is_correct: true,
                by: Some(LandmarkName::RightHand),
                ..
            }
        )));
        assert!(game.engine().session().score >= 100);
    }

    #[test]
    fn catching_a_wrong_word_costs_points() {
        let mut game = started();
        let answer = find_target(&game, true).unwrap();
        game.select_target(answer);
        run_game_ticks(&mut game, 1, 16.67);
        assert_eq!(game.engine().session().score, 100);

        let wrong = find_target(&game, false).unwrap();
        let events = game.select_target(wrong);
        assert!(events.contains(&EngineEvent::Penalized { points_lost: 25, lives: 2 }));
        assert_eq!(game.engine().session().score, 75);
    }

    #[test]
    fn nose_is_not_tracked() {
        let mut game = started();
        let correct = decode_render(&game).targets.into_iter().find(|t| t.is_correct).unwrap();
        let frame = screen_frame(1, &[(LandmarkName::Nose, Point::new(correct.x, correct.y))]);
        let events = game.update(16.67, &frame);
        assert!(!events.iter().any(|e| matches!(e, EngineEvent::Hit { .. })));
        assert!(decode_render(&game).cursors.is_empty());
    }

    #[test]
    fn unanswered_words_cost_lives_until_game_over() {
        let mut game = started();
        // A medium word crosses the screen in at most about 11 s.
        let events = run_game_ticks(&mut game, 40 * 60, 16.67);
        let misses = events.iter().filter(|e| matches!(e, EngineEvent::Missed { .. })).count();
        assert_eq!(misses, 3);
        assert!(game.is_finished());
        assert_eq!(game.engine().session().lives, 0);
    }

    #[test]
    fn hard_rounds_are_bigger() {
        let mut game = WordRain::with_config(WordRainConfig {
            difficulty: Difficulty::Hard,
            ..WordRainConfig::default()
        });
        game.start(sample_content(), None).unwrap();
        run_game_ticks(&mut game, 1, 16.67);
        assert_eq!(decode_render(&game).targets.len(), 5);
    }

    #[test]
    fn practice_keeps_lives() {
        let mut game = WordRain::with_config(WordRainConfig {
            practice: true,
            ..WordRainConfig::default()
        });
        game.start(sample_content(), Some(30)).unwrap();
        run_game_ticks(&mut game, 20 * 60, 16.67);
        assert_eq!(game.engine().session().lives, 3);
        assert!(!game.engine().session().wrong_answers.is_empty());
    }

    #[test]
    fn practice_clock_counts_up_past_the_round() {
        let mut game = WordRain::with_config(WordRainConfig {
            practice: true,
            round_duration_secs: Some(5),
            ..WordRainConfig::default()
        });
        assert_eq!(game.metadata().timer_mode, TimerMode::CountUp);
        game.start(sample_content(), None).unwrap();
        assert_eq!(game.engine().session().time_left, 0);

        run_game_ticks(&mut game, 10 * 60, 16.67);
        assert!(!game.is_finished());
        assert!(game.engine().session().time_left >= 9);
        assert_eq!(decode_render(&game).time_left, game.engine().session().time_left);
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================

    #[test]
    fn contract_start_rejects_short_content() {
        let mut game = WordRain::default();
        recall_core::test_helpers::contract_start_rejects_short_content(&mut game);
    }

    #[test]
    fn contract_start_spawns_correct_target() {
        let mut game = WordRain::default();
        recall_core::test_helpers::contract_start_spawns_correct_target(&mut game);
    }

    #[test]
    fn contract_pause_freezes_state() {
        let mut game = WordRain::default();
        recall_core::test_helpers::contract_pause_freezes_state(&mut game);
    }

    #[test]
    fn contract_select_correct_scores() {
        let mut game = WordRain::default();
        recall_core::test_helpers::contract_select_correct_scores(&mut game);
    }

    #[test]
    fn contract_eventually_finishes() {
        let mut game = WordRain::default();
        recall_core::test_helpers::contract_eventually_finishes(&mut game, 2000);
    }

    #[test]
    fn contract_stop_reports_result() {
        let mut game = WordRain::default();
        recall_core::test_helpers::contract_stop_reports_result(&mut game);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn every_round_has_one_answer_inside_the_band(seed in any::<u64>()) {
                let mut game = WordRain::with_config(WordRainConfig { seed, ..WordRainConfig::default() });
                game.start(sample_content(), None).unwrap();
                run_game_ticks(&mut game, 1, 16.67);
                let render = decode_render(&game);
                prop_assert_eq!(render.targets.iter().filter(|t| t.is_correct).count(), 1);
                for t in &render.targets {
                    prop_assert!((10.0..=90.0).contains(&t.x));
                }
            }
        }
    }
}

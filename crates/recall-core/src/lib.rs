pub mod config;
pub mod content;
pub mod cursor;
pub mod detector;
pub mod engine;
pub mod error;
pub mod events;
pub mod game_registry;
pub mod game_trait;
pub mod motion;
pub mod pacer;
pub mod profile;
pub mod scoring;
pub mod session;
pub mod target;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::content::ContentItem;
    use crate::cursor::{LandmarkName, RawLandmark, TrackerFrame};
    use crate::engine::RenderFrame;
    use crate::events::EngineEvent;
    use crate::game_trait::RecallGame;
    use crate::session::Phase;
    use crate::target::{Point, TargetId};

    /// A small Spanish vocabulary deck.
    pub fn sample_content() -> Vec<ContentItem> {
        vec![
            ContentItem::new("es-1", "perro", "dog", &["cat", "horse"]),
            ContentItem::new("es-2", "gato", "cat", &["dog", "bird"]),
            ContentItem::new("es-3", "casa", "house", &["car", "home page"]),
            ContentItem::new("es-4", "agua", "water", &["fire", "milk"]),
            ContentItem::new("es-5", "libro", "book", &["pen", "table"]),
        ]
    }

    /// Build a tracker frame from screen-space positions, undoing the mirror
    /// so the resulting cursors land exactly on the given points.
    pub fn screen_frame(seq: u64, points: &[(LandmarkName, Point)]) -> TrackerFrame {
        TrackerFrame {
            seq,
            points: points
                .iter()
                .map(|(name, p)| (*name, RawLandmark::new(1.0 - p.x / 100.0, p.y / 100.0)))
                .collect(),
        }
    }

    /// Run N ticks with no tracker data, returning all accumulated events.
    pub fn run_game_ticks(game: &mut dyn RecallGame, n: usize, dt_ms: f32) -> Vec<EngineEvent> {
        let empty = TrackerFrame::empty();
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt_ms, &empty));
        }
        all_events
    }

    pub fn decode_render(game: &dyn RecallGame) -> RenderFrame {
        let bytes = game.render_state().expect("render state must encode");
        RenderFrame::decode(&bytes).expect("render state must decode")
    }

    pub fn find_target(game: &dyn RecallGame, correct: bool) -> Option<TargetId> {
        decode_render(game)
            .targets
            .iter()
            .find(|t| t.is_correct == correct)
            .map(|t| t.id)
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every RecallGame implementation must pass these. Game crates call them
    // from their own #[cfg(test)] modules with a fresh game instance.

    /// start() with fewer than the minimum items must fail and stay in setup.
    pub fn contract_start_rejects_short_content(game: &mut dyn RecallGame) {
        let mut items = sample_content();
        items.truncate(2);
        assert!(game.start(items, None).is_err(), "start must refuse 2 items");
        assert_eq!(game.engine().session().phase, Phase::Setup);
        assert!(!game.is_finished());
        assert!(run_game_ticks(game, 10, 16.67).is_empty());
    }

    /// start() picks a prompt and the first tick puts a correct target in play.
    pub fn contract_start_spawns_correct_target(game: &mut dyn RecallGame) {
        let events = game.start(sample_content(), None).expect("start must succeed");
        assert!(
            events.iter().any(|e| matches!(e, EngineEvent::PromptChanged { .. })),
            "start must choose a prompt"
        );
        run_game_ticks(game, 1, 16.67);
        let render = decode_render(game);
        assert_eq!(render.phase, Phase::Playing);
        assert!(render.prompt.is_some());
        assert!(
            render.targets.iter().any(|t| t.is_correct),
            "a correct target must be in play after the first tick"
        );
    }

    /// pause() must freeze state, resume() must unfreeze it.
    pub fn contract_pause_freezes_state(game: &mut dyn RecallGame) {
        game.start(sample_content(), None).expect("start must succeed");
        run_game_ticks(game, 3, 16.67);
        game.pause();
        let before = game.render_state().expect("encode");
        let events = run_game_ticks(game, 120, 16.67);
        assert!(events.is_empty(), "no events while paused");
        assert_eq!(before, game.render_state().expect("encode"), "state must not change while paused");

        game.resume();
        run_game_ticks(game, 1, 1000.0);
        assert_ne!(before, game.render_state().expect("encode"), "state must change after resume");
    }

    /// Selecting the correct target through the fallback input must score.
    pub fn contract_select_correct_scores(game: &mut dyn RecallGame) {
        game.start(sample_content(), None).expect("start must succeed");
        run_game_ticks(game, 1, 16.67);
        let id = find_target(game, true).expect("a correct target after the first tick");
        let events = game.select_target(id);
        assert!(
            events.iter().any(|e| matches!(e, EngineEvent::Scored { .. })),
            "selecting the correct target must score"
        );
        assert!(game.engine().session().score > 0);
        assert_eq!(game.engine().session().correct_answers, 1);
    }

    /// Running long enough must finish the session with exactly one
    /// `SessionFinished` event.
    pub fn contract_eventually_finishes(game: &mut dyn RecallGame, max_ticks: usize) {
        game.start(sample_content(), None).expect("start must succeed");
        let mut finishes = 0;
        for _ in 0..max_ticks {
            finishes += run_game_ticks(game, 1, 100.0)
                .iter()
                .filter(|e| e.is_finish())
                .count();
            if game.is_finished() {
                break;
            }
        }
        assert!(game.is_finished(), "game must finish within {max_ticks} ticks of 100ms");
        assert_eq!(finishes, 1, "SessionFinished must be emitted exactly once");
        assert!(run_game_ticks(game, 10, 100.0).is_empty());
    }

    /// stop() must end the session and return its result.
    pub fn contract_stop_reports_result(game: &mut dyn RecallGame) {
        game.start(sample_content(), None).expect("start must succeed");
        run_game_ticks(game, 30, 16.67);
        let result = game.stop();
        assert!(game.is_finished());
        assert_eq!(result, game.result());
        assert!(decode_render(game).targets.is_empty());
        assert!(run_game_ticks(game, 10, 16.67).is_empty());
    }
}

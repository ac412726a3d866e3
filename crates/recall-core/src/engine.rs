use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::content::{ContentDeck, ContentItem};
use crate::cursor::{CursorSet, LandmarkName, TrackerFrame};
use crate::detector::{Detector, Gesture, Hit, InteractionMode};
use crate::error::{CodecError, SetupError};
use crate::events::{EngineEvent, MissReason};
use crate::motion::{self, MotionMode};
use crate::pacer::{PacingCurve, Spawner, pick_free_slot, spread_positions};
use crate::profile::DifficultyProfile;
use crate::scoring::{Scorer, ScoringRules};
use crate::session::{Phase, Session, SessionResult, SessionSettings, TimerMode, WrongAnswer};
use crate::target::{Point, TargetId, TargetRegistry, TargetSpawn, Velocity};

/// Recorded as the given answer when a prompt went unanswered.
pub const NO_ANSWER: &str = "";

/// Edge (or center) that streamed targets enter from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnEdge {
    Top,
    Bottom,
    Left,
    Right,
    /// Left or right, chosen per spawn.
    Sides,
    /// Approaching from the screen center.
    Center,
}

/// How new targets are placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnLayout {
    /// One full round at once: the correct answer plus the profile's
    /// distractors, spread horizontally along `spawn_y`.
    Round {
        spawn_y: f32,
        min_x: f32,
        max_x: f32,
        min_separation: f32,
        max_retries: u32,
    },
    /// Single targets on the pacing cadence.
    Stream { edge: SpawnEdge, correct_chance: f32 },
    /// Single targets on the pacing cadence, each in a free fixed slot.
    Slots {
        slots: Vec<Point>,
        correct_chance: f32,
    },
}

/// Everything that distinguishes one motion game from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    pub motion: MotionMode,
    pub interaction: InteractionMode,
    pub layout: SpawnLayout,
    /// Keep exactly one correct target in play at a time.
    pub single_correct: bool,
    pub tracked_points: Vec<LandmarkName>,
    pub timer_mode: TimerMode,
    pub pacing: PacingCurve,
    pub scoring: ScoringRules,
    pub profile: DifficultyProfile,
    /// An unanswered prompt older than this counts as missed.
    pub prompt_timeout_ms: Option<f32>,
    /// Lifetime range for timed-despawn targets.
    pub lifetime_ms: Option<(f32, f32)>,
    pub seed: u64,
}

impl GameRules {
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.tracked_points.is_empty() {
            return Err(SetupError::InvalidRules("no tracked points".to_string()));
        }
        if self.profile.max_targets == 0 {
            return Err(SetupError::InvalidRules("max_targets must be at least 1".to_string()));
        }
        if let InteractionMode::Catch { hit_radius, .. } = self.interaction
            && hit_radius <= 0.0
        {
            return Err(SetupError::InvalidRules("hit radius must be positive".to_string()));
        }
        if let SpawnLayout::Slots { slots, .. } = &self.layout
            && slots.is_empty()
        {
            return Err(SetupError::InvalidRules("slot layout without slots".to_string()));
        }
        if let Some((low, high)) = self.lifetime_ms
            && (low <= 0.0 || high < low)
        {
            return Err(SetupError::InvalidRules(format!("bad lifetime range {low}..{high}")));
        }
        Ok(())
    }
}

/// Camera tracker availability, reported separately from the session phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrackerStatus {
    #[default]
    Pending,
    Active,
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: TargetId,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorView {
    pub name: LandmarkName,
    pub x: f32,
    pub y: f32,
}

/// Snapshot handed to the presentation layer every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub phase: Phase,
    pub score: u32,
    pub lives: u32,
    pub combo: u32,
    pub level: u32,
    pub time_left: u32,
    pub prompt: Option<String>,
    pub targets: Vec<TargetView>,
    pub cursors: Vec<CursorView>,
    pub tracker: TrackerStatus,
}

impl RenderFrame {
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        rmp_serde::to_vec(self).map_err(|e| CodecError::Serialize(e.to_string()))
    }

    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        rmp_serde::from_slice(data).map_err(|e| CodecError::Deserialize(e.to_string()))
    }
}

/// One running game: session, targets, pacing, cursors, detection and
/// scoring, advanced together by [`Engine::tick`].
#[derive(Debug, Clone)]
pub struct Engine {
    rules: GameRules,
    session: Session,
    registry: TargetRegistry,
    spawner: Spawner,
    cursors: CursorSet,
    detector: Detector,
    scorer: Scorer,
    deck: Option<ContentDeck>,
    tracker_status: TrackerStatus,
    prompt_started_ms: f32,
    finish_reported: bool,
    sessions_started: u64,
}

impl Engine {
    pub fn new(rules: GameRules) -> Self {
        let session = Session::new(SessionSettings::from_profile(&rules.profile, rules.timer_mode));
        Self {
            session,
            registry: TargetRegistry::with_capacity(rules.profile.max_targets.max(rules.profile.round_size())),
            spawner: Spawner::new(rules.pacing.clone(), rules.seed),
            cursors: CursorSet::new(&rules.tracked_points),
            detector: Detector::new(rules.interaction.clone()),
            scorer: Scorer::new(rules.scoring.clone()),
            deck: None,
            tracker_status: TrackerStatus::Pending,
            prompt_started_ms: 0.0,
            finish_reported: false,
            sessions_started: 0,
            rules,
        }
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    pub fn deck(&self) -> Option<&ContentDeck> {
        self.deck.as_ref()
    }

    pub fn level(&self) -> u32 {
        self.scorer.level()
    }

    pub fn tracker_status(&self) -> &TrackerStatus {
        &self.tracker_status
    }

    pub fn current_prompt(&self) -> Option<&ContentItem> {
        self.deck.as_ref().and_then(ContentDeck::current)
    }

    /// Validate and install the content package for the next session.
    pub fn load_content(&mut self, items: Vec<ContentItem>) -> Result<(), SetupError> {
        match ContentDeck::new(items) {
            Ok(deck) => {
                tracing::debug!(items = deck.len(), "Content loaded");
                self.deck = Some(deck);
                Ok(())
            },
            Err(e) => {
                tracing::warn!(error = %e, "Content rejected");
                Err(e)
            },
        }
    }

    /// Begin a session: clears leftover targets, resets counters, picks the
    /// first prompt. Refuses to enter `playing` without valid content.
    pub fn start(&mut self, custom_time: Option<u32>) -> Result<Vec<EngineEvent>, SetupError> {
        self.rules.validate()?;
        let deck = self.deck.as_mut().ok_or(SetupError::NoContent)?;
        deck.rewind();

        self.registry.clear();
        self.cursors.clear();
        self.detector.reset();
        self.scorer.reset();
        self.spawner.reset(self.rules.seed.wrapping_add(self.sessions_started));
        self.sessions_started += 1;
        self.finish_reported = false;
        self.session.start_game(custom_time);

        let mut events = Vec::new();
        self.advance_prompt(&mut events);
        Ok(events)
    }

    pub fn pause(&mut self) {
        self.session.pause_game();
    }

    pub fn resume(&mut self) {
        self.session.resume_game();
    }

    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
    }

    pub fn set_tracker_status(&mut self, status: TrackerStatus) {
        if let TrackerStatus::Unavailable { reason } = &status {
            tracing::warn!(%reason, "Tracker unavailable; only fallback input will register");
        }
        self.tracker_status = status;
    }

    /// End the session now and return its result. Clears targets and cursors.
    pub fn stop(&mut self) -> SessionResult {
        self.session.finish();
        self.finish_reported = true;
        self.registry.clear();
        self.cursors.clear();
        self.session.result()
    }

    /// Back to `setup` with an empty board; content stays loaded.
    pub fn reset(&mut self) {
        self.session.reset_game();
        self.registry.clear();
        self.cursors.clear();
        self.detector.reset();
        self.scorer.reset();
        self.finish_reported = false;
        if let Some(deck) = self.deck.as_mut() {
            deck.rewind();
        }
    }

    /// Advance one animation frame using the latest tracker snapshot.
    ///
    /// Order within a tick: clock, cursors, physics, detection and scoring,
    /// prompt timeout, spawning. Outside `playing` only the cursors update.
    pub fn tick(&mut self, dt_ms: f32, frame: &TrackerFrame) -> Vec<EngineEvent> {
        self.cursors.apply(frame);
        if self.tracker_status == TrackerStatus::Pending && !frame.points.is_empty() {
            self.tracker_status = TrackerStatus::Active;
        }

        let mut events = Vec::new();
        if !self.session.is_playing() {
            return events;
        }

        self.session.advance_clock(dt_ms);
        if !self.session.is_playing() {
            self.report_finish(&mut events);
            return events;
        }
        let now = self.session.played_ms();
        let mut resolved = false;

        for despawn in motion::step(&mut self.registry, &self.rules.motion, dt_ms, now) {
            if despawn.target.is_correct && !resolved && self.session.is_playing() {
                self.resolve_miss(Some(despawn.target.id), despawn.reason.into(), &mut events);
                resolved = true;
            }
        }

        let hits = self.detector.detect(&self.cursors, &mut self.registry, dt_ms);
        for hit in hits {
            if resolved || !self.session.is_playing() {
                break;
            }
            resolved = self.resolve_hit(hit, &mut events);
        }

        if let Some(timeout) = self.rules.prompt_timeout_ms
            && !resolved
            && self.session.is_playing()
            && now - self.prompt_started_ms >= timeout
        {
            self.resolve_miss(None, MissReason::PromptTimeout, &mut events);
        }

        if self.session.is_playing() {
            self.spawn_stage(dt_ms, now, &mut events);
        }
        self.report_finish(&mut events);
        events
    }

    /// Fallback input: resolve a target picked by pointer or touch exactly
    /// like a tracked hit.
    pub fn select_target(&mut self, id: TargetId) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if !self.session.is_playing() {
            return events;
        }
        let Some(target) = self.registry.remove(id) else {
            return events;
        };
        let hit = Hit {
            x: target.position.x,
            y: target.position.y,
            by: None,
            gesture: Gesture::Pointer,
            target,
        };
        self.resolve_hit(hit, &mut events);
        self.report_finish(&mut events);
        events
    }

    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame {
            phase: self.session.phase,
            score: self.session.score,
            lives: self.session.lives,
            combo: self.session.combo,
            level: self.scorer.level(),
            time_left: self.session.time_left,
            prompt: self.current_prompt().map(|item| item.prompt.clone()),
            targets: self
                .registry
                .iter()
                .map(|t| TargetView {
                    id: t.id,
                    text: t.display_text.clone(),
                    x: t.position.x,
                    y: t.position.y,
                    scale: t.scale(),
                    is_correct: t.is_correct,
                })
                .collect(),
            cursors: self
                .cursors
                .visible()
                .map(|p| CursorView {
                    name: p.name,
                    x: p.screen.x,
                    y: p.screen.y,
                })
                .collect(),
            tracker: self.tracker_status.clone(),
        }
    }

    /// Returns true when the hit resolved the current prompt.
    fn resolve_hit(&mut self, hit: Hit, events: &mut Vec<EngineEvent>) -> bool {
        events.push(EngineEvent::Hit {
            target_id: hit.target.id,
            is_correct: hit.target.is_correct,
            x: hit.x,
            y: hit.y,
            by: hit.by,
            gesture: hit.gesture,
        });
        if hit.target.is_correct {
            events.extend(self.scorer.on_correct(&mut self.session));
            if self.session.is_playing() {
                self.advance_prompt(events);
            }
            true
        } else {
            let detail = self.wrong_answer(&hit.target.display_text);
            events.extend(self.scorer.on_wrong(&mut self.session, detail));
            false
        }
    }

    fn resolve_miss(&mut self, target_id: Option<TargetId>, reason: MissReason, events: &mut Vec<EngineEvent>) {
        tracing::debug!(?target_id, ?reason, "Prompt missed");
        events.push(EngineEvent::Missed { target_id, reason });
        let detail = self.wrong_answer(NO_ANSWER);
        events.extend(self.scorer.on_missed(&mut self.session, detail));
        if self.session.is_playing() {
            self.advance_prompt(events);
        }
    }

    fn wrong_answer(&self, given: &str) -> WrongAnswer {
        let (prompt_term, correct_answer) = self
            .current_prompt()
            .map(|item| (item.prompt.clone(), item.correct_answer.clone()))
            .unwrap_or_default();
        WrongAnswer {
            prompt_term,
            correct_answer,
            given_answer: given.to_string(),
        }
    }

    /// Clear the board and move to a different prompt; the next spawn is due
    /// immediately so a correct target appears this tick.
    fn advance_prompt(&mut self, events: &mut Vec<EngineEvent>) {
        self.registry.clear();
        let Some(deck) = self.deck.as_mut() else {
            return;
        };
        let item = deck.advance(self.spawner.rng());
        tracing::debug!(item_id = %item.id, "Next prompt");
        events.push(EngineEvent::PromptChanged {
            item_id: item.id.clone(),
            prompt: item.prompt.clone(),
        });
        self.prompt_started_ms = self.session.played_ms();
        self.spawner.force_due();
    }

    fn spawn_stage(&mut self, dt_ms: f32, now: f32, events: &mut Vec<EngineEvent>) {
        let Some(deck) = self.deck.as_ref() else {
            return;
        };
        let profile = &self.rules.profile;
        let lifetime = self.rules.lifetime_ms;

        match &self.rules.layout {
            SpawnLayout::Round {
                spawn_y,
                min_x,
                max_x,
                min_separation,
                max_retries,
            } => {
                if self.registry.has_correct() {
                    return;
                }
                let size = profile.round_size();
                let rng = self.spawner.rng();
                let xs = spread_positions(rng, size, *min_x, *max_x, *min_separation, *max_retries);
                let correct_index = random_index(rng, size);
                for (i, x) in xs.into_iter().enumerate() {
                    let is_correct = i == correct_index;
                    let Some(text) = answer_text(deck, self.spawner.rng(), &self.registry, is_correct) else {
                        continue;
                    };
                    let speed = self.spawner.speed(profile, now);
                    let mut spec = TargetSpawn::new(text, is_correct, Point::new(x, *spawn_y));
                    spec.velocity = Velocity { vx: 0.0, vy: speed };
                    spec.lifetime_ms = lifetime.map(|(lo, hi)| self.spawner.range(lo, hi));
                    push_spawn(&mut self.registry, spec, now, events);
                }
            },
            SpawnLayout::Stream {
                edge,
                correct_chance,
            } => {
                if !self.spawner.ready(dt_ms, now, self.registry.len(), profile.max_targets) {
                    return;
                }
                let is_correct = self.spawner.choose_correct(
                    self.registry.has_correct(),
                    self.rules.single_correct,
                    *correct_chance,
                );
                let Some(text) = answer_text(deck, self.spawner.rng(), &self.registry, is_correct) else {
                    return;
                };
                let speed = self.spawner.speed(profile, now);
                let mut spec = stream_spawn(&mut self.spawner, *edge, text, is_correct, speed);
                spec.lifetime_ms = lifetime.map(|(lo, hi)| self.spawner.range(lo, hi));
                push_spawn(&mut self.registry, spec, now, events);
            },
            SpawnLayout::Slots {
                slots,
                correct_chance,
            } => {
                let cap = profile.max_targets.min(slots.len());
                if !self.spawner.ready(dt_ms, now, self.registry.len(), cap) {
                    return;
                }
                let occupied: Vec<usize> = self.registry.occupied_slots().collect();
                let Some(slot) = pick_free_slot(self.spawner.rng(), slots.len(), &occupied) else {
                    return;
                };
                let is_correct = self.spawner.choose_correct(
                    self.registry.has_correct(),
                    self.rules.single_correct,
                    *correct_chance,
                );
                let Some(text) = answer_text(deck, self.spawner.rng(), &self.registry, is_correct) else {
                    return;
                };
                let mut spec = TargetSpawn::new(text, is_correct, slots[slot]);
                spec.slot = Some(slot);
                spec.lifetime_ms = lifetime.map(|(lo, hi)| self.spawner.range(lo, hi));
                push_spawn(&mut self.registry, spec, now, events);
            },
        }
    }

    fn report_finish(&mut self, events: &mut Vec<EngineEvent>) {
        if self.session.is_finished() && !self.finish_reported {
            self.finish_reported = true;
            self.registry.clear();
            events.push(EngineEvent::SessionFinished(self.session.result()));
        }
    }
}

fn push_spawn(registry: &mut TargetRegistry, spec: TargetSpawn, now: f32, events: &mut Vec<EngineEvent>) {
    let is_correct = spec.is_correct;
    let target_id = registry.spawn(spec, now);
    tracing::trace!(%target_id, is_correct, "Target spawned");
    events.push(EngineEvent::Spawned {
        target_id,
        is_correct,
    });
}

fn random_index(rng: &mut StdRng, len: usize) -> usize {
    use rand::Rng;
    if len == 0 { 0 } else { rng.random_range(0..len) }
}

/// Text for a new target: the current answer, or a distractor not already
/// on screen.
fn answer_text(
    deck: &ContentDeck,
    rng: &mut StdRng,
    registry: &TargetRegistry,
    is_correct: bool,
) -> Option<String> {
    if is_correct {
        return deck.current().map(|item| item.correct_answer.clone());
    }
    let on_screen: Vec<&str> = registry.iter().map(|t| t.display_text.as_str()).collect();
    deck.distractor_for(rng, &on_screen)
}

fn stream_spawn(spawner: &mut Spawner, edge: SpawnEdge, text: String, is_correct: bool, speed: f32) -> TargetSpawn {
    let edge = match edge {
        SpawnEdge::Sides => {
            if spawner.range(0.0, 1.0) < 0.5 {
                SpawnEdge::Left
            } else {
                SpawnEdge::Right
            }
        },
        other => other,
    };
    let mut spec = TargetSpawn::new(text, is_correct, Point::CENTER);
    match edge {
        SpawnEdge::Top => {
            spec.position = Point::new(spawner.range(10.0, 90.0), -5.0);
            spec.velocity = Velocity { vx: 0.0, vy: speed };
        },
        SpawnEdge::Bottom => {
            spec.position = Point::new(spawner.range(10.0, 90.0), 105.0);
            spec.velocity = Velocity { vx: 0.0, vy: -speed };
        },
        SpawnEdge::Left | SpawnEdge::Right => {
            let (x, vx) = if edge == SpawnEdge::Left {
                (-10.0, speed)
            } else {
                (110.0, -speed)
            };
            spec.position = Point::new(x, spawner.range(20.0, 80.0));
            spec.velocity = Velocity {
                vx,
                vy: spawner.range(-0.5, 0.5) * speed,
            };
        },
        SpawnEdge::Center | SpawnEdge::Sides => {
            spec.approach_speed = Some(speed);
            spec.destination = Some(Point::new(spawner.range(15.0, 85.0), spawner.range(20.0, 80.0)));
        },
    }
    spec
}

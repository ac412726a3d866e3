use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::DifficultyProfile;
use crate::time::timestamp_now;

/// Milliseconds per timer step.
const TIMER_STEP_MS: f32 = 1000.0;
/// Score multiplier added per combo step.
pub const COMBO_MULTIPLIER_STEP: f64 = 0.1;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Setup,
    Playing,
    Paused,
    Finished,
}

/// Whether `time_left` counts down to a deadline or up from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerMode {
    #[default]
    Countdown,
    CountUp,
}

/// One answered-wrong entry, kept for later spaced review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongAnswer {
    pub prompt_term: String,
    pub correct_answer: String,
    pub given_answer: String,
}

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub starting_lives: u32,
    pub max_lives: u32,
    pub round_duration_secs: u32,
    pub timer_mode: TimerMode,
}

impl SessionSettings {
    pub fn from_profile(profile: &DifficultyProfile, timer_mode: TimerMode) -> Self {
        Self {
            starting_lives: profile.starting_lives,
            max_lives: profile.max_lives.max(profile.starting_lives),
            round_duration_secs: profile.round_duration_secs,
            timer_mode,
        }
    }
}

/// Summary handed to the persistence collaborator when a session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_id: Uuid,
    pub started_at: Option<String>,
    pub score: u32,
    pub duration_seconds: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub accuracy: u32,
    pub max_combo: u32,
    pub wrong_answers: Vec<WrongAnswer>,
}

/// Score, lives, combo and timer for one play-through.
///
/// Every operation is a pure state reduction: requests that make no sense in
/// the current phase are ignored rather than reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    settings: SessionSettings,
    id: Uuid,
    started_at: Option<String>,
    pub phase: Phase,
    pub score: u32,
    pub lives: u32,
    pub combo: u32,
    pub max_combo: u32,
    /// Seconds remaining (countdown) or elapsed (count-up).
    pub time_left: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub wrong_answers: Vec<WrongAnswer>,
    /// Milliseconds spent in `playing`.
    played_ms: f32,
    /// Partial second carried between clock advances.
    timer_accum_ms: f32,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Self {
        let lives = settings.starting_lives;
        let time_left = match settings.timer_mode {
            TimerMode::Countdown => settings.round_duration_secs,
            TimerMode::CountUp => 0,
        };
        Self {
            settings,
            id: Uuid::nil(),
            started_at: None,
            phase: Phase::Setup,
            score: 0,
            lives,
            combo: 0,
            max_combo: 0,
            time_left,
            correct_answers: 0,
            total_questions: 0,
            wrong_answers: Vec::new(),
            played_ms: 0.0,
            timer_accum_ms: 0.0,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Milliseconds spent in `playing` since the last start.
    pub fn played_ms(&self) -> f32 {
        self.played_ms
    }

    /// Reset every counter and enter `playing`.
    ///
    /// In countdown mode `custom_time` replaces the profile's round duration
    /// (at least one second). Count-up sessions always start from zero.
    /// Leftover targets are the caller's concern.
    pub fn start_game(&mut self, custom_time: Option<u32>) {
        let settings = self.settings.clone();
        *self = Self::new(settings);
        if self.settings.timer_mode == TimerMode::Countdown {
            self.time_left = custom_time
                .unwrap_or(self.settings.round_duration_secs)
                .max(1);
        }
        self.id = Uuid::new_v4();
        self.started_at = Some(timestamp_now());
        self.phase = Phase::Playing;
        tracing::info!(session_id = %self.id, time = self.time_left, "Session started");
    }

    /// Return to `setup` with fresh counters.
    pub fn reset_game(&mut self) {
        let settings = self.settings.clone();
        *self = Self::new(settings);
    }

    pub fn pause_game(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
        }
    }

    pub fn resume_game(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Playing;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Playing => self.phase = Phase::Paused,
            Phase::Paused => self.phase = Phase::Playing,
            Phase::Setup | Phase::Finished => {},
        }
    }

    /// Force the session into `finished` (stop button, lives or time out).
    pub fn finish(&mut self) {
        if self.phase != Phase::Finished {
            self.phase = Phase::Finished;
            tracing::info!(
                session_id = %self.id,
                score = self.score,
                accuracy = self.accuracy(),
                "Session finished"
            );
        }
    }

    /// Award a correct answer and return the points added.
    ///
    /// The multiplier `1 + combo * 0.1` uses the combo from before this hit,
    /// so the first hit of a streak scores 1.0x.
    pub fn record_correct(&mut self, points: u32, apply_combo_multiplier: bool) -> u32 {
        if !self.is_playing() {
            return 0;
        }
        self.total_questions += 1;
        self.correct_answers += 1;
        let awarded = if apply_combo_multiplier {
            let multiplier = 1.0 + f64::from(self.combo) * COMBO_MULTIPLIER_STEP;
            (f64::from(points) * multiplier).round() as u32
        } else {
            points
        };
        self.score = self.score.saturating_add(awarded);
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        awarded
    }

    /// Count a wrong answer: breaks the combo, logs `detail`, and optionally
    /// costs a life.
    pub fn record_incorrect(&mut self, detail: Option<WrongAnswer>, lose_life: bool) {
        if !self.is_playing() {
            return;
        }
        self.total_questions += 1;
        self.combo = 0;
        if let Some(detail) = detail {
            self.wrong_answers.push(detail);
        }
        if lose_life {
            self.adjust_lives(-1);
        }
    }

    /// Add points without touching combo or question counters.
    pub fn add_bonus_points(&mut self, points: u32) {
        if self.is_playing() {
            self.score = self.score.saturating_add(points);
        }
    }

    /// Remove points, never below zero. Returns the points actually removed.
    pub fn deduct_points(&mut self, points: u32) -> u32 {
        if !self.is_playing() {
            return 0;
        }
        let removed = points.min(self.score);
        self.score -= removed;
        removed
    }

    /// Break the combo without counting a question.
    pub fn reset_combo(&mut self) {
        if self.is_playing() {
            self.combo = 0;
        }
    }

    /// Shift lives by `delta`, clamped to `[0, max_lives]`. Reaching zero
    /// finishes the session.
    pub fn adjust_lives(&mut self, delta: i64) {
        if self.phase == Phase::Finished {
            return;
        }
        let max = i64::from(self.settings.max_lives);
        self.lives = (i64::from(self.lives) + delta).clamp(0, max) as u32;
        if self.lives == 0 {
            self.finish();
        }
    }

    /// Extend (countdown) or advance (count-up) the timer.
    pub fn add_time(&mut self, seconds: u32) {
        if matches!(self.phase, Phase::Playing | Phase::Paused) {
            self.time_left = self.time_left.saturating_add(seconds);
        }
    }

    /// Percentage of answered questions that were correct, rounded.
    pub fn accuracy(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        (f64::from(self.correct_answers) / f64::from(self.total_questions) * 100.0).round() as u32
    }

    /// Feed elapsed wall time into the one-second timer. Only `playing`
    /// advances it; a paused session keeps its partial second untouched.
    /// Returns true if the clock ran out on this call.
    pub fn advance_clock(&mut self, dt_ms: f32) -> bool {
        if !self.is_playing() || dt_ms <= 0.0 || !dt_ms.is_finite() {
            return false;
        }
        self.played_ms += dt_ms;
        self.timer_accum_ms += dt_ms;
        while self.timer_accum_ms >= TIMER_STEP_MS {
            self.timer_accum_ms -= TIMER_STEP_MS;
            match self.settings.timer_mode {
                TimerMode::Countdown => {
                    self.time_left = self.time_left.saturating_sub(1);
                    if self.time_left == 0 {
                        self.timer_accum_ms = 0.0;
                        self.finish();
                        return true;
                    }
                },
                TimerMode::CountUp => self.time_left = self.time_left.saturating_add(1),
            }
        }
        false
    }

    pub fn result(&self) -> SessionResult {
        SessionResult {
            session_id: self.id,
            started_at: self.started_at.clone(),
            score: self.score,
            duration_seconds: (self.played_ms / 1000.0).round() as u32,
            correct_answers: self.correct_answers,
            total_questions: self.total_questions,
            accuracy: self.accuracy(),
            max_combo: self.max_combo,
            wrong_answers: self.wrong_answers.clone(),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::events::EngineEvent;
use crate::session::{Session, WrongAnswer};

/// Points for a correct answer before multipliers.
pub const BASE_POINTS: u32 = 100;

/// What happens when a correct target leaves play unanswered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    Ignore,
    /// Break the combo without counting a question.
    ResetCombo,
    /// Count a wrong answer but keep lives.
    CountWrong,
    /// Count a wrong answer and lose a life (outside practice mode).
    #[default]
    LoseLife,
}

/// Scoring knobs for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub base_points: u32,
    pub apply_combo_multiplier: bool,
    /// Flat bonus per combo step held before the hit; 0 disables.
    pub combo_bonus_step: u32,
    pub combo_bonus_cap: u32,
    /// Points per level; 0 disables levels.
    pub level_threshold: u32,
    /// Consecutive correct hits that earn a life; 0 disables.
    pub streak_for_life: u32,
    /// Points removed for hitting a wrong target.
    pub wrong_penalty: u32,
    /// Practice mode never costs lives.
    pub practice: bool,
    pub miss_policy: MissPolicy,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_points: BASE_POINTS,
            apply_combo_multiplier: true,
            combo_bonus_step: 0,
            combo_bonus_cap: 0,
            level_threshold: 0,
            streak_for_life: 0,
            wrong_penalty: 0,
            practice: false,
            miss_policy: MissPolicy::LoseLife,
        }
    }
}

/// Turns hit and miss outcomes into session updates.
#[derive(Debug, Clone)]
pub struct Scorer {
    rules: ScoringRules,
    level: u32,
    streak: u32,
}

impl Scorer {
    pub fn new(rules: ScoringRules) -> Self {
        Self {
            rules,
            level: 1,
            streak: 0,
        }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn reset(&mut self) {
        self.level = 1;
        self.streak = 0;
    }

    /// Score a correct hit: combo-multiplied base points, the combo-tier
    /// bonus, a streak life, and any level-up.
    pub fn on_correct(&mut self, session: &mut Session) -> Vec<EngineEvent> {
        if !session.is_playing() {
            return Vec::new();
        }
        let mut events = Vec::new();
        let combo_before = session.combo;
        let awarded = session.record_correct(self.rules.base_points, self.rules.apply_combo_multiplier);
        let bonus = self.combo_bonus(combo_before);
        session.add_bonus_points(bonus);
        events.push(EngineEvent::Scored {
            points: awarded + bonus,
            combo: session.combo,
            score: session.score,
        });

        self.streak += 1;
        if self.rules.streak_for_life > 0
            && self.streak % self.rules.streak_for_life == 0
            && session.lives < session.settings().max_lives
        {
            session.adjust_lives(1);
            tracing::debug!(streak = self.streak, lives = session.lives, "Streak life awarded");
            events.push(EngineEvent::LifeGained {
                lives: session.lives,
            });
        }

        if let Some(level) = self.check_level(session.score) {
            events.push(EngineEvent::LevelUp { level });
        }
        events
    }

    /// Penalize hitting a wrong target.
    pub fn on_wrong(&mut self, session: &mut Session, detail: WrongAnswer) -> Vec<EngineEvent> {
        if !session.is_playing() {
            return Vec::new();
        }
        self.streak = 0;
        let points_lost = session.deduct_points(self.rules.wrong_penalty);
        session.record_incorrect(Some(detail), !self.rules.practice);
        vec![EngineEvent::Penalized {
            points_lost,
            lives: session.lives,
        }]
    }

    /// Apply the miss policy for a correct target that went unanswered.
    /// Missed distractors never reach here.
    pub fn on_missed(&mut self, session: &mut Session, detail: WrongAnswer) -> Vec<EngineEvent> {
        if !session.is_playing() {
            return Vec::new();
        }
        self.streak = 0;
        match self.rules.miss_policy {
            MissPolicy::Ignore => return Vec::new(),
            MissPolicy::ResetCombo => session.reset_combo(),
            MissPolicy::CountWrong => session.record_incorrect(Some(detail), false),
            MissPolicy::LoseLife => session.record_incorrect(Some(detail), !self.rules.practice),
        }
        vec![EngineEvent::Penalized {
            points_lost: 0,
            lives: session.lives,
        }]
    }

    fn combo_bonus(&self, combo_before: u32) -> u32 {
        if self.rules.combo_bonus_step == 0 {
            return 0;
        }
        self.rules
            .combo_bonus_step
            .saturating_mul(combo_before)
            .min(self.rules.combo_bonus_cap)
    }

    /// Levels only go up; a later penalty does not demote.
    fn check_level(&mut self, score: u32) -> Option<u32> {
        if self.rules.level_threshold == 0 {
            return None;
        }
        let level = 1 + score / self.rules.level_threshold;
        if level > self.level {
            self.level = level;
            tracing::debug!(level, score, "Level up");
            return Some(level);
        }
        None
    }
}

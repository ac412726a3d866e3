use serde::{Deserialize, Serialize};

use crate::cursor::LandmarkName;
use crate::detector::Gesture;
use crate::motion::DespawnReason;
use crate::session::SessionResult;
use crate::target::TargetId;

/// Why a correct target went unanswered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    OutOfBounds,
    PassedPlayer,
    Expired,
    PromptTimeout,
}

impl From<DespawnReason> for MissReason {
    fn from(reason: DespawnReason) -> Self {
        match reason {
            DespawnReason::OutOfBounds => MissReason::OutOfBounds,
            DespawnReason::PassedPlayer => MissReason::PassedPlayer,
            DespawnReason::Expired => MissReason::Expired,
        }
    }
}

/// Events emitted by the engine during a tick, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    PromptChanged {
        item_id: String,
        prompt: String,
    },
    Spawned {
        target_id: TargetId,
        is_correct: bool,
    },
    Hit {
        target_id: TargetId,
        is_correct: bool,
        x: f32,
        y: f32,
        by: Option<LandmarkName>,
        gesture: Gesture,
    },
    Scored {
        points: u32,
        combo: u32,
        score: u32,
    },
    Penalized {
        points_lost: u32,
        lives: u32,
    },
    Missed {
        target_id: Option<TargetId>,
        reason: MissReason,
    },
    LifeGained {
        lives: u32,
    },
    LevelUp {
        level: u32,
    },
    SessionFinished(SessionResult),
}

impl EngineEvent {
    pub fn is_finish(&self) -> bool {
        matches!(self, EngineEvent::SessionFinished(_))
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game_trait::GameMetadata;

/// Identifier for a registered game type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    WordRain,
    BalloonPop,
    Whack,
    GoalKeeper,
    HeaderMatch,
}

impl GameId {
    pub const ALL: [GameId; 5] = [
        GameId::WordRain,
        GameId::BalloonPop,
        GameId::Whack,
        GameId::GoalKeeper,
        GameId::HeaderMatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::WordRain => "word-rain",
            GameId::BalloonPop => "balloon-pop",
            GameId::Whack => "whack",
            GameId::GoalKeeper => "goal-keeper",
            GameId::HeaderMatch => "header-match",
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a game name matches no registered game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGame(pub String);

impl fmt::Display for UnknownGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown game: {}", self.0)
    }
}

impl std::error::Error for UnknownGame {}

impl FromStr for GameId {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        GameId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownGame(s.to_string()))
    }
}

/// A registered game entry in the game catalog.
#[derive(Debug, Clone)]
pub struct GameEntry {
    pub id: GameId,
    pub metadata: GameMetadata,
}

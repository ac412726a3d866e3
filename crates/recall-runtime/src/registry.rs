use std::collections::HashMap;

use recall_core::game_registry::{GameEntry, GameId};
use recall_core::game_trait::RecallGame;

/// Factory function type for creating game instances.
pub type GameFactory = fn() -> Box<dyn RecallGame>;

/// Maps game ids to factories for the games compiled into this build.
pub struct GameCatalog {
    factories: HashMap<GameId, GameFactory>,
}

impl Default for GameCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl GameCatalog {
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        catalog.register_defaults();
        catalog
    }

    /// A catalog with nothing registered.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    fn register_defaults(&mut self) {
        #[cfg(feature = "word-rain")]
        self.register(GameId::WordRain, || Box::new(recall_word_rain::WordRain::new()));
        #[cfg(feature = "balloon-pop")]
        self.register(GameId::BalloonPop, || Box::new(recall_balloon_pop::BalloonPop::new()));
        #[cfg(feature = "whack")]
        self.register(GameId::Whack, || Box::new(recall_whack::Whack::new()));
        #[cfg(feature = "goalkeeper")]
        {
            self.register(GameId::GoalKeeper, || Box::new(recall_goalkeeper::GoalKeeper::new()));
            self.register(GameId::HeaderMatch, || Box::new(recall_goalkeeper::HeaderMatch::new()));
        }
    }

    /// Add or replace a factory.
    pub fn register(&mut self, id: GameId, factory: GameFactory) {
        self.factories.insert(id, factory);
    }

    pub fn create(&self, id: GameId) -> Option<Box<dyn RecallGame>> {
        self.factories.get(&id).map(|f| f())
    }

    /// Registered game ids in a stable order.
    pub fn available_games(&self) -> Vec<GameId> {
        let mut ids: Vec<GameId> = self.factories.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Catalog entries with metadata, for a game picker.
    pub fn entries(&self) -> Vec<GameEntry> {
        self.available_games()
            .into_iter()
            .filter_map(|id| {
                self.create(id).map(|game| GameEntry {
                    id,
                    metadata: game.metadata(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_registers_every_game() {
        let catalog = GameCatalog::new();
        assert_eq!(catalog.available_games(), GameId::ALL.to_vec());
    }

    #[test]
    fn created_games_match_their_id() {
        let catalog = GameCatalog::new();
        let names: Vec<String> = catalog.entries().into_iter().map(|e| e.metadata.name).collect();
        assert_eq!(
            names,
            vec!["Word Rain", "Balloon Pop", "Whack", "Goal Keeper", "Header Match"]
        );
    }

    #[test]
    fn empty_catalog_creates_nothing() {
        let catalog = GameCatalog::empty();
        assert!(catalog.create(GameId::Whack).is_none());
        assert!(catalog.available_games().is_empty());
    }
}

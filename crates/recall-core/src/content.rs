use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, SetupError};

/// Minimum number of items a round-robin session can cycle through.
pub const MIN_ITEMS: usize = 3;

/// One playable recall item, as produced by the content adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub prompt: String,
    pub correct_answer: String,
    #[serde(default)]
    pub distractors: Vec<String>,
}

impl ContentItem {
    pub fn new(
        id: impl Into<String>,
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        distractors: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            correct_answer: correct_answer.into(),
            distractors: distractors.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// Validated content with a current prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDeck {
    items: Vec<ContentItem>,
    current: Option<usize>,
}

impl ContentDeck {
    pub fn new(items: Vec<ContentItem>) -> Result<Self, SetupError> {
        if items.is_empty() {
            return Err(SetupError::NoContent);
        }
        if items.len() < MIN_ITEMS {
            return Err(SetupError::insufficient(items.len()));
        }
        if let Some(bad) = items
            .iter()
            .find(|i| i.prompt.trim().is_empty() || i.correct_answer.trim().is_empty())
        {
            return Err(SetupError::EmptyItem {
                item_id: bad.id.clone(),
            });
        }
        Ok(Self {
            items,
            current: None,
        })
    }

    /// Parse a JSON array of items. Validation errors surface as setup errors
    /// once the deck is built with [`ContentDeck::new`].
    pub fn parse_items(json: &str) -> Result<Vec<ContentItem>, CodecError> {
        serde_json::from_str(json).map_err(|e| CodecError::Deserialize(e.to_string()))
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<&ContentItem> {
        self.current.and_then(|i| self.items.get(i))
    }

    /// Forget the current prompt (new session).
    pub fn rewind(&mut self) {
        self.current = None;
    }

    /// Move to a random prompt other than the current one.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> &ContentItem {
        let len = self.items.len();
        let next = match self.current {
            Some(cur) if len > 1 => {
                // Draw from the other len-1 items.
                let pick = rng.random_range(0..len - 1);
                if pick >= cur { pick + 1 } else { pick }
            },
            _ => rng.random_range(0..len),
        };
        self.current = Some(next);
        &self.items[next]
    }

    /// A wrong answer for the current prompt that is not already on screen.
    ///
    /// The item's own distractors come first; once they are exhausted the
    /// correct answers of other items are used. Never returns the current
    /// correct answer. Returns `None` only when every candidate is excluded.
    pub fn distractor_for<R: Rng>(&self, rng: &mut R, on_screen: &[&str]) -> Option<String> {
        let item = self.current()?;
        let usable = |text: &&str| {
            !text.eq_ignore_ascii_case(&item.correct_answer) && !on_screen.contains(text)
        };

        let own: Vec<&str> = item
            .distractors
            .iter()
            .map(String::as_str)
            .filter(usable)
            .collect();
        if !own.is_empty() {
            return Some(own[rng.random_range(0..own.len())].to_string());
        }

        let borrowed: Vec<&str> = self
            .items
            .iter()
            .map(|i| i.correct_answer.as_str())
            .filter(usable)
            .collect();
        if borrowed.is_empty() {
            return None;
        }
        Some(borrowed[rng.random_range(0..borrowed.len())].to_string())
    }
}

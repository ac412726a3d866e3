use crate::content::MIN_ITEMS;

/// Reasons a session refuses to enter `playing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// No content package has been loaded into the engine.
    NoContent,
    /// The content package has fewer items than a round-robin session needs.
    InsufficientContent { have: usize, need: usize },
    /// An item has an empty prompt or correct answer.
    EmptyItem { item_id: String },
    /// Game rules that cannot produce a playable session.
    InvalidRules(String),
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoContent => write!(f, "no content selected"),
            Self::InsufficientContent { have, need } => {
                write!(f, "content has {have} items, at least {need} required")
            },
            Self::EmptyItem { item_id } => {
                write!(f, "content item {item_id} has an empty prompt or answer")
            },
            Self::InvalidRules(m) => write!(f, "invalid game rules: {m}"),
        }
    }
}

impl std::error::Error for SetupError {}

impl SetupError {
    pub fn insufficient(have: usize) -> Self {
        Self::InsufficientContent {
            have,
            need: MIN_ITEMS,
        }
    }
}

/// Failures encoding or decoding engine data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    Serialize(String),
    Deserialize(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(e) => write!(f, "serialize error: {e}"),
            Self::Deserialize(e) => write!(f, "deserialize error: {e}"),
        }
    }
}

impl std::error::Error for CodecError {}

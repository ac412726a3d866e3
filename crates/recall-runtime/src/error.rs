use recall_core::error::{CodecError, SetupError};
use recall_core::game_registry::GameId;

#[derive(Debug)]
pub enum RuntimeError {
    /// The game is not compiled into this build.
    UnknownGame(GameId),
    Setup(SetupError),
    /// The content file could not be read.
    ContentIo { path: String, error: std::io::Error },
    Codec(CodecError),
    /// The session task exited without reporting a result.
    SessionLost,
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownGame(id) => write!(f, "game {id} is not available in this build"),
            Self::Setup(e) => write!(f, "setup failed: {e}"),
            Self::ContentIo { path, error } => write!(f, "cannot read content file {path}: {error}"),
            Self::Codec(e) => write!(f, "{e}"),
            Self::SessionLost => write!(f, "session task exited without a result"),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Setup(e) => Some(e),
            Self::ContentIo { error, .. } => Some(error),
            Self::Codec(e) => Some(e),
            Self::UnknownGame(_) | Self::SessionLost => None,
        }
    }
}

impl From<SetupError> for RuntimeError {
    fn from(e: SetupError) -> Self {
        Self::Setup(e)
    }
}

impl From<CodecError> for RuntimeError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

use thiserror::Error;

/// Errors surfaced to the host. Gameplay itself never fails: operations after
/// the session ended are ignored and a corrupt stats snapshot falls back to
/// defaults.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid viewport {width}x{height}: both sides must be positive and finite")]
    InvalidViewport { width: f64, height: f64 },

    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid game config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;

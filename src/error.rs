use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("grid size must be at least 1, got {0}")]
    InvalidGridSize(usize),

    #[error("expected {expected} elevation values, got {got}")]
    GridLengthMismatch { expected: usize, got: usize },

    #[error("unknown brush size: {0}")]
    UnknownBrushSize(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

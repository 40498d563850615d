use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The host could not provide a drawing context for the canvas.
    #[error("Canvas drawing context is unavailable")]
    RenderContextUnavailable,
    #[error("Invalid settings at {path:?}: {reason}")]
    Settings { path: PathBuf, reason: String },
    #[error("Malformed schema snapshot: {0}")]
    Snapshot(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

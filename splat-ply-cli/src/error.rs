use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Ply(#[from] splat_ply::PlyError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid RGBA '{0}': expected four 0-255 values like 255,255,255,255")]
    BadRgba(String),
}

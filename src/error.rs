//! Error types for the media renamer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for media renamer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the media renamer
///
/// Errors raised while processing a file end that file only; the batch
/// driver turns them into an outcome and moves on.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported media type for {path}: {signature}")]
    UnsupportedType { path: PathBuf, signature: String },

    #[error("No usable creation date in {path}")]
    UnknownDate { path: PathBuf },

    #[error("Destination already exists: {destination}")]
    TargetExists { source_path: PathBuf, destination: PathBuf },

    #[error("Camera model '{model}' is longer than {max} characters")]
    CameraModelTooLong { model: String, max: usize },

    #[error("{tool} failed on {path}: {message}")]
    Tool {
        tool: String,
        path: PathBuf,
        message: String,
    },

    #[error("Failed to restore owner of {path}: {message}")]
    Ownership { path: PathBuf, message: String },

    #[error("Failed to set times on {path}: {message}")]
    FileTime { path: PathBuf, message: String },

    #[error("Directory listing error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

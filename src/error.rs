/// Error types for image generation
///
/// Every failure the worker, the window or startup can hit, with messages
/// written to be shown to the user as-is.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for image creator operations
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors that can occur while validating, generating or presenting images
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The prompt was empty after trimming whitespace
    #[error("Please enter a prompt first")]
    EmptyPrompt,

    /// A run is already active; only one may exist at a time
    #[error("A generation run is already in progress")]
    Busy,

    #[error("Connection error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Image service responded with {0}")]
    Status(reqwest::StatusCode),

    /// Malformed response bytes, or the PNG encoder failed
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open folder {}: {source}", path.display())]
    Shell {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

//! Error types for redub.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedubError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// A required external engine has no command configured. Fails the whole
    /// request before any later stage consumes resources.
    #[error("{engine} engine is not configured")]
    EngineUnconfigured { engine: &'static str },

    /// An external engine call failed during a stage. Surfaced to the caller
    /// as a structured error; never retried at this layer.
    #[error("{engine} engine failed: {message}")]
    Engine {
        engine: &'static str,
        message: String,
    },

    // Audio errors
    #[error("Failed to read audio: {message}")]
    AudioRead { message: String },

    #[error("Failed to write audio: {message}")]
    AudioWrite { message: String },

    #[error("Invalid audio buffer: {message}")]
    AudioBuffer { message: String },

    #[error("Sample rate mismatch: expected {expected} Hz, got {actual} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, RedubError>;

/// Structured error payload returned by the request surface.
///
/// Callers embedding the pipeline (or reading stderr from the CLI) get a
/// machine-readable kind/engine/message triple instead of a bare string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorPayload {
    /// Coarse error class: "configuration", "engine", "audio", or "internal".
    pub kind: String,
    /// Engine name for engine-related errors, `None` otherwise.
    pub engine: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl From<&RedubError> for ErrorPayload {
    fn from(error: &RedubError) -> Self {
        let (kind, engine) = match error {
            RedubError::ConfigFileNotFound { .. }
            | RedubError::ConfigParse { .. }
            | RedubError::Config(_) => ("configuration", None),
            RedubError::EngineUnconfigured { engine } => ("configuration", Some(*engine)),
            RedubError::Engine { engine, .. } => ("engine", Some(*engine)),
            RedubError::AudioRead { .. }
            | RedubError::AudioWrite { .. }
            | RedubError::AudioBuffer { .. }
            | RedubError::SampleRateMismatch { .. } => ("audio", None),
            RedubError::Io(_) | RedubError::Other(_) => ("internal", None),
        };
        Self {
            kind: kind.to_string(),
            engine: engine.map(str::to_string),
            message: error.to_string(),
        }
    }
}

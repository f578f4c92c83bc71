//! redub - offline audio dubbing
//!
//! Takes a recording with mixed speech and background sound, translates the
//! speech per speaker, and mixes the synthesized dub back over the original
//! background.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod audio;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod diagnostics;
pub mod engines;
pub mod error;
pub mod pipeline;
pub mod timeline;

// Core data model
pub use audio::AudioBuffer;
pub use timeline::{Segment, SegmentKind, Timeline};

// Engine seams (source → stages → sink)
pub use engines::{
    Diarizer, EngineSet, Separator, SpeechClassifier, Synthesizer, Transcriber, Translator,
};

// Pipeline
pub use pipeline::{DubRequest, DubbingPipeline};

// Request surface
pub use app::{DubService, LocalDubService};

// Error handling
pub use error::{ErrorPayload, RedubError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }
}

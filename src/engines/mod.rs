//! External engine interfaces.
//!
//! Every acoustic or language model the pipeline depends on sits behind one
//! of the traits here: separation, diarization, classification,
//! transcription, translation, synthesis. The pipeline only ever sees these
//! traits, handed in as shared read-only handles, so stages stay testable
//! with the mocks in [`mock`] and deployable with the subprocess adapters in
//! [`command`].

pub mod classify;
pub mod command;
pub mod mock;

use crate::audio::AudioBuffer;
use crate::config::Config;
use crate::error::{RedubError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use classify::{HeuristicClassifier, SpeechClassifier};

/// One speaker turn from the diarization engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiarizedTurn {
    /// Turn start in seconds, relative to the recording.
    pub start: f64,
    /// Turn end in seconds.
    pub end: f64,
    /// Opaque speaker identifier, stable across the same voice's turns.
    pub speaker: String,
}

/// One time-stamped fragment from the transcription engine.
///
/// Fragments cover the whole recording and are not aligned to speaker turns;
/// the aligner maps them onto segments by temporal containment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Splits a recording into a foreground-voice stem and a residual background
/// stem.
pub trait Separator: Send + Sync {
    /// Returns `(vocals, background)`.
    fn separate(&self, recording: &AudioBuffer) -> Result<(AudioBuffer, AudioBuffer)>;
}

/// Determines which speaker is active during which interval of the vocal
/// stem.
pub trait Diarizer: Send + Sync {
    fn diarize(&self, vocals: &AudioBuffer) -> Result<Vec<DiarizedTurn>>;
}

/// Produces time-stamped transcript fragments covering the vocal stem.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, vocals: &AudioBuffer) -> Result<Vec<TranscriptFragment>>;
}

/// Translates one piece of text into the target language.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str, target_language: &str) -> Result<String>;
}

/// Synthesizes speech for one piece of text in the target language.
pub trait Synthesizer: Send + Sync {
    fn synthesize(&self, text: &str, target_language: &str) -> Result<AudioBuffer>;
}

/// The full set of engine handles one pipeline run needs.
///
/// Handles are process-wide, loaded once, and shared read-only across
/// concurrent requests; no stage mutates them. The translator is optional
/// here so the pipeline can fail fast with a configuration error instead of
/// partway through a run.
#[derive(Clone)]
pub struct EngineSet {
    pub separator: Arc<dyn Separator>,
    pub diarizer: Arc<dyn Diarizer>,
    pub classifier: Arc<dyn SpeechClassifier>,
    pub transcriber: Arc<dyn Transcriber>,
    pub translator: Option<Arc<dyn Translator>>,
    pub synthesizer: Arc<dyn Synthesizer>,
}

impl EngineSet {
    /// Build the engine set from configuration, using subprocess adapters.
    ///
    /// Separation, diarization, transcription, and synthesis commands are
    /// required. A missing classification command selects the heuristic
    /// classifier. A missing translation command is allowed here and
    /// rejected when a dub is actually requested.
    pub fn from_config(config: &Config) -> Result<Self> {
        let engines = &config.engines;
        let require = |name: &'static str, cmd: &Option<Vec<String>>| -> Result<Vec<String>> {
            cmd.clone()
                .filter(|argv| !argv.is_empty())
                .ok_or(RedubError::EngineUnconfigured { engine: name })
        };

        let classifier: Arc<dyn SpeechClassifier> = match &engines.classification {
            Some(argv) if !argv.is_empty() => Arc::new(command::CommandClassifier::new(
                argv.clone(),
                config.scratch_root(),
            )),
            _ => Arc::new(HeuristicClassifier::default()),
        };

        let translator: Option<Arc<dyn Translator>> = engines
            .translation
            .as_ref()
            .filter(|argv| !argv.is_empty())
            .map(|argv| {
                Arc::new(command::CommandTranslator::new(argv.clone())) as Arc<dyn Translator>
            });

        Ok(Self {
            separator: Arc::new(command::CommandSeparator::new(
                require("separation", &engines.separation)?,
                config.scratch_root(),
            )),
            diarizer: Arc::new(command::CommandDiarizer::new(
                require("diarization", &engines.diarization)?,
                config.scratch_root(),
            )),
            classifier,
            transcriber: Arc::new(command::CommandTranscriber::new(
                require("transcription", &engines.transcription)?,
                config.scratch_root(),
            )),
            translator,
            synthesizer: Arc::new(command::CommandSynthesizer::new(
                require("synthesis", &engines.synthesis)?,
                config.scratch_root(),
            )),
        })
    }
}

//! Application entry points: the CLI dub command and the embeddable
//! request-surface service.

use crate::audio::{read_wav, write_wav};
use crate::config::Config;
use crate::engines::EngineSet;
use crate::error::{ErrorPayload, RedubError, Result};
use crate::pipeline::{DubRequest, DubbingPipeline};
use std::path::Path;
use std::time::Instant;

/// Request surface: dub one recording into a target language.
///
/// Returns the final mixed buffer, or a structured error payload for error
/// responses. Engine calls inside are blocking; concurrent services share
/// only the read-only engine handles.
#[async_trait::async_trait]
pub trait DubService: Send + Sync {
    async fn dub(
        &self,
        request: DubRequest,
    ) -> std::result::Result<crate::audio::AudioBuffer, ErrorPayload>;
}

/// In-process service wrapping a [`DubbingPipeline`].
pub struct LocalDubService {
    pipeline: DubbingPipeline,
}

impl LocalDubService {
    pub fn new(pipeline: DubbingPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait::async_trait]
impl DubService for LocalDubService {
    async fn dub(
        &self,
        request: DubRequest,
    ) -> std::result::Result<crate::audio::AudioBuffer, ErrorPayload> {
        self.pipeline
            .run(&request)
            .map_err(|e| ErrorPayload::from(&e))
    }
}

/// Run the dub command: read WAV → pipeline → write WAV.
///
/// On failure the structured error payload is printed to stderr as JSON so
/// scripted callers get the same error shape as embedded ones.
pub async fn run_dub_command(
    config: Config,
    input: &Path,
    output: &Path,
    language: Option<String>,
    quiet: bool,
) -> Result<()> {
    let target_language =
        language.unwrap_or_else(|| config.dubbing.target_language.clone());

    let engines = EngineSet::from_config(&config)?;
    let pipeline = DubbingPipeline::new(engines, config.scratch_root())
        .with_background_gain(config.dubbing.background_gain);

    if !quiet {
        eprintln!("Reading {}...", input.display());
    }
    let recording = read_wav(input)?;

    if !quiet {
        eprintln!(
            "Dubbing {:.1}s of audio into '{}'...",
            recording.duration_secs(),
            target_language
        );
    }

    let started = Instant::now();
    let request = DubRequest {
        recording,
        target_language,
    };
    let mixed = match pipeline.run(&request) {
        Ok(mixed) => mixed,
        Err(e) => {
            report_failure(&e);
            return Err(e);
        }
    };

    write_wav(output, &mixed)?;

    if !quiet {
        eprintln!(
            "Wrote {} ({:.1}s of audio) in {:.1}s",
            output.display(),
            mixed.duration_secs(),
            started.elapsed().as_secs_f64()
        );
    }
    Ok(())
}

fn report_failure(error: &RedubError) {
    let payload = ErrorPayload::from(error);
    match serde_json::to_string(&payload) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioBuffer;
    use crate::engines::mock::{
        MockDiarizer, MockSeparator, MockSynthesizer, MockTranscriber, MockTranslator,
    };
    use crate::engines::{DiarizedTurn, HeuristicClassifier, TranscriptFragment};
    use std::sync::Arc;

    fn service_with_mocks() -> LocalDubService {
        let engines = EngineSet {
            separator: Arc::new(MockSeparator::new()),
            diarizer: Arc::new(MockDiarizer::with_turns(vec![DiarizedTurn {
                start: 0.0,
                end: 1.0,
                speaker: "A".to_string(),
            }])),
            classifier: Arc::new(HeuristicClassifier::default()),
            transcriber: Arc::new(MockTranscriber::with_fragments(vec![TranscriptFragment {
                start: 0.0,
                end: 1.0,
                text: "hello".to_string(),
            }])),
            translator: Some(Arc::new(MockTranslator::new())),
            synthesizer: Arc::new(MockSynthesizer::new()),
        };
        LocalDubService::new(DubbingPipeline::new(engines, std::env::temp_dir()))
    }

    #[tokio::test]
    async fn service_returns_audio_on_success() {
        let service = service_with_mocks();
        let result = service
            .dub(DubRequest {
                recording: AudioBuffer::mono(vec![0.1; 16000], 16000),
                target_language: "hi".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn service_returns_payload_on_failure() {
        let engines = EngineSet {
            separator: Arc::new(MockSeparator::new()),
            diarizer: Arc::new(MockDiarizer::with_turns(Vec::new())),
            classifier: Arc::new(HeuristicClassifier::default()),
            transcriber: Arc::new(MockTranscriber::with_fragments(Vec::new())),
            translator: None,
            synthesizer: Arc::new(MockSynthesizer::new()),
        };
        let service = LocalDubService::new(DubbingPipeline::new(engines, std::env::temp_dir()));

        let result = service
            .dub(DubRequest {
                recording: AudioBuffer::mono(vec![0.1; 16000], 16000),
                target_language: "hi".to_string(),
            })
            .await;

        let payload = result.unwrap_err();
        assert_eq!(payload.kind, "configuration");
        assert_eq!(payload.engine.as_deref(), Some("translation"));
    }
}

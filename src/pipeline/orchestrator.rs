//! Sequential stage driver for one dubbing request.
//!
//! A run is one linear pass: separate, diarize+classify into a timeline,
//! align the transcript, translate, redistribute synthesized audio,
//! composite, mix. Stage errors abort the remaining stages; artifacts
//! registered up to that point are still released by the caller of
//! [`DubbingPipeline::run`] through the registry the run owns internally.

use crate::audio::{AudioBuffer, write_wav};
use crate::cleanup::ArtifactRegistry;
use crate::defaults;
use crate::engines::EngineSet;
use crate::error::{RedubError, Result};
use crate::pipeline::{
    composite_vocal_track, mix_with_gain, redistribute_speaker_audio, translate_segments,
};
use crate::timeline::{align_transcript, build_timeline};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(0);

/// One dubbing request: a recording and the language to dub it into.
#[derive(Debug, Clone)]
pub struct DubRequest {
    pub recording: AudioBuffer,
    pub target_language: String,
}

/// The dubbing pipeline, holding shared read-only engine handles.
///
/// One instance serves many requests; per-request state (timeline, buffers,
/// scratch directory) lives inside each [`run`](Self::run) call and is never
/// shared across requests.
#[derive(Clone)]
pub struct DubbingPipeline {
    engines: EngineSet,
    scratch_root: PathBuf,
    background_gain: f32,
}

impl DubbingPipeline {
    pub fn new(engines: EngineSet, scratch_root: PathBuf) -> Self {
        Self {
            engines,
            scratch_root,
            background_gain: defaults::BACKGROUND_GAIN,
        }
    }

    pub fn with_background_gain(mut self, gain: f32) -> Self {
        self.background_gain = gain;
        self
    }

    /// Run all stages for one request and return the final mixed buffer.
    ///
    /// Temporary artifacts registered during the run are released before
    /// this returns, on the success and the failure path.
    pub fn run(&self, request: &DubRequest) -> Result<AudioBuffer> {
        let registry = ArtifactRegistry::new();
        let result = self.run_stages(request, &registry);
        let released = registry.release_all();
        log::debug!("released {} scratch artifact(s)", released);
        result
    }

    fn run_stages(
        &self,
        request: &DubRequest,
        registry: &ArtifactRegistry,
    ) -> Result<AudioBuffer> {
        // Fail fast: without a translator no downstream stage can produce
        // anything meaningful, so reject before any engine runs
        let translator = self
            .engines
            .translator
            .as_deref()
            .ok_or(RedubError::EngineUnconfigured {
                engine: "translation",
            })?;

        let scratch = self.create_scratch_dir()?;
        registry.register(&scratch);

        let input_copy = scratch.join("input.wav");
        write_wav(&input_copy, &request.recording)?;
        registry.register(&input_copy);

        log::info!(
            "dubbing {:.1}s recording into '{}'",
            request.recording.duration_secs(),
            request.target_language
        );

        let (vocals, background) = self.engines.separator.separate(&request.recording)?;
        for (name, stem) in [("vocals.wav", &vocals), ("background.wav", &background)] {
            let path = scratch.join(name);
            write_wav(&path, stem)?;
            registry.register(path);
        }

        let turns = self.engines.diarizer.diarize(&vocals)?;
        log::debug!("diarization produced {} turn(s)", turns.len());

        let mut timeline =
            build_timeline(vocals, background, &turns, &*self.engines.classifier);

        let fragments = self.engines.transcriber.transcribe(&timeline.vocals)?;
        align_transcript(&mut timeline, &fragments);

        translate_segments(&mut timeline, translator, &request.target_language)?;

        let syntheses = redistribute_speaker_audio(
            &mut timeline,
            &*self.engines.synthesizer,
            &request.target_language,
        )?;
        for synthesis in &syntheses {
            let path = scratch.join(format!("speaker-{}.wav", synthesis.speaker));
            write_wav(&path, &synthesis.audio)?;
            registry.register(path);
        }

        let vocal_track = composite_vocal_track(&timeline)?;
        let track_path = scratch.join("vocal-track.wav");
        write_wav(&track_path, &vocal_track)?;
        registry.register(track_path);

        Ok(mix_with_gain(
            &vocal_track,
            &timeline.background,
            self.background_gain,
        ))
    }

    fn create_scratch_dir(&self) -> Result<PathBuf> {
        let dir = self.scratch_root.join(format!(
            "{}-{}-{}",
            defaults::SCRATCH_PREFIX,
            std::process::id(),
            REQUEST_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::mock::{
        MockDiarizer, MockSeparator, MockSynthesizer, MockTranscriber, MockTranslator,
    };
    use crate::engines::{DiarizedTurn, HeuristicClassifier, TranscriptFragment};
    use std::sync::Arc;

    fn two_speaker_engines() -> EngineSet {
        EngineSet {
            separator: Arc::new(MockSeparator::new()),
            diarizer: Arc::new(MockDiarizer::with_turns(vec![
                DiarizedTurn {
                    start: 0.0,
                    end: 4.0,
                    speaker: "A".to_string(),
                },
                DiarizedTurn {
                    start: 5.0,
                    end: 10.0,
                    speaker: "B".to_string(),
                },
            ])),
            classifier: Arc::new(HeuristicClassifier::default()),
            transcriber: Arc::new(MockTranscriber::with_fragments(vec![
                TranscriptFragment {
                    start: 0.0,
                    end: 4.0,
                    text: "hello".to_string(),
                },
                TranscriptFragment {
                    start: 5.0,
                    end: 10.0,
                    text: "world".to_string(),
                },
            ])),
            translator: Some(Arc::new(MockTranslator::new())),
            synthesizer: Arc::new(MockSynthesizer::new()),
        }
    }

    fn ten_second_recording() -> AudioBuffer {
        AudioBuffer::mono(vec![0.1; 160_000], 16000)
    }

    #[test]
    fn run_produces_mixed_buffer_and_cleans_scratch() {
        let scratch_root = tempfile::tempdir().unwrap();
        let pipeline =
            DubbingPipeline::new(two_speaker_engines(), scratch_root.path().to_path_buf());
        let request = DubRequest {
            recording: ten_second_recording(),
            target_language: "hi".to_string(),
        };

        let mixed = pipeline.run(&request).unwrap();

        // Background stem is as long as the recording, so the mix is at
        // least that long
        assert!(mixed.sample_count() >= 160_000);
        // Scratch directory fully released
        assert_eq!(fs::read_dir(scratch_root.path()).unwrap().count(), 0);
    }

    #[test]
    fn unconfigured_translation_fails_before_any_engine_runs() {
        let scratch_root = tempfile::tempdir().unwrap();
        let separator = Arc::new(MockSeparator::new());
        let synthesizer = Arc::new(MockSynthesizer::new());
        let mut engines = two_speaker_engines();
        engines.separator = separator.clone();
        engines.synthesizer = synthesizer.clone();
        engines.translator = None;

        let pipeline = DubbingPipeline::new(engines, scratch_root.path().to_path_buf());
        let result = pipeline.run(&DubRequest {
            recording: ten_second_recording(),
            target_language: "hi".to_string(),
        });

        assert!(matches!(
            result,
            Err(RedubError::EngineUnconfigured {
                engine: "translation"
            })
        ));
        assert_eq!(separator.calls(), 0);
        assert_eq!(synthesizer.calls(), 0);
        // Nothing was written, nothing lingers
        assert_eq!(fs::read_dir(scratch_root.path()).unwrap().count(), 0);
    }

    #[test]
    fn stage_failure_still_releases_registered_artifacts() {
        let scratch_root = tempfile::tempdir().unwrap();
        let mut engines = two_speaker_engines();
        engines.transcriber = Arc::new(MockTranscriber::failing());

        let pipeline = DubbingPipeline::new(engines, scratch_root.path().to_path_buf());
        let result = pipeline.run(&DubRequest {
            recording: ten_second_recording(),
            target_language: "hi".to_string(),
        });

        assert!(matches!(
            result,
            Err(RedubError::Engine {
                engine: "transcription",
                ..
            })
        ));
        // Input copy and stems were registered before the failure and are
        // gone now
        assert_eq!(fs::read_dir(scratch_root.path()).unwrap().count(), 0);
    }

    #[test]
    fn translation_failure_skips_synthesis() {
        let scratch_root = tempfile::tempdir().unwrap();
        let synthesizer = Arc::new(MockSynthesizer::new());
        let mut engines = two_speaker_engines();
        engines.translator = Some(Arc::new(MockTranslator::failing()));
        engines.synthesizer = synthesizer.clone();

        let pipeline = DubbingPipeline::new(engines, scratch_root.path().to_path_buf());
        let result = pipeline.run(&DubRequest {
            recording: ten_second_recording(),
            target_language: "hi".to_string(),
        });

        assert!(result.is_err());
        assert_eq!(synthesizer.calls(), 0);
    }
}

//! In-memory mock engines for tests.
//!
//! Each mock returns canned output, can be configured to fail, and counts
//! its calls so tests can assert which stages actually ran.

use crate::audio::AudioBuffer;
use crate::engines::{
    DiarizedTurn, Diarizer, Separator, Synthesizer, Transcriber, TranscriptFragment, Translator,
};
use crate::error::{RedubError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

fn engine_failure(engine: &'static str) -> RedubError {
    RedubError::Engine {
        engine,
        message: "mock failure".to_string(),
    }
}

/// Mock separator that splits the recording into two attenuated copies.
#[derive(Debug, Default)]
pub struct MockSeparator {
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockSeparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Separator for MockSeparator {
    fn separate(&self, recording: &AudioBuffer) -> Result<(AudioBuffer, AudioBuffer)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(engine_failure("separation"));
        }
        let scale = |gain: f32| -> AudioBuffer {
            AudioBuffer::new(
                recording
                    .channels()
                    .iter()
                    .map(|c| c.iter().map(|&s| s * gain).collect())
                    .collect(),
                recording.sample_rate(),
            )
            .unwrap_or_else(|_| AudioBuffer::mono(Vec::new(), recording.sample_rate()))
        };
        Ok((scale(0.7), scale(0.3)))
    }
}

/// Mock diarizer returning a fixed list of turns.
#[derive(Debug, Default)]
pub struct MockDiarizer {
    turns: Vec<DiarizedTurn>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockDiarizer {
    pub fn with_turns(turns: Vec<DiarizedTurn>) -> Self {
        Self {
            turns,
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Diarizer for MockDiarizer {
    fn diarize(&self, _vocals: &AudioBuffer) -> Result<Vec<DiarizedTurn>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(engine_failure("diarization"));
        }
        Ok(self.turns.clone())
    }
}

/// Mock transcriber returning fixed fragments.
#[derive(Debug, Default)]
pub struct MockTranscriber {
    fragments: Vec<TranscriptFragment>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockTranscriber {
    pub fn with_fragments(fragments: Vec<TranscriptFragment>) -> Self {
        Self {
            fragments,
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, _vocals: &AudioBuffer) -> Result<Vec<TranscriptFragment>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(engine_failure("transcription"));
        }
        Ok(self.fragments.clone())
    }
}

/// Mock translator that wraps input in a visible marker, e.g. `[hi] hello`.
#[derive(Debug, Default)]
pub struct MockTranslator {
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Translator for MockTranslator {
    fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(engine_failure("translation"));
        }
        Ok(format!("[{}] {}", target_language, text))
    }
}

/// Mock synthesizer producing a constant-valued buffer whose length scales
/// with the input text, at a configurable sample rate.
#[derive(Debug)]
pub struct MockSynthesizer {
    sample_rate: u32,
    samples_per_char: usize,
    should_fail: bool,
    calls: AtomicUsize,
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            samples_per_char: 100,
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Produce zero-length audio regardless of input.
    pub fn silent(mut self) -> Self {
        self.samples_per_char = 0;
        self
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Synthesizer for MockSynthesizer {
    fn synthesize(&self, text: &str, _target_language: &str) -> Result<AudioBuffer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(engine_failure("synthesis"));
        }
        let sample_count = text.chars().count() * self.samples_per_char;
        Ok(AudioBuffer::mono(vec![0.1; sample_count], self.sample_rate))
    }
}

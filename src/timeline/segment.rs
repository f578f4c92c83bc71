//! Segment and timeline types.

use crate::audio::AudioBuffer;

/// Label a diarized turn carries through classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Spoken dialogue; the only kind that survives into downstream stages.
    Speech,
    /// Sung passages, dropped by the timeline builder.
    Singing,
}

/// A time-bounded, speaker-tagged unit of the timeline.
///
/// Later stages fill in `text`, `translated_text`, and `audio` in place; the
/// bounds and speaker never change after the builder runs.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Start in seconds, relative to the source recording.
    pub start: f64,
    /// End in seconds.
    pub end: f64,
    /// Opaque speaker identifier from diarization.
    pub speaker: String,
    pub kind: SegmentKind,
    /// Raw transcript; empty when no fragment fell fully inside the bounds.
    pub text: String,
    /// Target-language text, absent until the translation stage runs.
    pub translated_text: Option<String>,
    /// This segment's slice of its speaker's synthesized audio, absent until
    /// redistribution runs.
    pub audio: Option<AudioBuffer>,
}

impl Segment {
    pub fn new(start: f64, end: f64, speaker: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            start,
            end,
            speaker: speaker.into(),
            kind,
            text: String::new(),
            translated_text: None,
            audio: None,
        }
    }

    /// Duration in seconds in the original recording.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the fragment interval `[start, end]` lies fully inside this
    /// segment's bounds.
    pub fn contains(&self, start: f64, end: f64) -> bool {
        start >= self.start && end <= self.end
    }
}

/// Ordered sequence of segments plus the separated stems they were cut from.
///
/// Owned exclusively by one pipeline run; never shared across requests.
#[derive(Debug, Clone)]
pub struct Timeline {
    pub segments: Vec<Segment>,
    /// Foreground-voice stem of the source recording.
    pub vocals: AudioBuffer,
    /// Residual background stem, mixed back under the dub at the end.
    pub background: AudioBuffer,
}

impl Timeline {
    /// Distinct speakers in first-appearance order.
    pub fn speakers(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for segment in &self.segments {
            if !seen.contains(&segment.speaker) {
                seen.push(segment.speaker.clone());
            }
        }
        seen
    }

    /// Whether segments are ordered by start time.
    pub fn is_sorted_by_start(&self) -> bool {
        self.segments
            .windows(2)
            .all(|w| w[0].start <= w[1].start)
    }
}

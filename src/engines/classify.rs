//! Speech-vs-singing classification strategy.
//!
//! The timeline builder only keeps speech turns, so every diarized turn gets
//! a label. Two implementations exist, chosen at engine construction time: a
//! model-backed subprocess adapter ([`crate::engines::command::CommandClassifier`])
//! and the deterministic heuristic here, which is also the fallback when the
//! model path fails. The heuristic is total: it returns a label for any
//! input, including degenerate zero or negative duration turns.

use crate::audio::AudioBuffer;
use crate::defaults;
use crate::engines::DiarizedTurn;
use crate::timeline::SegmentKind;

/// Labels a diarized turn as speech or singing.
///
/// Implementations must be total — the pipeline has no error path for
/// classification.
pub trait SpeechClassifier: Send + Sync {
    fn classify(&self, vocals: &AudioBuffer, turn: &DiarizedTurn) -> SegmentKind;
}

/// Duration-and-energy heuristic classifier.
///
/// A turn is singing when it is both unusually long for a speaker turn and
/// holds sustained RMS energy; everything else, including turns that fall
/// outside the vocal buffer entirely, is speech.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicClassifier {
    /// Minimum turn duration (seconds) to consider singing.
    pub min_singing_secs: f64,
    /// Minimum RMS level over the turn to consider singing.
    pub min_singing_rms: f32,
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self {
            min_singing_secs: defaults::SINGING_MIN_SECS,
            min_singing_rms: defaults::SINGING_RMS_THRESHOLD,
        }
    }
}

impl SpeechClassifier for HeuristicClassifier {
    fn classify(&self, vocals: &AudioBuffer, turn: &DiarizedTurn) -> SegmentKind {
        let duration = turn.end - turn.start;
        if !duration.is_finite() || duration < self.min_singing_secs {
            return SegmentKind::Speech;
        }

        let window = vocals.slice_secs(turn.start, turn.end);
        if window.is_empty() {
            return SegmentKind::Speech;
        }

        if window.rms() >= self.min_singing_rms {
            SegmentKind::Singing
        } else {
            SegmentKind::Speech
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(start: f64, end: f64) -> DiarizedTurn {
        DiarizedTurn {
            start,
            end,
            speaker: "SPEAKER_00".to_string(),
        }
    }

    fn loud_buffer(secs: usize) -> AudioBuffer {
        AudioBuffer::mono(vec![0.5; secs * 16000], 16000)
    }

    #[test]
    fn short_turns_are_speech() {
        let classifier = HeuristicClassifier::default();
        let vocals = loud_buffer(30);
        assert_eq!(
            classifier.classify(&vocals, &turn(0.0, 4.0)),
            SegmentKind::Speech
        );
    }

    #[test]
    fn long_loud_turns_are_singing() {
        let classifier = HeuristicClassifier::default();
        let vocals = loud_buffer(30);
        assert_eq!(
            classifier.classify(&vocals, &turn(0.0, 20.0)),
            SegmentKind::Singing
        );
    }

    #[test]
    fn long_quiet_turns_are_speech() {
        let classifier = HeuristicClassifier::default();
        let vocals = AudioBuffer::mono(vec![0.01; 30 * 16000], 16000);
        assert_eq!(
            classifier.classify(&vocals, &turn(0.0, 20.0)),
            SegmentKind::Speech
        );
    }

    #[test]
    fn degenerate_turns_get_a_label() {
        let classifier = HeuristicClassifier::default();
        let vocals = loud_buffer(1);
        // Zero and negative durations must still classify (totality)
        assert_eq!(
            classifier.classify(&vocals, &turn(2.0, 2.0)),
            SegmentKind::Speech
        );
        assert_eq!(
            classifier.classify(&vocals, &turn(5.0, 1.0)),
            SegmentKind::Speech
        );
    }

    #[test]
    fn turn_outside_buffer_is_speech() {
        let classifier = HeuristicClassifier::default();
        let vocals = loud_buffer(1);
        assert_eq!(
            classifier.classify(&vocals, &turn(100.0, 120.0)),
            SegmentKind::Speech
        );
    }

    #[test]
    fn non_finite_duration_is_speech() {
        let classifier = HeuristicClassifier::default();
        let vocals = loud_buffer(1);
        assert_eq!(
            classifier.classify(&vocals, &turn(0.0, f64::NAN)),
            SegmentKind::Speech
        );
    }
}

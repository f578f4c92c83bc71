//! Timeline builder: merges diarization output with speech/singing
//! classification into an ordered, speech-only timeline.

use crate::audio::AudioBuffer;
use crate::engines::{DiarizedTurn, SpeechClassifier};
use crate::timeline::segment::{Segment, SegmentKind, Timeline};

/// Build a timeline of speech segments from diarized turns.
///
/// Pure transform: turns are classified in diarization order and only
/// speech-labeled turns become segments. Degenerate zero or negative
/// duration turns are passed through unfiltered — filtering them is an
/// upstream concern; the classifier is total and still scores them.
pub fn build_timeline(
    vocals: AudioBuffer,
    background: AudioBuffer,
    turns: &[DiarizedTurn],
    classifier: &dyn SpeechClassifier,
) -> Timeline {
    let mut segments = Vec::with_capacity(turns.len());
    let mut singing = 0usize;

    for turn in turns {
        match classifier.classify(&vocals, turn) {
            SegmentKind::Speech => {
                segments.push(Segment::new(
                    turn.start,
                    turn.end,
                    turn.speaker.clone(),
                    SegmentKind::Speech,
                ));
            }
            SegmentKind::Singing => singing += 1,
        }
    }

    if singing > 0 {
        log::debug!(
            "dropped {} singing turn(s), kept {} speech segment(s)",
            singing,
            segments.len()
        );
    }

    Timeline {
        segments,
        vocals,
        background,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Classifier that labels by a fixed list, one entry per turn.
    struct ScriptedClassifier(Vec<SegmentKind>);

    impl SpeechClassifier for ScriptedClassifier {
        fn classify(&self, _vocals: &AudioBuffer, turn: &DiarizedTurn) -> SegmentKind {
            // Index encoded in the speaker name for test purposes
            let index: usize = turn.speaker.split('_').next_back().unwrap().parse().unwrap();
            self.0[index]
        }
    }

    fn turn(index: usize, start: f64, end: f64) -> DiarizedTurn {
        DiarizedTurn {
            start,
            end,
            speaker: format!("SPEAKER_{}", index),
        }
    }

    fn empty_audio() -> AudioBuffer {
        AudioBuffer::mono(Vec::new(), 16000)
    }

    #[test]
    fn keeps_only_speech_turns_in_order() {
        let turns = vec![turn(0, 0.0, 4.0), turn(1, 5.0, 9.0), turn(2, 10.0, 14.0)];
        let classifier = ScriptedClassifier(vec![
            SegmentKind::Speech,
            SegmentKind::Singing,
            SegmentKind::Speech,
        ]);

        let timeline = build_timeline(empty_audio(), empty_audio(), &turns, &classifier);

        assert_eq!(timeline.segments.len(), 2);
        assert_eq!(timeline.segments[0].speaker, "SPEAKER_0");
        assert_eq!(timeline.segments[1].speaker, "SPEAKER_2");
        assert!(timeline.is_sorted_by_start());
    }

    #[test]
    fn empty_diarization_yields_empty_timeline() {
        let classifier = ScriptedClassifier(Vec::new());
        let timeline = build_timeline(empty_audio(), empty_audio(), &[], &classifier);
        assert!(timeline.segments.is_empty());
    }

    #[test]
    fn degenerate_turns_pass_through() {
        // Zero-duration and inverted turns are not filtered here
        let turns = vec![turn(0, 3.0, 3.0), turn(1, 5.0, 2.0)];
        let classifier = ScriptedClassifier(vec![SegmentKind::Speech, SegmentKind::Speech]);

        let timeline = build_timeline(empty_audio(), empty_audio(), &turns, &classifier);

        assert_eq!(timeline.segments.len(), 2);
        assert_eq!(timeline.segments[0].duration(), 0.0);
        assert!(timeline.segments[1].duration() < 0.0);
    }

    #[test]
    fn segments_start_with_no_text_or_audio() {
        let turns = vec![turn(0, 0.0, 1.0)];
        let classifier = ScriptedClassifier(vec![SegmentKind::Speech]);

        let timeline = build_timeline(empty_audio(), empty_audio(), &turns, &classifier);

        let segment = &timeline.segments[0];
        assert!(segment.text.is_empty());
        assert!(segment.translated_text.is_none());
        assert!(segment.audio.is_none());
    }
}

//! Speaker audio redistributor: one synthesis call per speaker, sliced
//! proportionally back onto that speaker's original segment boundaries.
//!
//! For each speaker the translated segment texts are concatenated in segment
//! order and synthesized as a single buffer. That buffer is then partitioned
//! across the speaker's segments by each segment's position inside the
//! speaker's original time span (first segment start to last segment end).
//!
//! This assumes the synthesized speech runs at a uniform rate proportional
//! to the original segments' relative durations. It is a known
//! simplification, not forced alignment: the partition is gapless,
//! non-overlapping, order-preserving, and covers the full buffer, but a
//! slice's content is not guaranteed to be exactly the translated sentence
//! for that segment. Keep it this way; substituting true alignment changes
//! observable output.

use crate::audio::AudioBuffer;
use crate::defaults;
use crate::engines::Synthesizer;
use crate::error::Result;
use crate::timeline::Timeline;

/// One speaker's full synthesized buffer, before slicing. The orchestrator
/// persists these as scratch artifacts.
#[derive(Debug, Clone)]
pub struct SpeakerSynthesis {
    pub speaker: String,
    pub audio: AudioBuffer,
}

/// Synthesize per speaker and attach a proportional slice to every segment.
///
/// After this stage every segment has `audio` populated, possibly
/// zero-length when the engine produced no samples (an alignment anomaly,
/// not an error).
pub fn redistribute_speaker_audio(
    timeline: &mut Timeline,
    synthesizer: &dyn Synthesizer,
    target_language: &str,
) -> Result<Vec<SpeakerSynthesis>> {
    let mut syntheses = Vec::new();

    for speaker in timeline.speakers() {
        let indices: Vec<usize> = timeline
            .segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.speaker == speaker)
            .map(|(i, _)| i)
            .collect();

        let text = indices
            .iter()
            .filter_map(|&i| timeline.segments[i].translated_text.as_deref())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(defaults::SYNTHESIS_TEXT_SEPARATOR);

        let audio = synthesizer.synthesize(&text, target_language)?;
        if audio.is_empty() {
            log::warn!(
                "synthesis produced no audio for speaker {} ({} segment(s))",
                speaker,
                indices.len()
            );
        }

        slice_onto_segments(timeline, &indices, &audio);
        syntheses.push(SpeakerSynthesis { speaker, audio });
    }

    Ok(syntheses)
}

/// Partition `audio` across the segments at `indices` (in segment order).
///
/// Slice boundaries sit at each segment's end position, normalized to the
/// speaker's original span and scaled to the buffer length; the final
/// boundary is pinned to the buffer end so rounding never drops trailing
/// samples. Boundaries are kept monotonic, which makes the partition
/// gapless and non-overlapping even for degenerate segment geometry.
fn slice_onto_segments(timeline: &mut Timeline, indices: &[usize], audio: &AudioBuffer) {
    let Some((&first, &last)) = indices.first().zip(indices.last()) else {
        return;
    };

    let span_start = timeline.segments[first].start;
    let span = timeline.segments[last].end - span_start;
    let total = audio.sample_count();

    if !(span > 0.0) {
        // Degenerate span: hand the whole buffer to the first segment so no
        // audio is lost
        log::warn!(
            "speaker {} has non-positive time span {:.3}s",
            timeline.segments[first].speaker,
            span
        );
        for (position, &index) in indices.iter().enumerate() {
            timeline.segments[index].audio = Some(if position == 0 {
                audio.clone()
            } else {
                audio.slice(total, total)
            });
        }
        return;
    }

    let mut boundary = 0usize;
    for (position, &index) in indices.iter().enumerate() {
        let begin = boundary;
        let end = if position + 1 == indices.len() {
            total
        } else {
            let relative = (timeline.segments[index].end - span_start) / span;
            ((relative * total as f64).round() as usize).clamp(begin, total)
        };
        timeline.segments[index].audio = Some(audio.slice(begin, end));
        boundary = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::mock::MockSynthesizer;
    use crate::timeline::{Segment, SegmentKind};

    fn timeline_with(segments: Vec<Segment>) -> Timeline {
        Timeline {
            segments,
            vocals: AudioBuffer::mono(Vec::new(), 16000),
            background: AudioBuffer::mono(Vec::new(), 16000),
        }
    }

    fn translated(start: f64, end: f64, speaker: &str, text: &str) -> Segment {
        let mut segment = Segment::new(start, end, speaker, SegmentKind::Speech);
        segment.text = text.to_string();
        segment.translated_text = Some(text.to_string());
        segment
    }

    /// Synthesizer returning a ramp so slices are distinguishable.
    struct RampSynthesizer {
        sample_count: usize,
    }

    impl Synthesizer for RampSynthesizer {
        fn synthesize(&self, _text: &str, _language: &str) -> Result<AudioBuffer> {
            let samples = (0..self.sample_count).map(|i| i as f32).collect();
            Ok(AudioBuffer::mono(samples, 16000))
        }
    }

    fn slice_lengths(timeline: &Timeline) -> Vec<usize> {
        timeline
            .segments
            .iter()
            .map(|s| s.audio.as_ref().unwrap().sample_count())
            .collect()
    }

    #[test]
    fn slices_partition_the_whole_buffer() {
        // Speaker span 0..10s, segments 0-4, 4-7, 7-10
        let mut timeline = timeline_with(vec![
            translated(0.0, 4.0, "A", "one"),
            translated(4.0, 7.0, "A", "two"),
            translated(7.0, 10.0, "A", "three"),
        ]);
        let synthesizer = RampSynthesizer { sample_count: 1000 };

        redistribute_speaker_audio(&mut timeline, &synthesizer, "hi").unwrap();

        let lengths = slice_lengths(&timeline);
        assert_eq!(lengths, vec![400, 300, 300]);
        assert_eq!(lengths.iter().sum::<usize>(), 1000);

        // Gapless and non-overlapping: slices continue the ramp exactly
        let first = timeline.segments[0].audio.as_ref().unwrap();
        let second = timeline.segments[1].audio.as_ref().unwrap();
        assert_eq!(first.channels()[0][399], 399.0);
        assert_eq!(second.channels()[0][0], 400.0);
    }

    #[test]
    fn gaps_between_segments_do_not_lose_audio() {
        // Segments 0-4 and 6-10: the 4-6s source gap still maps to a
        // gapless partition of the synthesized buffer
        let mut timeline = timeline_with(vec![
            translated(0.0, 4.0, "A", "one"),
            translated(6.0, 10.0, "A", "two"),
        ]);
        let synthesizer = RampSynthesizer { sample_count: 1000 };

        redistribute_speaker_audio(&mut timeline, &synthesizer, "hi").unwrap();

        let lengths = slice_lengths(&timeline);
        assert_eq!(lengths.iter().sum::<usize>(), 1000);
        assert_eq!(lengths, vec![400, 600]);
    }

    #[test]
    fn speakers_are_synthesized_independently() {
        let mut timeline = timeline_with(vec![
            translated(0.0, 4.0, "A", "hello"),
            translated(5.0, 10.0, "B", "world"),
        ]);
        let synthesizer = MockSynthesizer::new();

        let syntheses =
            redistribute_speaker_audio(&mut timeline, &synthesizer, "hi").unwrap();

        assert_eq!(synthesizer.calls(), 2);
        assert_eq!(syntheses.len(), 2);
        assert_eq!(syntheses[0].speaker, "A");
        assert_eq!(syntheses[1].speaker, "B");
        // Single-segment speakers get their whole buffer
        assert_eq!(
            timeline.segments[0].audio.as_ref().unwrap().sample_count(),
            syntheses[0].audio.sample_count()
        );
    }

    #[test]
    fn zero_length_synthesis_yields_empty_slices() {
        let mut timeline = timeline_with(vec![
            translated(0.0, 4.0, "A", "one"),
            translated(4.0, 8.0, "A", "two"),
        ]);
        let synthesizer = MockSynthesizer::new().silent();

        redistribute_speaker_audio(&mut timeline, &synthesizer, "hi").unwrap();

        for segment in &timeline.segments {
            assert!(segment.audio.as_ref().unwrap().is_empty());
        }
    }

    #[test]
    fn engine_failure_aborts_the_stage() {
        let mut timeline = timeline_with(vec![translated(0.0, 4.0, "A", "one")]);
        let synthesizer = MockSynthesizer::failing();

        assert!(redistribute_speaker_audio(&mut timeline, &synthesizer, "hi").is_err());
        assert!(timeline.segments[0].audio.is_none());
    }

    #[test]
    fn degenerate_span_keeps_all_audio() {
        let mut timeline = timeline_with(vec![
            translated(3.0, 3.0, "A", "one"),
            // Inverted ordering makes the span non-positive
            translated(2.0, 1.0, "A", "two"),
        ]);
        let synthesizer = RampSynthesizer { sample_count: 500 };

        redistribute_speaker_audio(&mut timeline, &synthesizer, "hi").unwrap();

        let lengths = slice_lengths(&timeline);
        assert_eq!(lengths.iter().sum::<usize>(), 500);
        assert_eq!(lengths[0], 500);
    }

    #[test]
    fn rounding_never_drops_trailing_samples() {
        // Awkward ratios: 3 segments over a 7-second span and 1001 samples
        let mut timeline = timeline_with(vec![
            translated(0.0, 2.3, "A", "a"),
            translated(2.3, 4.9, "A", "b"),
            translated(4.9, 7.0, "A", "c"),
        ]);
        let synthesizer = RampSynthesizer { sample_count: 1001 };

        redistribute_speaker_audio(&mut timeline, &synthesizer, "hi").unwrap();

        assert_eq!(slice_lengths(&timeline).iter().sum::<usize>(), 1001);
    }

    #[test]
    fn empty_translations_are_skipped_in_synthesis_text() {
        struct CapturingSynthesizer(std::sync::Mutex<String>);
        impl Synthesizer for CapturingSynthesizer {
            fn synthesize(&self, text: &str, _language: &str) -> Result<AudioBuffer> {
                *self.0.lock().unwrap() = text.to_string();
                Ok(AudioBuffer::mono(vec![0.0; 10], 16000))
            }
        }

        let mut timeline = timeline_with(vec![
            translated(0.0, 2.0, "A", "first"),
            translated(2.0, 4.0, "A", ""),
            translated(4.0, 6.0, "A", "last"),
        ]);
        let synthesizer = CapturingSynthesizer(std::sync::Mutex::new(String::new()));

        redistribute_speaker_audio(&mut timeline, &synthesizer, "hi").unwrap();

        assert_eq!(&*synthesizer.0.lock().unwrap(), "first last");
    }
}

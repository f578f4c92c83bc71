//! Timeline compositor: pool every segment's audio across all speakers and
//! concatenate into one vocal track.
//!
//! Segments are ordered by their original start time and their buffers are
//! appended back-to-back. Audio is NOT placed at absolute timestamps: the
//! silences and overlaps between original segments are not reproduced, so
//! the vocal track's duration generally differs from the source recording's.
//! Sequential concatenation is intentional; do not change it to
//! absolute-time placement.

use crate::audio::AudioBuffer;
use crate::error::Result;
use crate::timeline::Timeline;

/// Concatenate all segment audio, ordered by segment start time.
///
/// Segments without audio (or with empty slices) contribute nothing. When no
/// segment has audio at all the result is an empty buffer at the vocal
/// stem's sample rate.
///
/// # Errors
/// Fails on a sample-rate mismatch between per-segment buffers; slices of
/// one speaker always share a rate, so this only fires when the synthesis
/// engine emits different rates for different speakers.
pub fn composite_vocal_track(timeline: &Timeline) -> Result<AudioBuffer> {
    let mut ordered: Vec<&crate::timeline::Segment> = timeline
        .segments
        .iter()
        .filter(|s| s.audio.as_ref().is_some_and(|a| !a.is_empty()))
        .collect();
    ordered.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut iter = ordered.into_iter();
    let Some(first) = iter.next() else {
        return Ok(AudioBuffer::mono(Vec::new(), timeline.vocals.sample_rate()));
    };

    // Unwrap-free by construction: the filter above kept only Some audio
    let mut track = first.audio.clone().unwrap_or_else(|| {
        AudioBuffer::mono(Vec::new(), timeline.vocals.sample_rate())
    });
    for segment in iter {
        if let Some(audio) = &segment.audio {
            track.append(audio)?;
        }
    }
    Ok(track)
}

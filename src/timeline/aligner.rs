//! Transcription aligner: maps time-stamped transcript fragments onto
//! segments by temporal containment.
//!
//! A fragment contributes to a segment only when its whole `[start, end]`
//! interval lies inside the segment's bounds. Fragments that straddle a
//! segment boundary are dropped entirely — a documented lossy policy, so the
//! recovered transcript is never longer than the full-recording transcript.
//! With overlapping speaker segments the first containing segment in
//! timeline order wins, so no fragment is ever attributed twice.

use crate::engines::TranscriptFragment;
use crate::timeline::segment::Timeline;

/// Populate each segment's `text` from the fragments it fully contains.
///
/// Fragments are consumed in their original order, so multi-fragment
/// segments read naturally. Segments that end up with no text are alignment
/// anomalies: logged, left empty, never fatal.
pub fn align_transcript(timeline: &mut Timeline, fragments: &[TranscriptFragment]) {
    let mut claimed = vec![false; fragments.len()];

    for segment in &mut timeline.segments {
        let mut parts: Vec<&str> = Vec::new();
        for (fragment, claimed) in fragments.iter().zip(claimed.iter_mut()) {
            if !*claimed && segment.contains(fragment.start, fragment.end) {
                *claimed = true;
                if !fragment.text.is_empty() {
                    parts.push(&fragment.text);
                }
            }
        }
        segment.text = parts.join(" ");

        if segment.text.is_empty() {
            log::warn!(
                "no transcript aligned to segment {:.2}-{:.2}s (speaker {})",
                segment.start,
                segment.end,
                segment.speaker
            );
        }
    }

    let dropped = claimed.iter().filter(|&&c| !c).count();
    if dropped > 0 {
        log::debug!(
            "{} transcript fragment(s) straddled segment boundaries and were dropped",
            dropped
        );
    }
}

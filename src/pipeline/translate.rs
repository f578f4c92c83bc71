//! Translation stage: attach target-language text to every segment.

use crate::engines::Translator;
use crate::error::Result;
use crate::timeline::Timeline;

/// Translate each segment's transcript into the target language.
///
/// Segments are translated independently; invocation order does not affect
/// the output. Segments with an empty transcript are an alignment anomaly:
/// the engine is not called and they carry an empty translation so later
/// stages see every segment populated. Engine failures abort the stage.
pub fn translate_segments(
    timeline: &mut Timeline,
    translator: &dyn Translator,
    target_language: &str,
) -> Result<()> {
    for segment in &mut timeline.segments {
        if segment.text.is_empty() {
            log::warn!(
                "segment {:.2}-{:.2}s has no transcript, skipping translation",
                segment.start,
                segment.end
            );
            segment.translated_text = Some(String::new());
            continue;
        }
        let translated = translator.translate(&segment.text, target_language)?;
        segment.translated_text = Some(translated);
    }
    Ok(())
}

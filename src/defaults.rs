//! Default configuration constants for redub.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Gain applied to the background track when mixing it under the dubbed vocals.
///
/// The background is attenuated to 80% so the synthesized speech stays
/// intelligible over music and ambience. No clipping or normalization is
/// applied after the overlay.
pub const BACKGROUND_GAIN: f32 = 0.8;

/// Default target language for dubbing.
///
/// Any code understood by the configured translation and synthesis engines
/// is valid; "hi" matches the Hindi-first deployments this tool grew out of.
pub const DEFAULT_TARGET_LANGUAGE: &str = "hi";

/// Minimum diarized-turn duration before the heuristic classifier will even
/// consider labeling it as singing.
///
/// Spoken turns rarely run this long without a diarization break; sung
/// passages routinely do.
pub const SINGING_MIN_SECS: f64 = 12.0;

/// Minimum RMS energy over a turn for the heuristic classifier to label it
/// as singing.
///
/// Singing holds sustained energy across the whole turn, while speech dips
/// between phrases. Tuned against vocal stems from typical separation
/// engines, which normalize to roughly full scale.
pub const SINGING_RMS_THRESHOLD: f32 = 0.12;

/// Prefix for per-request scratch directories.
pub const SCRATCH_PREFIX: &str = "redub";

/// Separator inserted between a speaker's translated segment texts before
/// synthesis.
pub const SYNTHESIS_TEXT_SEPARATOR: &str = " ";

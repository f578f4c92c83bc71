//! Audio mixer: overlay the reconstructed vocal track onto the original
//! background track.
//!
//! The mixer owns rate/shape reconciliation: the background is resampled to
//! the vocal track's rate and adapted to its channel count, the shorter
//! buffer is padded with trailing silence, and the overlay is a pointwise
//! `vocal + background × gain` with no clipping or normalization. The
//! result is deterministic: mixing the same inputs twice is bit-identical.

use crate::audio::AudioBuffer;
use crate::defaults;

/// Mix with the default background gain.
pub fn mix(vocal: &AudioBuffer, background: &AudioBuffer) -> AudioBuffer {
    mix_with_gain(vocal, background, defaults::BACKGROUND_GAIN)
}

/// Overlay `background × gain` under `vocal`.
///
/// The output is at the vocal track's sample rate and channel count, with
/// `max(vocal.len, background.len)` samples per channel — never shorter than
/// either input, and every sample index in bounds.
pub fn mix_with_gain(vocal: &AudioBuffer, background: &AudioBuffer, gain: f32) -> AudioBuffer {
    let mut background = if background.sample_rate() == vocal.sample_rate() {
        background.clone()
    } else {
        background.resample(vocal.sample_rate())
    };
    background = background.with_channel_count(vocal.channel_count());

    let max_length = vocal.sample_count().max(background.sample_count());
    let mut vocal = vocal.clone();
    vocal.pad_to(max_length);
    background.pad_to(max_length);

    let channels = vocal
        .channels()
        .iter()
        .zip(background.channels())
        .map(|(v, b)| {
            v.iter()
                .zip(b)
                .map(|(&vs, &bs)| vs + bs * gain)
                .collect::<Vec<f32>>()
        })
        .collect();

    // Shapes were reconciled above, so this cannot fail
    AudioBuffer::new(channels, vocal.sample_rate())
        .unwrap_or_else(|_| AudioBuffer::mono(Vec::new(), vocal.sample_rate()))
}

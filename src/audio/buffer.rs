//! Multichannel audio buffer with the transforms the pipeline needs.
//!
//! Samples are stored planar (one `Vec<f32>` per channel, all the same
//! length) in the -1.0..=1.0 range. Buffers combined by addition or
//! concatenation must share a sample rate; the mixer enforces this before
//! combining.

use crate::error::{RedubError, Result};

/// A fixed-size multichannel waveform plus its sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from planar channel data.
    ///
    /// # Errors
    /// Fails if there are no channels, the channels differ in length, or the
    /// sample rate is zero.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if channels.is_empty() {
            return Err(RedubError::AudioBuffer {
                message: "buffer must have at least one channel".to_string(),
            });
        }
        if sample_rate == 0 {
            return Err(RedubError::AudioBuffer {
                message: "sample rate must be non-zero".to_string(),
            });
        }
        let len = channels[0].len();
        if channels.iter().any(|c| c.len() != len) {
            return Err(RedubError::AudioBuffer {
                message: "all channels must have the same length".to_string(),
            });
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Create a single-channel buffer.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            channels: vec![samples],
            sample_rate,
        }
    }

    /// Create an all-zero buffer of the given shape.
    pub fn silence(channel_count: usize, sample_count: usize, sample_rate: u32) -> Self {
        Self {
            channels: vec![vec![0.0; sample_count]; channel_count.max(1)],
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel.
    pub fn sample_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count() == 0
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.sample_count() as f64 / self.sample_rate as f64
    }

    /// Root-mean-square level over all channels (0.0 for an empty buffer).
    pub fn rms(&self) -> f32 {
        let total: usize = self.channels.iter().map(Vec::len).sum();
        if total == 0 {
            return 0.0;
        }
        let sum_squares: f64 = self
            .channels
            .iter()
            .flat_map(|c| c.iter())
            .map(|&s| (s as f64) * (s as f64))
            .sum();
        (sum_squares / total as f64).sqrt() as f32
    }

    /// Copy out the sample range `[start, end)` from every channel.
    ///
    /// Indices are clamped to the buffer, so a degenerate range yields an
    /// empty buffer rather than panicking.
    pub fn slice(&self, start: usize, end: usize) -> AudioBuffer {
        let len = self.sample_count();
        let start = start.min(len);
        let end = end.clamp(start, len);
        AudioBuffer {
            channels: self
                .channels
                .iter()
                .map(|c| c[start..end].to_vec())
                .collect(),
            sample_rate: self.sample_rate,
        }
    }

    /// Copy out the time range `[start_secs, end_secs)`.
    pub fn slice_secs(&self, start_secs: f64, end_secs: f64) -> AudioBuffer {
        let to_index = |secs: f64| -> usize {
            if secs <= 0.0 {
                0
            } else {
                (secs * self.sample_rate as f64).round() as usize
            }
        };
        self.slice(to_index(start_secs), to_index(end_secs))
    }

    /// Append another buffer's samples after this buffer's.
    ///
    /// The other buffer is adapted to this buffer's channel count first.
    ///
    /// # Errors
    /// Fails if the sample rates differ.
    pub fn append(&mut self, other: &AudioBuffer) -> Result<()> {
        if other.sample_rate != self.sample_rate {
            return Err(RedubError::SampleRateMismatch {
                expected: self.sample_rate,
                actual: other.sample_rate,
            });
        }
        let other = other.with_channel_count(self.channel_count());
        for (dst, src) in self.channels.iter_mut().zip(other.channels.iter()) {
            dst.extend_from_slice(src);
        }
        Ok(())
    }

    /// Pad every channel with trailing zero samples up to `sample_count`.
    /// No-op when the buffer is already at least that long.
    pub fn pad_to(&mut self, sample_count: usize) {
        for channel in &mut self.channels {
            if channel.len() < sample_count {
                channel.resize(sample_count, 0.0);
            }
        }
    }

    /// Resample to a new rate using linear interpolation.
    ///
    /// Good enough for reconciling engine output rates before mixing; this is
    /// not a band-limited resampler.
    pub fn resample(&self, to_rate: u32) -> AudioBuffer {
        if to_rate == self.sample_rate {
            return self.clone();
        }
        AudioBuffer {
            channels: self
                .channels
                .iter()
                .map(|c| resample_channel(c, self.sample_rate, to_rate))
                .collect(),
            sample_rate: to_rate,
        }
    }

    /// Adapt to a different channel count: averaging down to mono, or
    /// duplicating the mono downmix up to more channels.
    pub fn with_channel_count(&self, channel_count: usize) -> AudioBuffer {
        let channel_count = channel_count.max(1);
        if channel_count == self.channel_count() {
            return self.clone();
        }
        let len = self.sample_count();
        let scale = 1.0 / self.channel_count() as f32;
        let mono: Vec<f32> = (0..len)
            .map(|i| self.channels.iter().map(|c| c[i]).sum::<f32>() * scale)
            .collect();
        AudioBuffer {
            channels: vec![mono; channel_count],
            sample_rate: self.sample_rate,
        }
    }
}

/// Simple linear interpolation resampling of one channel.
fn resample_channel(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[samples.len() - 1]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as f32
            }
        })
        .collect()
}

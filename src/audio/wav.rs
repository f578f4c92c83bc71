//! WAV file reading and writing for pipeline inputs, scratch artifacts, and
//! the final dub.
//!
//! Supports 16-bit integer and 32-bit float PCM on the way in; always writes
//! 16-bit integer PCM, which every downstream tool accepts.

use crate::audio::buffer::AudioBuffer;
use crate::error::{RedubError, Result};
use std::fs::File;
use std::io::{BufWriter, Read, Seek, Write};
use std::path::Path;

/// Read a WAV file into an [`AudioBuffer`], preserving channel layout and
/// sample rate.
pub fn read_wav(path: &Path) -> Result<AudioBuffer> {
    let file = File::open(path).map_err(|e| RedubError::AudioRead {
        message: format!("Failed to open {}: {}", path.display(), e),
    })?;
    read_wav_from(file)
}

/// Read WAV data from any reader (for testing/flexibility).
pub fn read_wav_from<R: Read>(reader: R) -> Result<AudioBuffer> {
    let mut wav_reader = hound::WavReader::new(reader).map_err(|e| RedubError::AudioRead {
        message: format!("Failed to parse WAV file: {}", e),
    })?;

    let spec = wav_reader.spec();
    let channel_count = spec.channels as usize;
    if channel_count == 0 {
        return Err(RedubError::AudioRead {
            message: "WAV file reports zero channels".to_string(),
        });
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            wav_reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()
        }
        hound::SampleFormat::Float => wav_reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>(),
    }
    .map_err(|e| RedubError::AudioRead {
        message: format!("Failed to read WAV samples: {}", e),
    })?;

    // De-interleave into planar channels; a trailing partial frame is dropped
    let frame_count = interleaved.len() / channel_count;
    let mut channels = vec![Vec::with_capacity(frame_count); channel_count];
    for frame in interleaved.chunks_exact(channel_count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    AudioBuffer::new(channels, spec.sample_rate)
}

/// Write an [`AudioBuffer`] to a 16-bit PCM WAV file.
pub fn write_wav(path: &Path, buffer: &AudioBuffer) -> Result<()> {
    let file = File::create(path).map_err(|e| RedubError::AudioWrite {
        message: format!("Failed to create {}: {}", path.display(), e),
    })?;
    write_wav_to(BufWriter::new(file), buffer)
}

/// Write WAV data to any writer.
pub fn write_wav_to<W: Write + Seek>(writer: W, buffer: &AudioBuffer) -> Result<()> {
    let spec = hound::WavSpec {
        channels: buffer.channel_count() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut wav_writer =
        hound::WavWriter::new(writer, spec).map_err(|e| RedubError::AudioWrite {
            message: format!("Failed to start WAV writer: {}", e),
        })?;

    for i in 0..buffer.sample_count() {
        for channel in buffer.channels() {
            let sample = (channel[i].clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            wav_writer
                .write_sample(sample)
                .map_err(|e| RedubError::AudioWrite {
                    message: format!("Failed to write WAV sample: {}", e),
                })?;
        }
    }

    wav_writer.finalize().map_err(|e| RedubError::AudioWrite {
        message: format!("Failed to finalize WAV file: {}", e),
    })
}

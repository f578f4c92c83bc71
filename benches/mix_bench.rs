use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use redub::audio::AudioBuffer;
use redub::pipeline::{mix, mix_with_gain};

/// Deterministic pseudo-noise so runs are comparable.
fn noise(sample_count: usize, sample_rate: u32) -> AudioBuffer {
    let mut state = 0x2545f491u32;
    let samples = (0..sample_count)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (state as f32 / u32::MAX as f32) * 0.6 - 0.3
        })
        .collect();
    AudioBuffer::mono(samples, sample_rate)
}

fn bench_mix_equal_rates(c: &mut Criterion) {
    let mut group = c.benchmark_group("mix_equal_rates");
    for seconds in [10u32, 60, 300] {
        let samples = (seconds * 16000) as usize;
        let vocal = noise(samples, 16000);
        let background = noise(samples, 16000);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}s", seconds)),
            &seconds,
            |b, _| b.iter(|| mix(black_box(&vocal), black_box(&background))),
        );
    }
    group.finish();
}

fn bench_mix_with_resample(c: &mut Criterion) {
    // Background at 44.1 kHz against 16 kHz vocals, the common stem shape
    let vocal = noise(60 * 16000, 16000);
    let background = noise(60 * 44100, 44100);
    c.bench_function("mix_resampling_60s", |b| {
        b.iter(|| mix_with_gain(black_box(&vocal), black_box(&background), 0.8))
    });
}

criterion_group!(benches, bench_mix_equal_rates, bench_mix_with_resample);
criterion_main!(benches);

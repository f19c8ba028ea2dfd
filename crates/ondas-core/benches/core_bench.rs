//! Criterion benchmarks for ondas-core DSP primitives
//!
//! Run with: cargo bench -p ondas-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ondas_core::{ControlInput, DiscreteLadder, Processor, SmoothedParam, TransistorLadder};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_transistor_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("TransistorLadder");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut filter = TransistorLadder::new(SAMPLE_RATE);
                filter.set_cutoff(2000.0);
                filter.set_resonance(1.5);
                b.iter(|| {
                    for &sample in &input {
                        black_box(filter.process(black_box(sample)));
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("process_block_modulated", block_size),
            &block_size,
            |b, _| {
                let mut filter = TransistorLadder::new(SAMPLE_RATE);
                let cutoff: Vec<f32> = (0..block_size)
                    .map(|i| 500.0 + i as f32 / block_size as f32 * 5000.0)
                    .collect();
                let mut output = vec![0.0f32; block_size];
                b.iter(|| {
                    filter.process_block_modulated(
                        black_box(&input),
                        black_box(&mut output),
                        &ControlInput::SampleAccurate(&cutoff),
                        &ControlInput::Scalar(1.5),
                        &ControlInput::Scalar(1.0),
                    );
                });
            },
        );
    }

    group.finish();
}

fn bench_discrete_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("DiscreteLadder");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut filter = DiscreteLadder::new();
                filter.set_cutoff(0.4);
                filter.set_resonance(2.0);
                b.iter(|| {
                    for &sample in &input {
                        black_box(filter.process(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_smoothed_param(c: &mut Criterion) {
    let mut group = c.benchmark_group("SmoothedParam");

    group.bench_function("advance_1024", |b| {
        let mut param = SmoothedParam::with_config(0.0, SAMPLE_RATE, 10.0);
        param.set_target(1.0);
        b.iter(|| {
            for _ in 0..1024 {
                black_box(param.advance());
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_transistor_ladder,
    bench_discrete_ladder,
    bench_smoothed_param
);
criterion_main!(benches);

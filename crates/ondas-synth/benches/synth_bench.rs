//! Criterion benchmarks for ondas-synth components
//!
//! Run with: cargo bench -p ondas-synth

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ondas_core::{ControlInput, Generator};
use ondas_synth::{
    AnalogAdsr, PolyBlepOscillator, PolyBlepWaveform, WaveTableBank, WaveTableOscillator,
    WavetableWaveform,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

// ============================================================================
// Table construction benchmarks
// ============================================================================

fn bench_bank_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("WaveTableBank");
    group.sample_size(20);

    group.bench_function("build_all", |b| b.iter(|| black_box(WaveTableBank::build())));

    group.bench_function("sawtooth_tables", |b| {
        b.iter(|| black_box(ondas_synth::bank::sawtooth_tables()))
    });

    group.finish();
}

// ============================================================================
// Wavetable oscillator benchmarks
// ============================================================================

fn bench_wavetable_waveforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("WaveTableOscillator");
    let bank = WaveTableBank::build();

    let waveforms = [
        ("Sine", WavetableWaveform::Sine),
        ("Triangle", WavetableWaveform::Triangle),
        ("Square", WavetableWaveform::Square),
        ("Sawtooth", WavetableWaveform::Sawtooth),
        ("Organ", WavetableWaveform::Organ),
        ("Bass", WavetableWaveform::Bass),
    ];

    for (name, waveform) in &waveforms {
        for &block_size in BLOCK_SIZES {
            let mut osc = WaveTableOscillator::new(&bank, *waveform, SAMPLE_RATE);
            osc.set_frequency(440.0);

            group.bench_with_input(
                BenchmarkId::new(*name, block_size),
                &block_size,
                |b, &size| {
                    let mut out = vec![0.0f32; size];
                    b.iter(|| {
                        osc.render(&mut out);
                        black_box(out[size - 1])
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_wavetable_modulated(c: &mut Criterion) {
    let mut group = c.benchmark_group("WaveTableOscillator_Modulated");
    let bank = WaveTableBank::build();

    for &block_size in BLOCK_SIZES {
        let mut osc = WaveTableOscillator::new(&bank, WavetableWaveform::Sawtooth, SAMPLE_RATE);

        // Audio-rate frequency sweep plus scalar controls.
        let sweep: Vec<f32> = (0..block_size)
            .map(|i| 220.0 + i as f32 * 2.0)
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, &size| {
                let mut out = vec![0.0f32; size];
                b.iter(|| {
                    osc.render_modulated(
                        &mut out,
                        &ControlInput::SampleAccurate(&sweep),
                        &ControlInput::Scalar(0.0),
                        &ControlInput::Scalar(0.5),
                        &ControlInput::Scalar(0.0),
                        &ControlInput::Scalar(0.0),
                    );
                    black_box(out[size - 1])
                })
            },
        );
    }

    group.finish();
}

fn bench_unison_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("WaveTableOscillator_Unison");
    let bank = WaveTableBank::build();
    let block_size = 256;

    for voices in [1u32, 2, 4, 8, 16] {
        let mut osc = WaveTableOscillator::new(&bank, WavetableWaveform::Sawtooth, SAMPLE_RATE);
        osc.set_frequency(220.0);
        osc.set_unison_count(voices);
        osc.set_unison_spread(30.0);

        group.bench_function(format!("{voices}_voices"), |b| {
            let mut out = vec![0.0f32; block_size];
            b.iter(|| {
                osc.render(&mut out);
                black_box(out[block_size - 1])
            })
        });
    }

    group.finish();
}

// ============================================================================
// PolyBLEP oscillator benchmarks
// ============================================================================

fn bench_polyblep_waveforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("PolyBlepOscillator");

    let waveforms = [
        ("Sine", PolyBlepWaveform::Sine),
        ("Triangle", PolyBlepWaveform::Triangle),
        ("Square", PolyBlepWaveform::Square),
        ("Sawtooth", PolyBlepWaveform::Sawtooth),
        ("Rectangle", PolyBlepWaveform::Rectangle),
        ("TrapezoidVariable", PolyBlepWaveform::TrapezoidVariable),
        ("FullWaveRectifiedSine", PolyBlepWaveform::FullWaveRectifiedSine),
    ];

    for (name, waveform) in &waveforms {
        for &block_size in BLOCK_SIZES {
            let mut osc = PolyBlepOscillator::new(SAMPLE_RATE);
            osc.set_waveform(*waveform);
            osc.set_frequency(440.0);

            group.bench_with_input(
                BenchmarkId::new(*name, block_size),
                &block_size,
                |b, &size| {
                    let mut out = vec![0.0f32; size];
                    b.iter(|| {
                        osc.render(&mut out);
                        black_box(out[size - 1])
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_polyblep_modulated(c: &mut Criterion) {
    let mut group = c.benchmark_group("PolyBlepOscillator_Modulated");

    for &block_size in BLOCK_SIZES {
        let mut osc = PolyBlepOscillator::new(SAMPLE_RATE);
        osc.set_waveform(PolyBlepWaveform::Square);

        let pw_sweep: Vec<f32> = (0..block_size)
            .map(|i| 0.1 + 0.8 * i as f32 / block_size as f32)
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, &size| {
                let mut out = vec![0.0f32; size];
                b.iter(|| {
                    osc.render_modulated(
                        &mut out,
                        &ControlInput::Scalar(440.0),
                        &ControlInput::Scalar(0.0),
                        &ControlInput::SampleAccurate(&pw_sweep),
                        &ControlInput::Scalar(0.0),
                        &ControlInput::Scalar(0.0),
                        &ControlInput::Scalar(1.0),
                    );
                    black_box(out[size - 1])
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Envelope benchmarks
// ============================================================================

fn bench_envelope_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("AnalogAdsr");

    for &block_size in BLOCK_SIZES {
        let mut env = AnalogAdsr::new(SAMPLE_RATE);
        env.set_attack_time(0.01);
        env.set_decay_time(0.05);
        env.set_sustain_level(0.7);
        env.set_release_time(0.2);

        let input = vec![0.5f32; block_size];

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, &size| {
                let mut out = vec![0.0f32; size];
                b.iter(|| {
                    env.process_block(&input, &mut out, &ControlInput::Scalar(1.0));
                    black_box(out[size - 1])
                })
            },
        );
    }

    group.finish();
}

fn bench_envelope_full_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("AnalogAdsr_FullCycle");

    // A complete attack-decay-sustain-release pass, one second of audio.
    group.bench_function("1sec_cycle", |b| {
        let mut env = AnalogAdsr::new(SAMPLE_RATE);
        env.set_attack_time(0.05);
        env.set_decay_time(0.1);
        env.set_sustain_level(0.6);
        env.set_release_time(0.3);

        b.iter(|| {
            env.reset();
            let mut sum = 0.0f32;
            for _ in 0..24000 {
                sum += env.tick(true);
            }
            for _ in 0..24000 {
                sum += env.tick(false);
            }
            black_box(sum)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_bank_build,
    bench_wavetable_waveforms,
    bench_wavetable_modulated,
    bench_unison_scaling,
    bench_polyblep_waveforms,
    bench_polyblep_modulated,
    bench_envelope_block,
    bench_envelope_full_cycle,
);

criterion_main!(benches);

//! Integration tests for ondas-core DSP primitives.
//!
//! Verifies the ladder filters at the signal level (sine sweeps, RMS gain
//! measurements), sample-accurate control resolution through a full block
//! pipeline, and SmoothedParam convergence timing.

use ondas_core::{
    ControlInput, DiscreteLadder, Processor, SmoothedParam, TransistorLadder, db_to_linear,
    linear_to_db,
};

const SAMPLE_RATE: f32 = 48000.0;
const TAU: f32 = core::f32::consts::TAU;

/// Generate a sine wave buffer at the given frequency and sample rate.
fn generate_sine(freq_hz: f32, sample_rate: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|n| libm::sinf(TAU * freq_hz * n as f32 / sample_rate))
        .collect()
}

/// Measure RMS amplitude of a signal buffer.
fn rms(signal: &[f32]) -> f32 {
    let sum_sq: f32 = signal.iter().map(|&s| s * s).sum();
    libm::sqrtf(sum_sq / signal.len() as f32)
}

/// Feed a sine through a filter and measure settled output gain in dB.
fn measure_response(filter: &mut impl Processor, freq_hz: f32) -> f32 {
    let num_samples = 4800;
    let settle = 2400;
    let input = generate_sine(freq_hz, SAMPLE_RATE, num_samples);
    let output: Vec<f32> = input.iter().map(|&s| filter.process(s)).collect();
    linear_to_db(rms(&output[settle..]) / rms(&input[settle..]))
}

// ============================================================================
// 1. Ladder filter frequency responses
// ============================================================================

#[test]
fn transistor_ladder_is_lowpass() {
    let mut filter = TransistorLadder::new(SAMPLE_RATE);
    filter.set_cutoff(1000.0);
    filter.set_resonance(0.0);

    let low = measure_response(&mut filter, 100.0);
    filter.reset();
    let high = measure_response(&mut filter, 8000.0);

    assert!(
        low > high + 20.0,
        "expected >20 dB separation across cutoff, got low={low:.1} dB high={high:.1} dB"
    );
}

#[test]
fn transistor_ladder_rolloff_steepens_with_frequency() {
    // Four poles: each octave above cutoff loses roughly 24 dB once past
    // the knee.
    let mut filter = TransistorLadder::new(SAMPLE_RATE);
    filter.set_cutoff(500.0);

    filter.reset();
    let g4k = measure_response(&mut filter, 4000.0);
    filter.reset();
    let g8k = measure_response(&mut filter, 8000.0);

    let octave_drop = g4k - g8k;
    assert!(
        octave_drop > 15.0,
        "expected steep 4-pole rolloff, got {octave_drop:.1} dB/octave"
    );
}

#[test]
fn transistor_ladder_resonance_peaks_above_own_passband() {
    // Resonance also drops the passband gain (by 1/(1+res) at DC), so the
    // peak is measured against the same filter's low-frequency response,
    // not against a non-resonant instance. Small input keeps the tanh
    // stages near their linear region.
    let mut filter = TransistorLadder::new(SAMPLE_RATE);
    filter.set_cutoff(1000.0);
    filter.set_resonance(2.5);

    let respond = |filter: &mut TransistorLadder, freq_hz: f32| -> f32 {
        filter.reset();
        let input: Vec<f32> = generate_sine(freq_hz, SAMPLE_RATE, 4800)
            .iter()
            .map(|s| s * 0.1)
            .collect();
        let output: Vec<f32> = input.iter().map(|&s| filter.process(s)).collect();
        linear_to_db(rms(&output[2400..]) / rms(&input[2400..]))
    };

    let passband = respond(&mut filter, 150.0);
    let peak = (6..=14)
        .map(|k| respond(&mut filter, k as f32 * 100.0))
        .fold(f32::NEG_INFINITY, f32::max);

    assert!(
        peak > passband + 3.0,
        "resonance should lift the peak above the passband: {passband:.1} -> {peak:.1} dB"
    );
}

#[test]
fn discrete_ladder_open_passes_low_frequencies() {
    let mut filter = DiscreteLadder::new();
    filter.set_cutoff(1.0);
    filter.set_resonance(0.0);

    let gain = measure_response(&mut filter, 200.0);
    // Fully open, the empirical coefficient set passes lows within a few dB.
    assert!(gain > -6.0, "open filter attenuated lows by {gain:.1} dB");
}

#[test]
fn discrete_ladder_attenuates_with_low_cutoff() {
    let mut filter = DiscreteLadder::new();
    filter.set_cutoff(0.05);
    filter.set_resonance(0.0);

    let gain = measure_response(&mut filter, 8000.0);
    assert!(gain < -30.0, "expected deep attenuation, got {gain:.1} dB");
}

// ============================================================================
// 2. Sample-accurate control through block processing
// ============================================================================

#[test]
fn block_processing_matches_per_sample_with_scalar_controls() {
    let input = generate_sine(440.0, SAMPLE_RATE, 512);

    let mut scalar = TransistorLadder::new(SAMPLE_RATE);
    scalar.set_cutoff(2000.0);
    scalar.set_resonance(1.0);
    scalar.set_drive(1.0);
    let per_sample: Vec<f32> = input.iter().map(|&s| scalar.process(s)).collect();

    let mut blocked = TransistorLadder::new(SAMPLE_RATE);
    let mut output = vec![0.0f32; 512];
    blocked.process_block_modulated(
        &input,
        &mut output,
        &ControlInput::Scalar(2000.0),
        &ControlInput::Scalar(1.0),
        &ControlInput::Scalar(1.0),
    );

    for (i, (&a, &b)) in per_sample.iter().zip(output.iter()).enumerate() {
        assert!((a - b).abs() < 1e-6, "sample {i}: {a} vs {b}");
    }
}

#[test]
fn audio_rate_cutoff_modulation_stays_finite() {
    let input = generate_sine(440.0, SAMPLE_RATE, 1024);
    let cutoff: Vec<f32> = (0..1024)
        .map(|n| 200.0 + 9800.0 * (1.0 + libm::sinf(TAU * 30.0 * n as f32 / SAMPLE_RATE)) / 2.0)
        .collect();

    let mut filter = TransistorLadder::new(SAMPLE_RATE);
    let mut output = vec![0.0f32; 1024];
    filter.process_block_modulated(
        &input,
        &mut output,
        &ControlInput::SampleAccurate(&cutoff),
        &ControlInput::Scalar(2.0),
        &ControlInput::Scalar(1.5),
    );

    assert!(output.iter().all(|y| y.is_finite()));
    assert!(rms(&output) > 0.0, "modulated filter went silent");
}

// ============================================================================
// 3. SmoothedParam timing
// ============================================================================

#[test]
fn smoothed_param_reaches_time_constant_at_configured_ms() {
    // 10 ms smoothing: after exactly 10 ms of samples the value has covered
    // ~63.2% of the distance (one RC time constant).
    let mut param = SmoothedParam::with_config(0.0, SAMPLE_RATE, 10.0);
    param.set_target(1.0);

    let samples_10ms = (SAMPLE_RATE * 0.010) as usize;
    let mut value = 0.0;
    for _ in 0..samples_10ms {
        value = param.advance();
    }
    assert!(
        (value - 0.632).abs() < 0.02,
        "expected ~0.632 after one time constant, got {value}"
    );
}

#[test]
fn db_conversion_round_trips() {
    for &db in &[-60.0, -12.0, -6.0, 0.0, 6.0, 12.0] {
        let rt = linear_to_db(db_to_linear(db));
        assert!((rt - db).abs() < 1e-3, "{db} dB -> {rt} dB");
    }
}

//! Moog-style resonant ladder low-pass filters.
//!
//! Two numeric models of the same analog topology, a cascade of four
//! one-pole stages with global feedback:
//!
//! - [`TransistorLadder`] integrates the continuous-time circuit equations
//!   (tanh-saturated stages, trapezoidal rule). Physically derived, self-
//!   oscillates at high resonance, and is the more expensive of the two.
//! - [`DiscreteLadder`] is a fixed discretization with empirical
//!   coefficients and a normalized 0..1 cutoff. Cheaper and more stable at
//!   extreme settings.
//!
//! The models are not numerically equivalent; both are kept as selectable
//! variants because material tuned against one will not sound the same
//! through the other.

use crate::ControlInput;
use crate::math::flush_denormal_f64;
use crate::param_info::{ParamDescriptor, ParamUnit, ParameterInfo};
use crate::render::Processor;

/// Thermal voltage constant (2x 156 mV, volts).
const VT: f64 = 0.312;

const LADDER_PARAMS: [ParamDescriptor; 3] = [
    ParamDescriptor::new("cutoff", "CUTOFF", ParamUnit::Hertz, 0.0, 20000.0, 20000.0),
    ParamDescriptor::new("resonance", "RES", ParamUnit::None, 0.0, 3.0, 0.0),
    ParamDescriptor::new("drive", "DRIVE", ParamUnit::None, 0.0, 10.0, 1.0),
];

/// Continuous-time transistor-ladder model (model A).
///
/// Evolves four cascaded one-pole stages by trapezoidal integration of a
/// `tanh`-saturated feedback loop. The integrator is numerically stiff:
/// setters clamp cutoff, resonance, and drive to the descriptor ranges to
/// keep it from diverging.
#[derive(Debug, Clone)]
pub struct TransistorLadder {
    sample_rate: f64,
    cutoff: f64,
    resonance: f64,
    drive: f64,
    /// Stage voltages.
    v: [f64; 4],
    /// Stage voltage derivatives from the previous sample.
    dv: [f64; 4],
    /// tanh-saturated stage voltages.
    tv: [f64; 4],
}

impl TransistorLadder {
    /// Creates a new filter at the given sample rate, fully open
    /// (cutoff 20 kHz, no resonance, unity drive).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate: f64::from(sample_rate),
            cutoff: f64::from(LADDER_PARAMS[0].default),
            resonance: f64::from(LADDER_PARAMS[1].default),
            drive: f64::from(LADDER_PARAMS[2].default),
            v: [0.0; 4],
            dv: [0.0; 4],
            tv: [0.0; 4],
        }
    }

    /// Sets the cutoff frequency in Hz, clamped to 0..20000.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = f64::from(LADDER_PARAMS[0].clamp(cutoff));
    }

    /// Sets the resonance amount, clamped to 0..3. Self-oscillation sets
    /// in near the top of the range.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = f64::from(LADDER_PARAMS[1].clamp(resonance));
    }

    /// Sets the input drive, clamped to 0..10.
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = f64::from(LADDER_PARAMS[2].clamp(drive));
    }

    /// Current cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff as f32
    }

    /// Current resonance amount.
    pub fn resonance(&self) -> f32 {
        self.resonance as f32
    }

    /// Current drive.
    pub fn drive(&self) -> f32 {
        self.drive as f32
    }

    /// One sample through the ladder with explicit coefficients.
    #[inline]
    fn tick(&mut self, input: f64, cutoff: f64, resonance: f64, drive: f64) -> f64 {
        let x = core::f64::consts::PI * cutoff / self.sample_rate;
        let g = 4.0 * core::f64::consts::PI * VT * cutoff * (1.0 - x) / (1.0 + x);
        let half_sr = 2.0 * self.sample_rate;

        let dv0 = -g * (libm::tanh((drive * input + resonance * self.v[3]) / (2.0 * VT))
            + self.tv[0]);
        self.v[0] += (dv0 + self.dv[0]) / half_sr;
        self.dv[0] = dv0;
        self.tv[0] = libm::tanh(self.v[0] / (2.0 * VT));

        for n in 1..4 {
            let dv = g * (self.tv[n - 1] - self.tv[n]);
            self.v[n] += (dv + self.dv[n]) / half_sr;
            self.dv[n] = dv;
            self.tv[n] = libm::tanh(self.v[n] / (2.0 * VT));
        }

        flush_denormal_f64(self.v[3])
    }

    /// Processes a block with sample-accurate cutoff, resonance, and drive.
    ///
    /// `input` and `output` must have equal length; control inputs shorter
    /// than the block hold their last value. A zero-length block leaves all
    /// state untouched.
    pub fn process_block_modulated(
        &mut self,
        input: &[f32],
        output: &mut [f32],
        cutoff: &ControlInput<'_>,
        resonance: &ControlInput<'_>,
        drive: &ControlInput<'_>,
    ) {
        debug_assert_eq!(input.len(), output.len());
        for (i, (inp, out)) in input.iter().zip(output.iter_mut()).enumerate() {
            let fc = f64::from(LADDER_PARAMS[0].clamp(cutoff.value_at(i)));
            let res = f64::from(LADDER_PARAMS[1].clamp(resonance.value_at(i)));
            let drv = f64::from(LADDER_PARAMS[2].clamp(drive.value_at(i)));
            *out = self.tick(f64::from(*inp), fc, res, drv) as f32;
        }
    }
}

impl Processor for TransistorLadder {
    fn process(&mut self, input: f32) -> f32 {
        let (cutoff, resonance, drive) = (self.cutoff, self.resonance, self.drive);
        self.tick(f64::from(input), cutoff, resonance, drive) as f32
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = f64::from(sample_rate);
    }

    fn reset(&mut self) {
        self.v = [0.0; 4];
        self.dv = [0.0; 4];
        self.tv = [0.0; 4];
    }
}

impl ParameterInfo for TransistorLadder {
    fn param_count(&self) -> usize {
        LADDER_PARAMS.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        LADDER_PARAMS.get(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.cutoff as f32,
            1 => self.resonance as f32,
            2 => self.drive as f32,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_cutoff(value),
            1 => self.set_resonance(value),
            2 => self.set_drive(value),
            _ => {}
        }
    }
}

const DISCRETE_PARAMS: [ParamDescriptor; 2] = [
    ParamDescriptor::new("cutoff", "CUTOFF", ParamUnit::None, 0.0, 1.0, 1.0),
    ParamDescriptor::new("resonance", "RES", ParamUnit::None, 0.0, 4.0, 1.0),
];

/// Discretized 4-pole ladder model (model B).
///
/// Cutoff is normalized: 0.0 closes the filter, 1.0 opens it to Nyquist.
/// The coefficient set (`f = cutoff * 1.16`, input factor `0.35013 f^4`,
/// feedback `resonance * (1 - 0.15 f^2)`) is empirical rather than derived
/// from the circuit.
#[derive(Debug, Clone)]
pub struct DiscreteLadder {
    cutoff: f64,
    resonance: f64,
    /// Per-stage input history.
    in_hist: [f64; 4],
    /// Per-stage output history.
    out_hist: [f64; 4],
}

impl Default for DiscreteLadder {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscreteLadder {
    /// Creates a new filter, fully open with unity resonance.
    pub fn new() -> Self {
        Self {
            cutoff: f64::from(DISCRETE_PARAMS[0].default),
            resonance: f64::from(DISCRETE_PARAMS[1].default),
            in_hist: [0.0; 4],
            out_hist: [0.0; 4],
        }
    }

    /// Sets the normalized cutoff, clamped to 0..1.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = f64::from(DISCRETE_PARAMS[0].clamp(cutoff));
    }

    /// Sets the resonance amount, clamped to 0..4.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = f64::from(DISCRETE_PARAMS[1].clamp(resonance));
    }

    /// Current normalized cutoff.
    pub fn cutoff(&self) -> f32 {
        self.cutoff as f32
    }

    /// Current resonance amount.
    pub fn resonance(&self) -> f32 {
        self.resonance as f32
    }

    #[inline]
    fn tick(&mut self, input: f64, cutoff: f64, resonance: f64) -> f64 {
        let f = cutoff * 1.16;
        let input_factor = 0.35013 * (f * f) * (f * f);
        let feedback = resonance * (1.0 - 0.15 * f * f);

        let mut x = (input - self.out_hist[3] * feedback) * input_factor;
        for n in 0..4 {
            let out = flush_denormal_f64(x + 0.3 * self.in_hist[n] + (1.0 - f) * self.out_hist[n]);
            self.in_hist[n] = x;
            self.out_hist[n] = out;
            x = out;
        }
        x
    }

    /// Processes a block with sample-accurate cutoff and resonance.
    ///
    /// `input` and `output` must have equal length; control inputs shorter
    /// than the block hold their last value.
    pub fn process_block_modulated(
        &mut self,
        input: &[f32],
        output: &mut [f32],
        cutoff: &ControlInput<'_>,
        resonance: &ControlInput<'_>,
    ) {
        debug_assert_eq!(input.len(), output.len());
        for (i, (inp, out)) in input.iter().zip(output.iter_mut()).enumerate() {
            let fc = f64::from(DISCRETE_PARAMS[0].clamp(cutoff.value_at(i)));
            let res = f64::from(DISCRETE_PARAMS[1].clamp(resonance.value_at(i)));
            *out = self.tick(f64::from(*inp), fc, res) as f32;
        }
    }
}

impl Processor for DiscreteLadder {
    fn process(&mut self, input: f32) -> f32 {
        let (cutoff, resonance) = (self.cutoff, self.resonance);
        self.tick(f64::from(input), cutoff, resonance) as f32
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {
        // Cutoff is normalized; nothing depends on the rate directly.
    }

    fn reset(&mut self) {
        self.in_hist = [0.0; 4];
        self.out_hist = [0.0; 4];
    }
}

impl ParameterInfo for DiscreteLadder {
    fn param_count(&self) -> usize {
        DISCRETE_PARAMS.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        DISCRETE_PARAMS.get(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.cutoff as f32,
            1 => self.resonance as f32,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_cutoff(value),
            1 => self.set_resonance(value),
            _ => {}
        }
    }
}

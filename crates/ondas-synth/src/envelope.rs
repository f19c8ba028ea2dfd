//! Analog-style ADSR envelope generator.
//!
//! Models the exponential charge/discharge of an RC envelope circuit. Each
//! active stage runs the recurrence `output = base + output * coef`, where
//! the coefficient encodes the stage's time constant and a small target
//! overshoot ratio: the curve aims slightly past its destination and is
//! clamped when it arrives, which is what gives analog envelopes their
//! punch compared to a plain exponential approach.
//!
//! Coefficients are recomputed only when a time, level, or sample-rate
//! setter fires, never inside the per-sample loop.

use libm::{exp, log};
use ondas_core::{ControlInput, ParamDescriptor, ParamUnit};

/// Envelope stages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdsrStage {
    /// Inactive, output is zero.
    #[default]
    Idle,
    /// Rising toward 1.0.
    Attack,
    /// Falling from 1.0 toward the sustain level.
    Decay,
    /// Holding the sustain level while the gate stays high.
    Sustain,
    /// Falling toward zero after the gate drops.
    Release,
}

/// Gate-driven envelope behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdsrMode {
    /// Gate controls sustain: release starts when the gate drops.
    #[default]
    Adsr,
    /// One-shot attack-decay-sustain; the release segment is pinned to an
    /// effectively infinite time constant.
    Ads,
}

/// Gate parameter descriptor, thresholded to on/off per sample.
pub const GATE_PARAM: ParamDescriptor =
    ParamDescriptor::new("gate", "GATE", ParamUnit::None, 0.0, 1.0, 0.0);

/// Floor for overshoot ratios before they enter a logarithm (-180 dB).
const MIN_TARGET_RATIO: f64 = 0.000000001;

/// Release time constant, in samples, used by [`AdsrMode::Ads`].
const ADS_RELEASE_SAMPLES: f64 = 99999.0;

/// Analog-modeled ADSR envelope.
///
/// The envelope itself is a unit-range control signal; `process_block`
/// multiplies it against an input bus the way a VCA would.
///
/// # Example
///
/// ```rust
/// use ondas_synth::{AnalogAdsr, AdsrStage};
///
/// let mut env = AnalogAdsr::new(48000.0);
/// env.set_attack_time(0.01);
/// env.set_decay_time(0.1);
/// env.set_sustain_level(0.7);
/// env.set_release_time(0.2);
///
/// let level = env.tick(true);
/// assert!(level > 0.0);
/// assert_eq!(env.stage(), AdsrStage::Attack);
/// ```
#[derive(Debug, Clone)]
pub struct AnalogAdsr {
    stage: AdsrStage,
    mode: AdsrMode,
    /// Current level, kept in f64 so long releases stay smooth.
    output: f64,
    release_completed: bool,
    sample_rate: f64,

    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,

    target_ratio_a: f64,
    target_ratio_dr: f64,

    attack_coef: f64,
    attack_base: f64,
    decay_coef: f64,
    decay_base: f64,
    release_coef: f64,
    release_base: f64,
}

impl AnalogAdsr {
    /// Creates an idle envelope with 125 ms segments and 0.5 sustain.
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            stage: AdsrStage::Idle,
            mode: AdsrMode::Adsr,
            output: 0.0,
            release_completed: true,
            sample_rate: f64::from(sample_rate),
            attack_time: 0.125,
            decay_time: 0.125,
            sustain_level: 0.5,
            release_time: 0.125,
            target_ratio_a: 0.3,
            target_ratio_dr: 0.001,
            attack_coef: 0.0,
            attack_base: 0.0,
            decay_coef: 0.0,
            decay_base: 0.0,
            release_coef: 0.0,
            release_base: 0.0,
        };
        env.recompute_attack();
        env.recompute_decay();
        env.recompute_release();
        env
    }

    fn calc_coef(rate_samples: f64, target_ratio: f64) -> f64 {
        if rate_samples <= 0.0 {
            0.0
        } else {
            exp(-log((1.0 + target_ratio) / target_ratio) / rate_samples)
        }
    }

    fn recompute_attack(&mut self) {
        let rate = f64::from(self.attack_time) * self.sample_rate;
        self.attack_coef = Self::calc_coef(rate, self.target_ratio_a);
        self.attack_base = (1.0 + self.target_ratio_a) * (1.0 - self.attack_coef);
    }

    fn recompute_decay(&mut self) {
        let rate = f64::from(self.decay_time) * self.sample_rate;
        self.decay_coef = Self::calc_coef(rate, self.target_ratio_dr);
        self.decay_base =
            (f64::from(self.sustain_level) - self.target_ratio_dr) * (1.0 - self.decay_coef);
    }

    fn recompute_release(&mut self) {
        let rate = match self.mode {
            AdsrMode::Adsr => f64::from(self.release_time) * self.sample_rate,
            AdsrMode::Ads => ADS_RELEASE_SAMPLES,
        };
        self.release_coef = Self::calc_coef(rate, self.target_ratio_dr);
        self.release_base = -self.target_ratio_dr * (1.0 - self.release_coef);
    }

    /// Sets the attack time in seconds. Zero or negative snaps instantly.
    pub fn set_attack_time(&mut self, seconds: f32) {
        self.attack_time = seconds;
        self.recompute_attack();
    }

    /// Sets the decay time in seconds.
    pub fn set_decay_time(&mut self, seconds: f32) {
        self.decay_time = seconds;
        self.recompute_decay();
    }

    /// Sets the sustain level, 0 to 1.
    pub fn set_sustain_level(&mut self, level: f32) {
        self.sustain_level = level.clamp(0.0, 1.0);
        self.decay_base =
            (f64::from(self.sustain_level) - self.target_ratio_dr) * (1.0 - self.decay_coef);
    }

    /// Sets the release time in seconds. Ignored while in [`AdsrMode::Ads`].
    pub fn set_release_time(&mut self, seconds: f32) {
        self.release_time = seconds;
        self.recompute_release();
    }

    /// Sets the attack overshoot ratio. Smaller values make the curve more
    /// linear; floored at 1e-9.
    pub fn set_target_ratio_attack(&mut self, ratio: f64) {
        self.target_ratio_a = ratio.max(MIN_TARGET_RATIO);
        self.recompute_attack();
    }

    /// Sets the decay/release overshoot ratio, floored at 1e-9.
    pub fn set_target_ratio_decay_release(&mut self, ratio: f64) {
        self.target_ratio_dr = ratio.max(MIN_TARGET_RATIO);
        self.recompute_decay();
        self.recompute_release();
    }

    /// Switches between gated and one-shot behavior.
    pub fn set_mode(&mut self, mode: AdsrMode) {
        self.mode = mode;
        self.recompute_release();
    }

    /// Updates the sample rate and rederives every coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = f64::from(sample_rate);
        self.recompute_attack();
        self.recompute_decay();
        self.recompute_release();
    }

    /// Current stage.
    pub fn stage(&self) -> AdsrStage {
        self.stage
    }

    /// Current envelope level.
    pub fn output(&self) -> f32 {
        self.output as f32
    }

    /// True once a release segment has fully decayed to zero.
    pub fn is_release_completed(&self) -> bool {
        self.release_completed
    }

    /// Returns to idle with zero output, as a freshly built envelope.
    pub fn reset(&mut self) {
        self.stage = AdsrStage::Idle;
        self.output = 0.0;
        self.release_completed = true;
    }

    /// Advances one sample under the given gate and returns the envelope
    /// level.
    ///
    /// A high gate triggers attack from idle or release (hard retrigger
    /// from zero); a low gate sends any active stage to release.
    pub fn tick(&mut self, gate_high: bool) -> f32 {
        if gate_high && matches!(self.stage, AdsrStage::Idle | AdsrStage::Release) {
            self.output = 0.0;
            self.stage = AdsrStage::Attack;
            self.release_completed = false;
        } else if !gate_high && self.stage != AdsrStage::Idle {
            self.stage = AdsrStage::Release;
        }
        self.process_stage() as f32
    }

    fn process_stage(&mut self) -> f64 {
        match self.stage {
            AdsrStage::Idle | AdsrStage::Sustain => {}
            AdsrStage::Attack => {
                self.output = self.attack_base + self.output * self.attack_coef;
                if self.output >= 1.0 {
                    self.output = 1.0;
                    self.stage = AdsrStage::Decay;
                }
            }
            AdsrStage::Decay => {
                self.output = self.decay_base + self.output * self.decay_coef;
                let sustain = f64::from(self.sustain_level);
                if self.output <= sustain {
                    self.output = sustain;
                    self.stage = AdsrStage::Sustain;
                }
            }
            AdsrStage::Release => {
                self.output = self.release_base + self.output * self.release_coef;
                if self.output <= 0.0 {
                    self.output = 0.0;
                    self.stage = AdsrStage::Idle;
                    self.release_completed = true;
                }
            }
        }
        self.output
    }

    /// Applies the envelope to an input block, VCA style.
    ///
    /// The gate control is thresholded per sample: any positive value is
    /// on. `input` and `output` must have equal length; zero-length blocks
    /// advance nothing.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32], gate: &ControlInput<'_>) {
        debug_assert_eq!(input.len(), output.len());
        for (i, (inp, out)) in input.iter().zip(output.iter_mut()).enumerate() {
            let level = self.tick(gate.value_at(i) > 0.0);
            *out = inp * level;
        }
    }

    /// Renders the bare envelope into a buffer without applying it to
    /// audio.
    pub fn render_envelope(&mut self, output: &mut [f32], gate: &ControlInput<'_>) {
        for (i, out) in output.iter_mut().enumerate() {
            *out = self.tick(gate.value_at(i) > 0.0);
        }
    }
}

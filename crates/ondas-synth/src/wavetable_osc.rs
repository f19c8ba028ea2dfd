//! Wavetable playback with unison stacking.
//!
//! A [`WaveTableOscillator`] reads from an immutable, shared
//! [`WaveTableSet`] built by the [`bank`](crate::bank) module. Playback per
//! sample is a table lookup with linear interpolation; band-limiting comes
//! entirely from table selection, never from runtime filtering. Square
//! waves are synthesized at playback time as the difference of two sawtooth
//! reads offset by the pulse width, which keeps duty-cycle modulation free.
//!
//! Unison stacks N phase-independent voices detuned symmetrically around
//! the base pitch and averages them at equal weight.

use std::sync::Arc;

use ondas_core::{
    ControlInput, Generator, ParamDescriptor, ParamUnit, ParameterInfo, fast_exp2,
};

use crate::bank::{WaveTableSet, WavetableWaveform};

// pulseWidth defaults to 0.5 (a centered 50% square, usable out of the
// box) and phaseModDepth to a non-negative range, with polarity carried by
// phaseMod itself.
const WAVETABLE_PARAMS: [ParamDescriptor; 5] = [
    ParamDescriptor::new("frequency", "FREQ", ParamUnit::Hertz, 0.0, 100000.0, 440.0),
    ParamDescriptor::new("detune", "DTUN", ParamUnit::Cents, -4800.0, 4800.0, 0.0),
    ParamDescriptor::new("pulseWidth", "PWDTH", ParamUnit::None, 0.0, 1.0, 0.5),
    ParamDescriptor::new("phaseMod", "PHASE", ParamUnit::None, -1.0, 1.0, 0.0),
    ParamDescriptor::new("phaseModDepth", "PHDPTH", ParamUnit::None, 0.0, 100.0, 0.0),
];

/// One playback head over a shared table set.
#[derive(Debug, Clone)]
struct Voice {
    set: Arc<WaveTableSet>,
    /// Current phase in [0, 1).
    phasor: f32,
    /// Normalized frequency, cycles per sample.
    phase_inc: f32,
    /// Second-read offset for the square path (pulse width).
    phase_offset: f32,
}

impl Voice {
    fn new(set: Arc<WaveTableSet>) -> Self {
        Self {
            set,
            phasor: 0.0,
            phase_inc: 0.0,
            phase_offset: 0.5,
        }
    }

    #[inline]
    fn output(&self) -> f32 {
        match self.set.table_for(self.phase_inc) {
            Some(table) => table.sample(self.phasor),
            None => 0.0,
        }
    }

    /// Two offset reads subtracted, turning a sawtooth table into a
    /// variable-duty rectangle.
    #[inline]
    fn output_minus_offset(&self) -> f32 {
        let Some(table) = self.set.table_for(self.phase_inc) else {
            return 0.0;
        };
        let mut offset_phase = self.phasor + self.phase_offset;
        if offset_phase >= 1.0 {
            offset_phase -= 1.0;
        }
        table.sample(self.phasor) - table.sample(offset_phase)
    }

    #[inline]
    fn update_phase(&mut self, phase_mod: f32) {
        self.phasor += self.phase_inc * (1.0 + phase_mod);
        // Extreme frequencies and deep phase modulation can step more than
        // a full cycle per sample.
        self.phasor -= libm::floorf(self.phasor);
    }
}

/// Band-limited wavetable oscillator with optional unison.
///
/// Table data is shared read-only across all instances; the per-instance
/// state is a handful of phase accumulators. Output level is a property of
/// the normalized tables, not a runtime parameter.
///
/// # Example
///
/// ```rust
/// use ondas_synth::{WaveTableBank, WaveTableOscillator, WavetableWaveform};
///
/// let bank = WaveTableBank::build();
/// let mut osc = WaveTableOscillator::new(&bank, WavetableWaveform::Sawtooth, 48000.0);
/// osc.set_frequency(110.0);
///
/// use ondas_core::Generator;
/// let sample = osc.advance();
/// ```
#[derive(Debug, Clone)]
pub struct WaveTableOscillator {
    set: Arc<WaveTableSet>,
    waveform: WavetableWaveform,
    sample_rate: f32,
    frequency: f32,
    detune_cents: f32,
    pulse_width: f32,
    phase_mod: f32,
    phase_mod_depth: f32,
    /// Total unison spread in cents across all voices.
    unison_spread: f32,
    voices: Vec<Voice>,
}

impl WaveTableOscillator {
    /// Creates an oscillator reading one of the bank's waveform families.
    pub fn new(
        bank: &crate::bank::WaveTableBank,
        waveform: WavetableWaveform,
        sample_rate: f32,
    ) -> Self {
        Self::with_tables(bank.get(waveform), waveform, sample_rate)
    }

    /// Creates an oscillator over an explicit table set, for custom spectra
    /// that live outside the bank.
    pub fn with_tables(
        set: Arc<WaveTableSet>,
        waveform: WavetableWaveform,
        sample_rate: f32,
    ) -> Self {
        let voices = vec![Voice::new(Arc::clone(&set))];
        let mut osc = Self {
            set,
            waveform,
            sample_rate,
            frequency: 440.0,
            detune_cents: 0.0,
            pulse_width: 0.5,
            phase_mod: 0.0,
            phase_mod_depth: 0.0,
            unison_spread: 0.0,
            voices,
        };
        osc.set_frequency(440.0);
        osc
    }

    /// The waveform family this oscillator plays.
    pub fn waveform(&self) -> WavetableWaveform {
        self.waveform
    }

    /// Sets the base frequency in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = freq_hz;
    }

    /// Sets the detune in cents, applied as a frequency ratio.
    pub fn set_detune(&mut self, cents: f32) {
        self.detune_cents = cents;
    }

    /// Sets the pulse width used by the square playback path.
    pub fn set_pulse_width(&mut self, pulse_width: f32) {
        self.pulse_width = pulse_width;
    }

    /// Sets the phase modulation amount.
    pub fn set_phase_mod(&mut self, phase_mod: f32) {
        self.phase_mod = phase_mod;
    }

    /// Sets the phase modulation depth multiplier.
    pub fn set_phase_mod_depth(&mut self, depth: f32) {
        self.phase_mod_depth = depth;
    }

    /// Sets the number of unison voices. 0 and 1 both mean no unison.
    ///
    /// Changing the count rebuilds the voice set from scratch; phase
    /// continuity across the change is not preserved.
    pub fn set_unison_count(&mut self, count: u32) {
        let desired = count.max(1) as usize;
        if desired != self.voices.len() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "unison: rebuilding {} -> {desired} voices",
                self.voices.len()
            );
            self.voices.clear();
            self.voices
                .resize_with(desired, || Voice::new(Arc::clone(&self.set)));
        }
    }

    /// Current number of unison voices.
    pub fn unison_count(&self) -> u32 {
        self.voices.len() as u32
    }

    /// Sets the total unison spread in cents, centered on the base detune.
    pub fn set_unison_spread(&mut self, cents: f32) {
        self.unison_spread = cents;
    }

    /// Renders a block with sample-accurate controls.
    ///
    /// Frequency and detune are folded into each voice's phase increment
    /// every sample. Control values are clamped to their declared ranges;
    /// controls shorter than the block hold their last value; a zero-length
    /// output advances nothing.
    pub fn render_modulated(
        &mut self,
        output: &mut [f32],
        frequency: &ControlInput<'_>,
        detune: &ControlInput<'_>,
        pulse_width: &ControlInput<'_>,
        phase_mod: &ControlInput<'_>,
        phase_mod_depth: &ControlInput<'_>,
    ) {
        let minus_offset = self.waveform == WavetableWaveform::Square;
        let num_voices = self.voices.len() as f32;
        let gain = 1.0 / num_voices;
        let (step_cents, base_cents) = if num_voices > 1.0 {
            (
                self.unison_spread / (num_voices - 1.0),
                -self.unison_spread / 2.0,
            )
        } else {
            // A single voice ignores the spread entirely.
            (0.0, 0.0)
        };

        for (i, out) in output.iter_mut().enumerate() {
            let freq = WAVETABLE_PARAMS[0].clamp(frequency.value_at(i));
            let cents = WAVETABLE_PARAMS[1].clamp(detune.value_at(i));
            // An unclamped pulse width would push the offset read past the
            // table's guard sample.
            let pw = WAVETABLE_PARAMS[2].clamp(pulse_width.value_at(i));
            let pm = WAVETABLE_PARAMS[3].clamp(phase_mod.value_at(i))
                * WAVETABLE_PARAMS[4].clamp(phase_mod_depth.value_at(i));

            let mut sample = 0.0;
            let mut voice_cents = base_cents;
            for voice in &mut self.voices {
                voice.phase_inc =
                    freq * fast_exp2((cents + voice_cents) / 1200.0) / self.sample_rate;
                sample += if minus_offset {
                    voice.phase_offset = pw;
                    voice.output_minus_offset()
                } else {
                    voice.output()
                };
                voice.update_phase(pm);
                voice_cents += step_cents;
            }
            *out = sample * gain;
        }
    }
}

impl Generator for WaveTableOscillator {
    fn advance(&mut self) -> f32 {
        let mut out = [0.0f32];
        let (frequency, detune, pulse_width, phase_mod, phase_mod_depth) = (
            self.frequency,
            self.detune_cents,
            self.pulse_width,
            self.phase_mod,
            self.phase_mod_depth,
        );
        self.render_modulated(
            &mut out,
            &ControlInput::Scalar(frequency),
            &ControlInput::Scalar(detune),
            &ControlInput::Scalar(pulse_width),
            &ControlInput::Scalar(phase_mod),
            &ControlInput::Scalar(phase_mod_depth),
        );
        out[0]
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.phasor = 0.0;
        }
    }
}

impl ParameterInfo for WaveTableOscillator {
    fn param_count(&self) -> usize {
        WAVETABLE_PARAMS.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        WAVETABLE_PARAMS.get(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.frequency,
            1 => self.detune_cents,
            2 => self.pulse_width,
            3 => self.phase_mod,
            4 => self.phase_mod_depth,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = WAVETABLE_PARAMS.get(index) else {
            return;
        };
        let value = desc.clamp(value);
        match index {
            0 => self.set_frequency(value),
            1 => self.set_detune(value),
            2 => self.set_pulse_width(value),
            3 => self.set_phase_mod(value),
            4 => self.set_phase_mod_depth(value),
            _ => {}
        }
    }
}

//! Ondas Synth - band-limited sources and envelopes for the ondas DSP
//! framework
//!
//! This crate provides the sound sources of the framework: wavetable and
//! PolyBLEP oscillators plus an analog-modeled ADSR envelope, all built on
//! the render and control contracts from `ondas-core`.
//!
//! # Core Components
//!
//! ## Wavetable Oscillator
//!
//! Alias-free playback of precomputed per-octave tables, with unison
//! stacking:
//!
//! - [`WaveTableBank`] - One-time FFT construction of the built-in waveforms
//! - [`WaveTableOscillator`] - Playback with detune, pulse width, and unison
//! - [`fill_tables`] / [`fill_tables_bounded`] - Table builders for custom
//!   spectra
//!
//! ```rust
//! use ondas_synth::{WaveTableBank, WaveTableOscillator, WavetableWaveform};
//! use ondas_core::Generator;
//!
//! let bank = WaveTableBank::build();
//! let mut osc = WaveTableOscillator::new(&bank, WavetableWaveform::Sawtooth, 48000.0);
//! osc.set_frequency(110.0);
//! let sample = osc.advance();
//! ```
//!
//! ## PolyBLEP Oscillator
//!
//! Thirteen closed-form waveform shapes with polynomial anti-aliasing and
//! no precomputation:
//!
//! - [`PolyBlepOscillator`] - The oscillator
//! - [`PolyBlepWaveform`] - Shape selector
//!
//! ## Envelopes
//!
//! - [`AnalogAdsr`] - Exponential charge/discharge ADSR with gated and
//!   one-shot modes
//! - [`AdsrStage`] / [`AdsrMode`] - Stage tracking and behavior selection
//!
//! # no_std Support
//!
//! The PolyBLEP oscillator and the envelope are `no_std`; the wavetable
//! modules need an allocator and the FFT, so they sit behind the default
//! `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
pub mod bank;
pub mod envelope;
pub mod polyblep;
#[cfg(feature = "std")]
pub mod wavetable_osc;

// Re-export main types at crate root
#[cfg(feature = "std")]
pub use bank::{
    DEFAULT_TABLE_LEN, WaveTable, WaveTableBank, WaveTableSet, WavetableWaveform, fill_tables,
    fill_tables_bounded, periodic_wave_tables, sawtooth_tables, sine_tables, square_tables,
    tables_from_samples, triangle_tables,
};
pub use envelope::{AdsrMode, AdsrStage, AnalogAdsr, GATE_PARAM};
pub use polyblep::{PolyBlepOscillator, PolyBlepWaveform};
#[cfg(feature = "std")]
pub use wavetable_osc::WaveTableOscillator;

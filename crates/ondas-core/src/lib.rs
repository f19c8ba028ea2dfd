//! Ondas Core - per-sample DSP primitives for sources and filters
//!
//! This crate provides the foundational building blocks shared by the
//! oscillator and envelope components in `ondas-synth`, designed for
//! real-time rendering with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Render Contracts
//!
//! - [`Generator`] - Object-safe trait for sample sources (oscillators, envelopes)
//! - [`Processor`] - Object-safe trait for sample shapers (filters)
//!
//! ## Control Inputs
//!
//! Every automatable parameter can be driven at block rate or audio rate:
//!
//! - [`ControlInput`] - Scalar-or-buffer adapter resolved per render block
//! - [`SmoothedParam`] - Exponential smoothing for click-free scalar changes
//!
//! ## Parameter Metadata
//!
//! - [`ParamDescriptor`] - Name, range, default, and scale for one parameter
//! - [`ParameterInfo`] - Index-based parameter introspection
//!
//! ## Filters
//!
//! - [`TransistorLadder`] - Continuous-time Moog-style ladder (ODE integrator)
//! - [`DiscreteLadder`] - Discretized 4-pole ladder with normalized cutoff
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`cents_to_ratio`], [`fast_exp2`], etc.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded targets. Disable the
//! default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! ondas-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in rendering paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Object-safe traits**: Dynamic dispatch when the graph needs it
//! - **Sample-accurate control**: Every parameter accepts per-sample arrays

#![cfg_attr(not(feature = "std"), no_std)]

pub mod control;
pub mod ladder;
pub mod math;
pub mod param;
pub mod param_info;
pub mod render;

// Re-export main types at crate root
pub use control::ControlInput;
pub use ladder::{DiscreteLadder, TransistorLadder};
pub use math::{
    cents_to_ratio, db_to_linear, fast_exp2, flush_denormal, flush_denormal_f64, lerp,
    linear_to_db,
};
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamScale, ParamUnit, ParameterInfo};
pub use render::{Generator, Processor};

//! Mathematical utility functions for the render path.
//!
//! Allocation-free helpers suitable for `no_std`. The oscillator render
//! loops convert detune (cents) to a frequency ratio once per sample per
//! voice, so that conversion gets a fast approximate path alongside the
//! exact `libm` one.

use libm::{expf, floorf, logf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use ondas_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Values ≤ 1e-10 are clamped to avoid `-inf`.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Fast base-2 exponential via polynomial approximation.
///
/// Decomposes `x` into integer and fractional parts: `2^x = 2^⌊x⌋ · 2^frac(x)`.
/// The integer part uses IEEE 754 exponent manipulation (exact), the
/// fractional part a 3rd-order Taylor polynomial. Maximum relative error is
/// about 0.6%, worst just below each integer exponent — up to roughly 10
/// cents when the result is used as a detune ratio, acceptable for unison
/// spread and modulation offsets.
///
/// # Examples
///
/// ```
/// use ondas_core::fast_exp2;
///
/// assert!((fast_exp2(0.0) - 1.0).abs() < 0.01);
/// assert!((fast_exp2(1.0) - 2.0).abs() < 0.01);
/// assert!((fast_exp2(-1.0) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn fast_exp2(x: f32) -> f32 {
    let x = x.clamp(-126.0, 126.0);
    let i = floorf(x) as i32;
    let f = x - i as f32;
    // 3rd-order Taylor polynomial for 2^f, f ∈ [0, 1)
    let p = 1.0 + f * (core::f32::consts::LN_2 + f * (0.240_226 + f * 0.055_504_1));
    f32::from_bits(((i + 127) as u32) << 23) * p
}

/// Convert a detune amount in cents to a frequency ratio.
///
/// 100 cents = 1 semitone, 1200 cents = 1 octave: `ratio = 2^(cents/1200)`.
/// Uses [`fast_exp2`] — this runs once per voice per sample in the unison
/// render loop.
///
/// # Examples
///
/// ```
/// use ondas_core::cents_to_ratio;
///
/// assert!((cents_to_ratio(0.0) - 1.0).abs() < 0.001);
/// assert!((cents_to_ratio(1200.0) - 2.0).abs() < 0.01);
/// assert!((cents_to_ratio(-1200.0) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    fast_exp2(cents * (1.0 / 1200.0))
}

/// Linear interpolation between `a` and `b`.
///
/// `t = 0.0` returns `a`, `t = 1.0` returns `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Flush denormal values to zero.
///
/// Recursive filters decay toward zero and eventually produce denormal
/// floats, which can be 100x slower on x86. Flushing below 1e-20 keeps the
/// recursion out of the denormal range without audible effect.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Flush denormal values to zero (f64 state).
///
/// The ladder filter integrators keep f64 state; same guard, tighter
/// threshold.
#[inline]
pub fn flush_denormal_f64(x: f64) -> f64 {
    if x.abs() < 1e-30 { 0.0 } else { x }
}

//! Control-input adapter: scalar-per-block or array-per-block.
//!
//! The external parameter system delivers automation in one of two shapes:
//! a single smoothed scalar for the whole block, or a per-sample value
//! array. The numeric cores must not branch on which mode is active —
//! every render loop reads a plain `&[f32]`. [`ControlInput::resolve`] is
//! the single place where the two calling conventions collapse into one.
//!
//! ```rust
//! use ondas_core::ControlInput;
//!
//! let mut freq = [0.0f32; 8];
//! ControlInput::Scalar(440.0).resolve(&mut freq);
//! assert!(freq.iter().all(|&f| f == 440.0));
//!
//! let automation = [100.0, 200.0, 300.0];
//! ControlInput::SampleAccurate(&automation).resolve(&mut freq);
//! assert_eq!(freq[1], 200.0);
//! assert_eq!(freq[7], 300.0); // last value holds past the slice
//! ```

/// One control value stream for one render block.
#[derive(Debug, Clone, Copy)]
pub enum ControlInput<'a> {
    /// A single smoothed value broadcast across the block.
    Scalar(f32),
    /// Per-sample automation values computed by the parameter system.
    SampleAccurate(&'a [f32]),
}

impl ControlInput<'_> {
    /// Whether this input carries per-sample automation.
    #[inline]
    pub fn is_sample_accurate(&self) -> bool {
        matches!(self, ControlInput::SampleAccurate(_))
    }

    /// Fill `out` with one value per sample.
    ///
    /// Scalar inputs broadcast; sample-accurate inputs copy. If the
    /// automation slice is shorter than the block its last value holds for
    /// the remainder (an empty slice yields silence).
    pub fn resolve(&self, out: &mut [f32]) {
        match *self {
            ControlInput::Scalar(v) => out.fill(v),
            ControlInput::SampleAccurate(values) => {
                let n = values.len().min(out.len());
                out[..n].copy_from_slice(&values[..n]);
                let hold = values.last().copied().unwrap_or(0.0);
                out[n..].fill(hold);
            }
        }
    }

    /// Read the value for sample `index` without resolving a buffer.
    ///
    /// Out-of-range indices hold the last automation value, mirroring
    /// [`resolve`](Self::resolve).
    #[inline]
    pub fn value_at(&self, index: usize) -> f32 {
        match *self {
            ControlInput::Scalar(v) => v,
            ControlInput::SampleAccurate(values) => values
                .get(index)
                .or_else(|| values.last())
                .copied()
                .unwrap_or(0.0),
        }
    }
}

impl Default for ControlInput<'_> {
    fn default() -> Self {
        ControlInput::Scalar(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_broadcasts() {
        let mut out = [0.0f32; 16];
        ControlInput::Scalar(3.5).resolve(&mut out);
        assert!(out.iter().all(|&v| v == 3.5));
    }

    #[test]
    fn array_copies_and_holds_last() {
        let values = [1.0, 2.0, 3.0];
        let mut out = [0.0f32; 6];
        ControlInput::SampleAccurate(&values).resolve(&mut out);
        assert_eq!(out, [1.0, 2.0, 3.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn empty_array_yields_silence() {
        let mut out = [9.0f32; 4];
        ControlInput::SampleAccurate(&[]).resolve(&mut out);
        assert_eq!(out, [0.0; 4]);
    }

    #[test]
    fn value_at_mirrors_resolve() {
        let values = [1.0, 2.0];
        let input = ControlInput::SampleAccurate(&values);
        assert_eq!(input.value_at(0), 1.0);
        assert_eq!(input.value_at(1), 2.0);
        assert_eq!(input.value_at(5), 2.0);
        assert_eq!(ControlInput::Scalar(7.0).value_at(100), 7.0);
    }

    #[test]
    fn zero_length_resolve_is_noop() {
        ControlInput::Scalar(1.0).resolve(&mut []);
        ControlInput::SampleAccurate(&[1.0]).resolve(&mut []);
    }
}

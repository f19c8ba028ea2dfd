//! Block-render contract shared by every component in the bank.
//!
//! Two traits split the world the way the external graph sees it:
//!
//! - [`Generator`] — sources that synthesize samples from internal state
//!   (oscillators, envelopes running free). One `f32` out per call.
//! - [`Processor`] — components that transform an upstream signal (the
//!   ladder filter, an envelope applied as a gain). One `f32` in, one out.
//!
//! Both traits carry block-processing defaults that loop the per-sample
//! method. Components with per-sample control arrays (resolved by
//! [`ControlInput`](crate::ControlInput)) expose richer inherent block
//! entry points on top of these; the traits cover the scalar-parameter
//! path and let the graph hold `dyn` handles uniformly.
//!
//! ## Real-time rules
//!
//! - No allocation, no blocking, no I/O on any render call.
//! - A zero-length block is a no-op: output untouched, state untouched.
//!   The next non-empty block must behave as if the empty one never
//!   happened.
//! - `reset()` restores the exact output sequence of a freshly constructed
//!   instance with the same parameters.

/// A sample source: synthesizes output from internal state.
pub trait Generator {
    /// Produce the next sample and advance internal state.
    fn advance(&mut self) -> f32;

    /// Fill `out` by calling [`advance`](Self::advance) once per slot.
    ///
    /// An empty slice is a no-op and must not advance state.
    fn render(&mut self, out: &mut [f32]) {
        for slot in out.iter_mut() {
            *slot = self.advance();
        }
    }

    /// Update the sample rate, recalculating any dependent coefficients.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state without changing parameters.
    fn reset(&mut self);
}

/// A sample transformer: consumes an upstream signal.
pub trait Processor {
    /// Process one input sample and advance internal state.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples.
    ///
    /// Default implementation calls [`process`](Self::process) per sample.
    /// Empty slices are a no-op.
    ///
    /// # Panics
    /// Default implementation debug-asserts `input.len() == output.len()`.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block in-place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Update the sample rate, recalculating any dependent coefficients.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal state without changing parameters.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ramp(f32);

    impl Generator for Ramp {
        fn advance(&mut self) -> f32 {
            self.0 += 1.0;
            self.0
        }
        fn set_sample_rate(&mut self, _: f32) {}
        fn reset(&mut self) {
            self.0 = 0.0;
        }
    }

    struct Gain(f32);

    impl Processor for Gain {
        fn process(&mut self, input: f32) -> f32 {
            input * self.0
        }
        fn set_sample_rate(&mut self, _: f32) {}
        fn reset(&mut self) {}
    }

    #[test]
    fn test_generator_render_fills_buffer() {
        let mut g = Ramp(0.0);
        let mut out = [0.0; 4];
        g.render(&mut out);
        assert_eq!(out, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_generator_empty_render_is_noop() {
        let mut g = Ramp(0.0);
        g.render(&mut []);
        assert_eq!(g.advance(), 1.0, "empty render must not advance state");
    }

    #[test]
    fn test_processor_block() {
        let mut p = Gain(2.0);
        let input = [1.0, 2.0, 3.0];
        let mut output = [0.0; 3];
        p.process_block(&input, &mut output);
        assert_eq!(output, [2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_processor_inplace() {
        let mut p = Gain(0.5);
        let mut buffer = [2.0, 4.0];
        p.process_block_inplace(&mut buffer);
        assert_eq!(buffer, [1.0, 2.0]);
    }
}

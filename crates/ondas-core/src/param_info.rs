//! Parameter descriptors for discoverable component parameters.
//!
//! Every component declares its automatable parameters as a static table of
//! [`ParamDescriptor`]s — `{name, short_name, default, min, max}` plus unit
//! and scale metadata. The external parameter system uses these tables to
//! register automation lanes and validate incoming values; the components
//! themselves use [`ParamDescriptor::clamp`] at their setter boundaries.

/// Scaling curve for parameter normalization.
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Logarithmic**: `normalized = ln(value/min) / ln(max/min)`, requires
///   `min > 0` — used for frequency-like parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Linear mapping (default). Equal resolution across the range.
    #[default]
    Linear,
    /// Logarithmic mapping. More resolution at low values.
    Logarithmic,
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hertz - frequency and cutoff parameters.
    Hertz,
    /// Cents - detune parameters (100 cents = 1 semitone).
    Cents,
    /// Seconds - envelope segment times.
    Seconds,
    /// Normalized 0..1 or other dimensionless values.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Cents => " ct",
            ParamUnit::Seconds => " s",
            ParamUnit::None => "",
        }
    }
}

/// Describes a single parameter's metadata for display and validation.
///
/// `short_name` should be 8 characters or less for hardware displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Pulse Width").
    pub name: &'static str,
    /// Short name for hardware displays, max 8 characters (e.g., "PWdth").
    pub short_name: &'static str,
    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,
    /// Minimum allowed value for this parameter.
    pub min: f32,
    /// Maximum allowed value for this parameter.
    pub max: f32,
    /// Default value when the component is initialized or reset.
    pub default: f32,
    /// Normalization curve for mapping between plain and normalized values.
    pub scale: ParamScale,
}

impl ParamDescriptor {
    /// Construct a linear descriptor.
    pub const fn new(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            scale: ParamScale::Linear,
        }
    }

    /// Sets the normalization scale (builder pattern).
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Clamps a value to this parameter's valid range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Converts a plain value to normalized range (0.0 to 1.0).
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || value <= 0.0 {
                    return 0.0;
                }
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
        }
    }

    /// Converts a normalized value (0.0 to 1.0) back to the plain range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min;
                }
                self.min * libm::powf(self.max / self.min, normalized)
            }
        }
    }
}

/// Trait for components that expose introspectable parameters.
///
/// Parameters are accessed by zero-based index, stable for the lifetime of
/// the instance. Out-of-bounds reads return `0.0`; out-of-bounds writes are
/// ignored — the parameter system probes ranges freely.
pub trait ParameterInfo {
    /// Returns the number of parameters this component exposes.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at the given index.
    ///
    /// Returns `None` if `index >= param_count()`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current value of the parameter at the given index.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the value of the parameter at the given index.
    ///
    /// Implementations clamp to the descriptor range.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name (case-insensitive, matches full or
    /// short name).
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name) || desc.short_name.eq_ignore_ascii_case(name)
            })
        })
    }
}

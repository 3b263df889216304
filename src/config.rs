use crate::rh_error::RhError;
use serde::{Deserialize, Serialize};

/// Tuning options for building samplers and writing transforms.
///
/// Missing fields in YAML input take their default values, so an options
/// document only needs to list what it changes.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy)]
#[serde(default)]
pub struct RuntimeOptions {
    /// Curves with more keys than this are partitioned into a fast sampler
    pub fast_sampler_threshold: usize,
    /// Length in seconds of each fast sampler segment
    pub segment_interval: f32,
    /// Parent world matrices whose 3x3 determinant, divided by the product
    /// of the column lengths, is smaller than this are treated as singular
    /// when writing a world matrix. The ratio does not depend on scale.
    pub singular_epsilon: f32,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            fast_sampler_threshold: 64,
            segment_interval: 1.0f32,
            singular_epsilon: 1.0e-6f32,
        }
    }
}

impl RuntimeOptions {
    /// Parses options from a YAML document
    ///
    /// # Errors
    /// May return `RhError`
    pub fn from_yaml(text: &str) -> Result<Self, RhError> {
        let options: Self = serde_yaml::from_str(text)?;
        if !(options.segment_interval.is_finite()
            && options.segment_interval > 0.0f32)
        {
            log::error!(
                "segment_interval {} is not usable",
                options.segment_interval
            );
            return Err(RhError::InvalidInterval);
        }
        Ok(options)
    }
}

pub mod interpolate;
pub mod property;
pub mod samplers;
pub mod types;
mod util;

// Re-exports
pub use {
    interpolate::Interpolate,
    property::AnimatableProperty,
    samplers::{
        ConvertibleCurve, Curve, CurveSampler, FastSampler, FixedSampler,
        LinearSampler, Sampler, SplineCurve,
    },
    types::{Interpolation, Keyframe, Segment},
};

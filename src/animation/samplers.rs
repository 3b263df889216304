//! Keyframe curve samplers
//!
//! `LinearSampler` is the general sampler for STEP and LINEAR curves of any
//! `Interpolate` value. `FixedSampler` holds a constant and `FastSampler`
//! partitions a long curve into independent segments so a lookup only
//! searches the keys near the offset. Stored curves use the `Sampler` enum so
//! the per frame sampling path is statically dispatched.

use super::{
    interpolate::Interpolate,
    types::{Interpolation, Keyframe},
    util,
};
use crate::{config::RuntimeOptions, rh_error::RhError};
use log::{debug, error};

/// Keyed values in time order
pub type Curve<T> = Vec<(f32, T)>;

/// Keyed values with incoming tangent, value and outgoing tangent
pub type SplineCurve<T> = Vec<(f32, (T, T, T))>;

/// Trait for something that can be evaluated at any time offset
pub trait CurveSampler<T> {
    /// 0 for piecewise constant, 1 for piecewise linear
    fn max_degree(&self) -> u32;

    /// Value at `offset` seconds. Offsets outside the curve clamp to the
    /// first or last key.
    fn get_point(&self, offset: f32) -> T;
}

/// Trait for samplers that can hand back their keys in a specific curve form.
///
/// A view is only available when it matches how the sampler interpolates,
/// so asking a STEP sampler for a linear curve is an error rather than a
/// silent conversion.
pub trait ConvertibleCurve<T> {
    /// # Errors
    /// Returns `RhError::NotStepCurve` unless the sampler is STEP
    fn to_step_curve(&self) -> Result<Curve<T>, RhError>;

    /// # Errors
    /// Returns `RhError::NotLinearCurve` unless the sampler is LINEAR
    fn to_linear_curve(&self) -> Result<Curve<T>, RhError>;

    /// # Errors
    /// Always returns `RhError::SplineUnsupported`
    fn to_spline_curve(&self) -> Result<SplineCurve<T>, RhError> {
        Err(RhError::SplineUnsupported)
    }
}

/// Sampler for STEP or LINEAR interpolation over a keyframe sequence
#[derive(Clone, Debug)]
pub struct LinearSampler<T> {
    keys: Vec<Keyframe<T>>,
    linear: bool,
}

impl<T: Interpolate> LinearSampler<T> {
    /// Creates a sampler, validating the sequence
    ///
    /// # Errors
    /// Returns `RhError` if the sequence is empty, is not sorted by time,
    /// contains arrays of different lengths, or if `interpolation` is
    /// `CubicSpline`
    pub fn new(
        keys: Vec<Keyframe<T>>,
        interpolation: Interpolation,
    ) -> Result<Self, RhError> {
        let linear = match interpolation {
            Interpolation::Step => false,
            Interpolation::Linear => true,
            Interpolation::CubicSpline => {
                error!("cubic spline curves can not be sampled");
                return Err(RhError::SplineUnsupported);
            }
        };
        let Some(first) = keys.first() else {
            error!("keyframe sequence is empty");
            return Err(RhError::EmptySequence);
        };
        if !util::is_sorted(&keys) {
            error!("keyframe times are not in ascending order");
            return Err(RhError::UnsortedKeys);
        }
        if let Some(expected) = first.data.array_len() {
            for key in &keys {
                let found = key.data.array_len().unwrap_or(0);
                if found != expected {
                    error!("key at time {} has {found} elements", key.time);
                    return Err(RhError::LengthMismatch { expected, found });
                }
            }
        }
        Ok(Self { keys, linear })
    }

    #[must_use]
    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    #[must_use]
    pub const fn interpolation(&self) -> Interpolation {
        if self.linear {
            Interpolation::Linear
        } else {
            Interpolation::Step
        }
    }

    /// Time of the last key
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.keys.last().map_or(0.0f32, |k| k.time)
    }

    /// Partitions the timeline into segments of `interval` seconds, each
    /// wrapped as an independent sampler of the same kind
    ///
    /// # Errors
    /// Returns `RhError::InvalidInterval` if `interval` is not a positive
    /// finite number
    pub fn to_fast_sampler(
        &self,
        interval: f32,
    ) -> Result<FastSampler<T>, RhError> {
        if !(interval.is_finite() && interval > 0.0f32) {
            return Err(RhError::InvalidInterval);
        }
        let start = self.keys.first().map_or(0.0f32, |k| k.time);
        let segments: Vec<Self> = util::split_by_interval(&self.keys, interval)
            .into_iter()
            .map(|keys| Self {
                keys,
                linear: self.linear,
            })
            .collect();
        debug!(
            "fast sampler for {} keys uses {} segments",
            self.keys.len(),
            segments.len()
        );
        Ok(FastSampler {
            start,
            interval,
            segments,
        })
    }

    fn keyed(&self) -> Curve<T> {
        self.keys.iter().map(|k| (k.time, k.data.clone())).collect()
    }
}

impl<T: Interpolate> CurveSampler<T> for LinearSampler<T> {
    fn max_degree(&self) -> u32 {
        u32::from(self.linear)
    }

    fn get_point(&self, offset: f32) -> T {
        // `new` guarantees at least one key
        let Some(segment) = util::find_pair(&self.keys, offset) else {
            unreachable!("sampler has no keys");
        };
        if self.linear {
            T::interpolate_linear(segment.a, segment.b, segment.amount)
        } else {
            segment.a.clone()
        }
    }
}

impl<T: Interpolate> ConvertibleCurve<T> for LinearSampler<T> {
    fn to_step_curve(&self) -> Result<Curve<T>, RhError> {
        if self.linear {
            return Err(RhError::NotStepCurve);
        }
        Ok(self.keyed())
    }

    fn to_linear_curve(&self) -> Result<Curve<T>, RhError> {
        if !self.linear {
            return Err(RhError::NotLinearCurve);
        }
        Ok(self.keyed())
    }
}

/// Sampler for a curve with a single key. The key time and interpolation
/// mode are kept so curve views match the sequence it was built from.
#[derive(Clone, Debug)]
pub struct FixedSampler<T> {
    time: f32,
    value: T,
    linear: bool,
}

impl<T: Clone> FixedSampler<T> {
    /// A STEP curve holding `value` from time 0
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            time: 0.0f32,
            value,
            linear: false,
        }
    }

    /// Time of the single key
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }
}

impl<T: Clone> CurveSampler<T> for FixedSampler<T> {
    fn max_degree(&self) -> u32 {
        u32::from(self.linear)
    }

    fn get_point(&self, _offset: f32) -> T {
        self.value.clone()
    }
}

impl<T: Clone> ConvertibleCurve<T> for FixedSampler<T> {
    fn to_step_curve(&self) -> Result<Curve<T>, RhError> {
        if self.linear {
            return Err(RhError::NotStepCurve);
        }
        Ok(vec![(self.time, self.value.clone())])
    }

    fn to_linear_curve(&self) -> Result<Curve<T>, RhError> {
        if !self.linear {
            return Err(RhError::NotLinearCurve);
        }
        Ok(vec![(self.time, self.value.clone())])
    }
}

/// A curve split into segments of equal duration. Each segment is a
/// complete sampler for its own time range.
#[derive(Clone, Debug)]
pub struct FastSampler<T> {
    start: f32,
    interval: f32,
    segments: Vec<LinearSampler<T>>,
}

impl<T> FastSampler<T> {
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn is_linear(&self) -> bool {
        self.segments.first().is_some_and(|s| s.linear)
    }
}

impl<T: Interpolate> FastSampler<T> {
    /// Original keys in order. Segments share their neighbouring keys, so
    /// each segment only contributes the keys routed to it.
    fn keyed(&self) -> Curve<T> {
        let count = self.segments.len();
        self.segments
            .iter()
            .enumerate()
            .flat_map(|(i, segment)| {
                segment.keys.iter().filter(move |k| {
                    util::segment_index(k.time, self.start, self.interval, count)
                        == i
                })
            })
            .map(|k| (k.time, k.data.clone()))
            .collect()
    }
}

impl<T: Interpolate> CurveSampler<T> for FastSampler<T> {
    fn max_degree(&self) -> u32 {
        u32::from(self.is_linear())
    }

    fn get_point(&self, offset: f32) -> T {
        let index = util::segment_index(
            offset,
            self.start,
            self.interval,
            self.segments.len(),
        );
        self.segments[index].get_point(offset)
    }
}

impl<T: Interpolate> ConvertibleCurve<T> for FastSampler<T> {
    fn to_step_curve(&self) -> Result<Curve<T>, RhError> {
        if self.is_linear() {
            return Err(RhError::NotStepCurve);
        }
        Ok(self.keyed())
    }

    fn to_linear_curve(&self) -> Result<Curve<T>, RhError> {
        if !self.is_linear() {
            return Err(RhError::NotLinearCurve);
        }
        Ok(self.keyed())
    }
}

/// Stored curve of any supported kind
#[derive(Clone, Debug)]
pub enum Sampler<T> {
    Fixed(FixedSampler<T>),
    Linear(LinearSampler<T>),
    Fast(FastSampler<T>),
}

impl<T: Interpolate> Sampler<T> {
    /// Builds the cheapest sampler for a sequence. One key gives a
    /// `FixedSampler`, more keys than `options.fast_sampler_threshold` give
    /// a `FastSampler`.
    ///
    /// # Errors
    /// Returns `RhError` if the sequence is not valid for `LinearSampler`
    pub fn from_keys(
        keys: Vec<Keyframe<T>>,
        interpolation: Interpolation,
        options: &RuntimeOptions,
    ) -> Result<Self, RhError> {
        let sampler = LinearSampler::new(keys, interpolation)?;
        if let [key] = sampler.keys.as_slice() {
            return Ok(Self::Fixed(FixedSampler {
                time: key.time,
                value: key.data.clone(),
                linear: sampler.linear,
            }));
        }
        if sampler.keys.len() > options.fast_sampler_threshold {
            return Ok(Self::Fast(
                sampler.to_fast_sampler(options.segment_interval)?,
            ));
        }
        Ok(Self::Linear(sampler))
    }
}

impl<T: Interpolate> CurveSampler<T> for Sampler<T> {
    fn max_degree(&self) -> u32 {
        match self {
            Self::Fixed(s) => s.max_degree(),
            Self::Linear(s) => s.max_degree(),
            Self::Fast(s) => s.max_degree(),
        }
    }

    fn get_point(&self, offset: f32) -> T {
        match self {
            Self::Fixed(s) => s.get_point(offset),
            Self::Linear(s) => s.get_point(offset),
            Self::Fast(s) => s.get_point(offset),
        }
    }
}

impl<T: Interpolate> ConvertibleCurve<T> for Sampler<T> {
    fn to_step_curve(&self) -> Result<Curve<T>, RhError> {
        match self {
            Self::Fixed(s) => s.to_step_curve(),
            Self::Linear(s) => s.to_step_curve(),
            Self::Fast(s) => s.to_step_curve(),
        }
    }

    fn to_linear_curve(&self) -> Result<Curve<T>, RhError> {
        match self {
            Self::Fixed(s) => s.to_linear_curve(),
            Self::Linear(s) => s.to_linear_curve(),
            Self::Fast(s) => s.to_linear_curve(),
        }
    }
}

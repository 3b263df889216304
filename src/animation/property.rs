use super::{
    interpolate::Interpolate,
    samplers::{CurveSampler, Sampler},
    types::{Interpolation, Keyframe},
};
use crate::{config::RuntimeOptions, rh_error::RhError};
use ahash::{HashMap, HashMapExt};

/// A value with an optional curve per animation track.
///
/// Tracks are keyed by their logical index. Sampling a track that has no
/// curve, or sampling with no track at all, gives the static value.
#[derive(Clone, Debug)]
pub struct AnimatableProperty<T> {
    value: T,
    curves: HashMap<usize, Sampler<T>>,
}

impl<T: Interpolate> AnimatableProperty<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            curves: HashMap::new(),
        }
    }

    /// The static value
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }

    #[must_use]
    pub fn is_animated(&self) -> bool {
        !self.curves.is_empty()
    }

    /// Creates and stores the curve for a track, replacing any existing one
    ///
    /// # Errors
    /// May return `RhError` if the keyframes are not valid
    pub fn set_curve(
        &mut self,
        track: usize,
        keys: Vec<Keyframe<T>>,
        interpolation: Interpolation,
        options: &RuntimeOptions,
    ) -> Result<(), RhError> {
        let sampler = Sampler::from_keys(keys, interpolation, options)?;
        self.curves.insert(track, sampler);
        Ok(())
    }

    pub fn set_sampler(&mut self, track: usize, sampler: Sampler<T>) {
        self.curves.insert(track, sampler);
    }

    #[must_use]
    pub fn curve(&self, track: usize) -> Option<&Sampler<T>> {
        self.curves.get(&track)
    }

    /// Samples a track, falling back to the static value
    #[must_use]
    pub fn value_at(&self, track: Option<usize>, time: f32) -> T {
        track
            .and_then(|t| self.curves.get(&t))
            .map_or_else(|| self.value.clone(), |s| s.get_point(time))
    }
}

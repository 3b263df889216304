use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Interpolation {
    Linear,
    Step,
    CubicSpline,
}

/// A value at a point in time, in seconds
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframe<T> {
    pub time: f32,
    pub data: T,
}

impl<T> Keyframe<T> {
    #[must_use]
    pub const fn new(time: f32, data: T) -> Self {
        Self { time, data }
    }
}

impl<T> From<(f32, T)> for Keyframe<T> {
    fn from((time, data): (f32, T)) -> Self {
        Self { time, data }
    }
}

/// Bracketing values for an offset plus the interpolation parameter between
/// them. At either end of a sequence `a` and `b` are the same key and
/// `amount` is 0.
#[derive(Debug)]
pub struct Segment<'a, T> {
    pub a: &'a T,
    pub b: &'a T,
    pub amount: f32,
}

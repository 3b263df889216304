use crate::morph::SparseWeight8;
use nalgebra::UnitQuaternion;
use nalgebra_glm as glm;

/// Value types that a curve sampler can blend between keyframes
pub trait Interpolate: Clone {
    /// Returns `a` at `amount` 0 and `b` at `amount` 1
    #[must_use]
    fn interpolate_linear(a: &Self, b: &Self, amount: f32) -> Self;

    /// Element count for variable length values. Every key in a sequence
    /// must report the same count.
    fn array_len(&self) -> Option<usize> {
        None
    }
}

impl Interpolate for glm::Vec3 {
    fn interpolate_linear(a: &Self, b: &Self, amount: f32) -> Self {
        glm::lerp(a, b, amount)
    }
}

/// Spherical interpolation along the shortest arc with a unit result
impl Interpolate for glm::Quat {
    fn interpolate_linear(a: &Self, b: &Self, amount: f32) -> Self {
        let q1 = UnitQuaternion::new_normalize(*a);
        let q2 = UnitQuaternion::new_normalize(*b);
        q1.try_slerp(&q2, amount, f32::EPSILON).map_or_else(
            // Only reachable for degenerate input, so fall back to a
            // normalized linear blend
            || {
                let q = q1.into_inner() * (1.0f32 - amount)
                    + q2.into_inner() * amount;
                glm::quat_normalize(&q)
            },
            UnitQuaternion::into_inner,
        )
    }
}

impl Interpolate for SparseWeight8 {
    fn interpolate_linear(a: &Self, b: &Self, amount: f32) -> Self {
        Self::interpolate_linear(a, b, amount)
    }
}

/// Per element interpolation. Samplers reject sequences with arrays of
/// different lengths, so both arrays always match here.
impl Interpolate for Vec<f32> {
    fn interpolate_linear(a: &Self, b: &Self, amount: f32) -> Self {
        debug_assert_eq!(a.len(), b.len());
        a.iter()
            .zip(b)
            .map(|(x, y)| (y - x).mul_add(amount, *x))
            .collect()
    }

    fn array_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

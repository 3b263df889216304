use crate::types::MAX_MORPH_WEIGHTS;
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Scratch storage while merging two or more weight sets
type Scratch = SmallVec<[(usize, f32); MAX_MORPH_WEIGHTS * 2]>;

/// Sparse morph target weights
///
/// Holds at most `MAX_MORPH_WEIGHTS` nonzero `(index, weight)` pairs sorted by
/// index. When more pairs are supplied only the ones with the largest
/// magnitude are kept. Indices not present have a weight of 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseWeight8 {
    pairs: SmallVec<[(usize, f32); MAX_MORPH_WEIGHTS]>,
}

impl SparseWeight8 {
    /// Creates weights from `(index, weight)` pairs. Repeated indices are
    /// summed and zero weights are dropped.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, f32)>,
    {
        let mut merged = Scratch::new();
        for (index, weight) in pairs {
            if let Some(existing) =
                merged.iter_mut().find(|(i, _)| *i == index)
            {
                existing.1 += weight;
            } else {
                merged.push((index, weight));
            }
        }
        merged.retain(|(_, w)| *w != 0.0f32);

        if merged.len() > MAX_MORPH_WEIGHTS {
            // Largest magnitudes first. NaNs compare equal and end up
            // wherever the sort leaves them.
            merged.sort_by(|a, b| {
                b.1.abs().partial_cmp(&a.1.abs()).unwrap_or(Ordering::Equal)
            });
            merged.truncate(MAX_MORPH_WEIGHTS);
        }
        merged.sort_unstable_by_key(|(i, _)| *i);

        Self {
            pairs: merged.into_iter().collect(),
        }
    }

    /// Creates weights from a dense slice where the slice position is the
    /// morph target index
    #[must_use]
    pub fn from_dense(weights: &[f32]) -> Self {
        Self::from_pairs(weights.iter().copied().enumerate())
    }

    /// Weight of a morph target, 0 if not present
    #[must_use]
    pub fn weight(&self, index: usize) -> f32 {
        self.pairs
            .iter()
            .find(|(i, _)| *i == index)
            .map_or(0.0f32, |(_, w)| *w)
    }

    /// Iterates the nonzero `(index, weight)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.pairs.iter().copied()
    }

    /// Number of nonzero weights
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// True if applying these weights would leave the base mesh unchanged
    #[must_use]
    pub fn is_weightless(&self) -> bool {
        self.pairs.iter().all(|(_, w)| *w == 0.0f32)
    }

    /// Expands into a dense vector of `count` weights. Indices at or beyond
    /// `count` are ignored.
    #[must_use]
    pub fn to_dense(&self, count: usize) -> Vec<f32> {
        let mut ret = vec![0.0f32; count];
        for (index, weight) in self.iter() {
            if let Some(x) = ret.get_mut(index) {
                *x = weight;
            }
        }
        ret
    }

    /// Linear blend `a * (1 - amount) + b * amount` over the union of both
    /// index sets
    #[must_use]
    pub fn interpolate_linear(a: &Self, b: &Self, amount: f32) -> Self {
        let inv = 1.0f32 - amount;
        Self::from_pairs(
            a.iter()
                .map(|(i, w)| (i, w * inv))
                .chain(b.iter().map(|(i, w)| (i, w * amount))),
        )
    }

    /// Weighted sum of several weight sets
    #[must_use]
    pub fn blend(items: &[(Self, f32)]) -> Self {
        Self::from_pairs(items.iter().flat_map(|(weights, factor)| {
            weights.iter().map(move |(i, w)| (i, w * factor))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::SparseWeight8;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn keeps_largest() {
        let dense = [0.1, 0.9, 0.2, 0.8, 0.3, 0.7, 0.4, 0.6, 0.5, 0.05];
        let w = SparseWeight8::from_dense(&dense);
        assert_eq!(w.len(), 8);
        assert!(w.weight(9).abs() < EPSILON);
        assert!(w.weight(0).abs() < EPSILON);
        assert!((w.weight(1) - 0.9).abs() < EPSILON);

        // Sorted by index
        let indices: Vec<usize> = w.iter().map(|(i, _)| i).collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn interpolate_union() {
        let a = SparseWeight8::from_pairs([(0, 1.0), (3, 0.5)]);
        let b = SparseWeight8::from_pairs([(3, 1.0), (5, 1.0)]);
        let c = SparseWeight8::interpolate_linear(&a, &b, 0.5);
        assert!((c.weight(0) - 0.5).abs() < EPSILON);
        assert!((c.weight(3) - 0.75).abs() < EPSILON);
        assert!((c.weight(5) - 0.5).abs() < EPSILON);
        assert!(c.weight(1).abs() < EPSILON);
    }

    #[test]
    fn blend_and_dense() {
        let a = SparseWeight8::from_pairs([(1, 1.0)]);
        let b = SparseWeight8::from_pairs([(2, 1.0)]);
        let c = SparseWeight8::blend(&[(a, 0.25), (b, 0.75)]);
        let dense = c.to_dense(4);
        assert_eq!(dense.len(), 4);
        assert!((dense[1] - 0.25).abs() < EPSILON);
        assert!((dense[2] - 0.75).abs() < EPSILON);
        assert!(SparseWeight8::default().is_weightless());
        assert!(!c.is_weightless());
    }
}

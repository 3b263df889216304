use super::types::{Keyframe, Segment};
use itertools::Itertools;

/// Helper to calculate the parameter used for interpolation
fn weight(start: f32, end: f32, current: f32) -> f32 {
    ((current - start) / (end - start).max(f32::EPSILON)).clamp(0.0f32, 1.0f32)
}

/// True if keyframe times never decrease. NaN times fail the check.
pub fn is_sorted<T>(keys: &[Keyframe<T>]) -> bool {
    keys.iter().tuple_windows().all(|(a, b)| a.time <= b.time)
}

/// Finds the keys bracketing `offset`.
///
/// `a` is the last key at or before the offset and `b` the first key after
/// it. Offsets outside the sequence clamp to the nearest end. Returns `None`
/// for an empty sequence.
pub fn find_pair<T>(keys: &[Keyframe<T>], offset: f32) -> Option<Segment<T>> {
    // Index of the first key after the offset. Keys are sorted so a binary
    // search works. A NaN offset compares false and lands on the first key.
    let after = keys.partition_point(|k| k.time <= offset);
    if after == 0 {
        let first = keys.first()?;
        return Some(Segment {
            a: &first.data,
            b: &first.data,
            amount: 0.0f32,
        });
    }
    let before = &keys[after - 1];
    let Some(next) = keys.get(after) else {
        // Past the end
        return Some(Segment {
            a: &before.data,
            b: &before.data,
            amount: 0.0f32,
        });
    };
    Some(Segment {
        a: &before.data,
        b: &next.data,
        amount: weight(before.time, next.time, offset),
    })
}

/// Index of the partition segment covering `offset`, clamped to
/// `0..count`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn segment_index(offset: f32, start: f32, interval: f32, count: usize) -> usize {
    let x = ((offset - start) / interval).floor();
    if x.is_nan() || x <= 0.0f32 {
        0
    } else {
        // Float to int casts saturate
        (x as usize).min(count.saturating_sub(1))
    }
}

/// Number of segments needed to cover a sequence
pub fn segment_count<T>(keys: &[Keyframe<T>], interval: f32) -> usize {
    match (keys.first(), keys.last()) {
        (Some(first), Some(last)) => {
            segment_index(last.time, first.time, interval, usize::MAX) + 1
        }
        _ => 0,
    }
}

/// Splits a sorted sequence into one sub-sequence per `interval` seconds,
/// starting at the first key.
///
/// Each sub-sequence holds the keys routed to it by `segment_index` plus the
/// closest key on either side, so sampling a sub-sequence anywhere in its
/// range gives the same result as sampling the whole sequence.
pub fn split_by_interval<T: Clone>(
    keys: &[Keyframe<T>],
    interval: f32,
) -> Vec<Vec<Keyframe<T>>> {
    let Some(first) = keys.first() else {
        return Vec::new();
    };
    let start = first.time;
    let count = segment_count(keys, interval);
    let seg = |k: &Keyframe<T>| segment_index(k.time, start, interval, count);

    (0..count)
        .map(|i| {
            let lo = keys.partition_point(|k| seg(k) < i).saturating_sub(1);
            let hi = (keys.partition_point(|k| seg(k) <= i) + 1).min(keys.len());
            keys[lo..hi].to_vec()
        })
        .collect()
}

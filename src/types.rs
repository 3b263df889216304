/// One entry of a multi-track blend: sample `track` at `time` and weigh the
/// result by `weight`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackBlend {
    pub track: usize,
    pub time: f32,
    pub weight: f32,
}

impl TrackBlend {
    #[must_use]
    pub const fn new(track: usize, time: f32, weight: f32) -> Self {
        Self {
            track,
            time,
            weight,
        }
    }
}

/// Maximum number of nonzero morph target weights carried by a
/// `SparseWeight8`
pub const MAX_MORPH_WEIGHTS: usize = 8;

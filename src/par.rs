//! Updates many scene instances at once. With the "rayon" feature enabled
//! the instances are updated in parallel, otherwise one after another.

use crate::{scene::SceneInstance, types::TrackBlend};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Poses every instance from the same track at the same time
pub fn set_animation_frames(
    instances: &mut [SceneInstance],
    track: usize,
    time: f32,
    looped: bool,
) {
    #[cfg(feature = "rayon")]
    let it = instances.par_iter_mut();
    #[cfg(not(feature = "rayon"))]
    let it = instances.iter_mut();
    it.for_each(|instance| instance.set_animation_frame(track, time, looped));
}

/// Applies the same blend to every instance
pub fn set_blended_frames(instances: &mut [SceneInstance], blend: &[TrackBlend]) {
    #[cfg(feature = "rayon")]
    let it = instances.par_iter_mut();
    #[cfg(not(feature = "rayon"))]
    let it = instances.iter_mut();
    it.for_each(|instance| instance.set_blended_animation_frame(blend));
}

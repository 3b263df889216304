use super::node_template::NodeTemplate;
use crate::{morph::SparseWeight8, types::TrackBlend};
use nalgebra_glm as glm;

/// World matrix cached together with the generation of the parent's world
/// matrix it was built from
#[derive(Clone, Copy, Debug)]
struct WorldCache {
    matrix: glm::Mat4,
    parent_generation: u64,
}

/// Mutable runtime state of one node.
///
/// Nodes live in the flat array of a `NodeGraph` and refer to their parent
/// by index into that array. The world matrix is cached lazily. Writing the
/// local matrix drops only this node's cache, and descendants notice the
/// change when they are read because the parent's generation has moved on.
#[derive(Clone, Debug)]
pub struct NodeInstance {
    index: usize,
    parent: Option<usize>,
    local_matrix: glm::Mat4,
    world: Option<WorldCache>,
    generation: u64,
    morph_weights: SparseWeight8,
}

impl NodeInstance {
    pub(crate) fn new(index: usize, parent: Option<usize>) -> Self {
        Self {
            index,
            parent,
            local_matrix: glm::Mat4::identity(),
            world: None,
            generation: 0,
            morph_weights: SparseWeight8::default(),
        }
    }

    /// Logical index, which is also the index of the node's template
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Index of the parent node, `None` for a root
    #[must_use]
    pub const fn parent(&self) -> Option<usize> {
        self.parent
    }

    #[must_use]
    pub const fn local_matrix(&self) -> &glm::Mat4 {
        &self.local_matrix
    }

    pub fn set_local_matrix(&mut self, matrix: glm::Mat4) {
        self.local_matrix = matrix;
        self.world = None;
    }

    #[must_use]
    pub const fn morph_weights(&self) -> &SparseWeight8 {
        &self.morph_weights
    }

    pub fn set_morph_weights(&mut self, weights: SparseWeight8) {
        self.morph_weights = weights;
    }

    /// True if this node has a world matrix cached. The cache may still be
    /// stale if an ancestor changed since it was filled.
    #[must_use]
    pub const fn has_cached_world(&self) -> bool {
        self.world.is_some()
    }

    /// Counts how many times the world matrix has been recomputed
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the world matrix, recomputing it when there is no cache or the
    /// cache was built from an older parent world matrix. `parent` holds the
    /// parent's current world matrix and generation.
    pub(crate) fn refresh_world(
        &mut self,
        parent: Option<(glm::Mat4, u64)>,
    ) -> glm::Mat4 {
        let parent_generation = parent.map_or(0, |(_, g)| g);
        if let Some(cache) = &self.world {
            if cache.parent_generation == parent_generation {
                return cache.matrix;
            }
        }
        let matrix = parent.map_or(self.local_matrix, |(parent_world, _)| {
            parent_world * self.local_matrix
        });
        self.generation += 1;
        self.world = Some(WorldCache {
            matrix,
            parent_generation,
        });
        matrix
    }

    /// Applies a track at a time from the template. A `track` of `None`
    /// applies the static pose.
    pub fn set_animation_frame(
        &mut self,
        template: &NodeTemplate,
        track: Option<usize>,
        time: f32,
    ) {
        self.morph_weights = template.morph_weights(track, time);
        self.set_local_matrix(template.local_matrix(track, time));
    }

    pub fn set_pose_transform(&mut self, template: &NodeTemplate) {
        self.set_animation_frame(template, None, 0.0f32);
    }

    /// Applies a blend of several tracks. Weights are expected to be
    /// normalized already.
    pub fn set_blended_frame(
        &mut self,
        template: &NodeTemplate,
        blend: &[TrackBlend],
    ) {
        self.morph_weights = template.blended_morph_weights(blend);
        self.set_local_matrix(template.blended_local_matrix(blend));
    }
}

use crate::{
    animation::AnimatableProperty, morph::SparseWeight8, transform::Transform,
    types::TrackBlend,
};
use nalgebra_glm as glm;
use smallvec::SmallVec;

/// Immutable description of one node: where it sits in the hierarchy, its
/// static transform and the curves that animate it.
///
/// Templates are created by an importer and then shared by every scene
/// instance built from them. The curve accessors ending in `_mut` are only
/// meant for that construction step.
#[derive(Clone, Debug)]
pub struct NodeTemplate {
    name: String,
    parent: Option<usize>,
    scale: AnimatableProperty<glm::Vec3>,
    rotation: AnimatableProperty<glm::Quat>,
    translation: AnimatableProperty<glm::Vec3>,
    morphing: AnimatableProperty<SparseWeight8>,
}

impl NodeTemplate {
    /// Creates a template. `parent` must be lower than the index this
    /// template will have in its scene, which is checked when a scene is
    /// built.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        parent: Option<usize>,
        local_transform: Transform,
    ) -> Self {
        Self {
            name: name.into(),
            parent,
            scale: AnimatableProperty::new(local_transform.scale),
            rotation: AnimatableProperty::new(local_transform.rotation),
            translation: AnimatableProperty::new(local_transform.translation),
            morphing: AnimatableProperty::new(SparseWeight8::default()),
        }
    }

    /// Sets the static morph weights
    #[must_use]
    pub fn with_morph_weights(mut self, weights: SparseWeight8) -> Self {
        self.morphing.set_value(weights);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// The static transform
    #[must_use]
    pub fn default_transform(&self) -> Transform {
        Transform::new(
            *self.scale.value(),
            *self.rotation.value(),
            *self.translation.value(),
        )
    }

    /// True if any component has a curve for any track
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.scale.is_animated()
            || self.rotation.is_animated()
            || self.translation.is_animated()
            || self.morphing.is_animated()
    }

    pub fn scale_mut(&mut self) -> &mut AnimatableProperty<glm::Vec3> {
        &mut self.scale
    }

    pub fn rotation_mut(&mut self) -> &mut AnimatableProperty<glm::Quat> {
        &mut self.rotation
    }

    pub fn translation_mut(&mut self) -> &mut AnimatableProperty<glm::Vec3> {
        &mut self.translation
    }

    pub fn morphing_mut(&mut self) -> &mut AnimatableProperty<SparseWeight8> {
        &mut self.morphing
    }

    /// Transform for a track at a time. Components without a curve for the
    /// track keep their static value.
    #[must_use]
    pub fn local_transform(&self, track: Option<usize>, time: f32) -> Transform {
        Transform::new(
            self.scale.value_at(track, time),
            self.rotation.value_at(track, time),
            self.translation.value_at(track, time),
        )
    }

    /// Local matrix for a track at a time. `None` means no animation, which
    /// gives the static matrix.
    #[must_use]
    pub fn local_matrix(&self, track: Option<usize>, time: f32) -> glm::Mat4 {
        if track.is_none() || !self.is_animated() {
            return self.default_transform().to_mat4();
        }
        self.local_transform(track, time).to_mat4()
    }

    #[must_use]
    pub fn morph_weights(&self, track: Option<usize>, time: f32) -> SparseWeight8 {
        self.morphing.value_at(track, time)
    }

    /// Local matrix blended from several tracks. The weights are used as
    /// given, so callers normalize them first. An empty blend gives the
    /// static matrix.
    #[must_use]
    pub fn blended_local_matrix(&self, blend: &[TrackBlend]) -> glm::Mat4 {
        if blend.is_empty() || !self.is_animated() {
            return self.default_transform().to_mat4();
        }
        let samples: SmallVec<[(Transform, f32); 4]> = blend
            .iter()
            .map(|b| (self.local_transform(Some(b.track), b.time), b.weight))
            .collect();
        Transform::blend(&samples).to_mat4()
    }

    /// Morph weights blended from several tracks
    #[must_use]
    pub fn blended_morph_weights(&self, blend: &[TrackBlend]) -> SparseWeight8 {
        if blend.is_empty() || !self.morphing.is_animated() {
            return self.morphing.value().clone();
        }
        let samples: SmallVec<[(SparseWeight8, f32); 4]> = blend
            .iter()
            .map(|b| (self.morphing.value_at(Some(b.track), b.time), b.weight))
            .collect();
        SparseWeight8::blend(&samples)
    }
}

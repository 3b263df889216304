use super::{
    drawable::{DrawableReference, GeometryTransform},
    graph::{validate_hierarchy, NodeGraph},
    node_instance::NodeInstance,
    node_template::NodeTemplate,
    tracks::AnimationTracks,
};
use crate::{config::RuntimeOptions, rh_error::RhError, types::TrackBlend};
use log::{debug, error, warn};
use nalgebra_glm as glm;
use smallvec::SmallVec;
use std::sync::Arc;

/// Scales blend weights so they sum to 1. If the weights sum to exactly zero,
/// or the sum is not finite, every entry gets the same weight instead.
#[must_use]
pub fn normalize_blend(blend: &[TrackBlend]) -> SmallVec<[TrackBlend; 4]> {
    let total: f32 = blend.iter().map(|b| b.weight).sum();
    #[allow(clippy::cast_precision_loss)]
    let (scale, fixed) = if total == 0.0f32 || !total.is_finite() {
        if !blend.is_empty() {
            warn!("blend weights sum to {total}, using equal weights");
        }
        (1.0f32, Some(1.0f32 / blend.len().max(1) as f32))
    } else {
        (total.recip(), None)
    };
    blend
        .iter()
        .map(|b| TrackBlend {
            weight: fixed.unwrap_or(b.weight * scale),
            ..*b
        })
        .collect()
}

/// Checks that every node referenced by a drawable exists
pub(crate) fn validate_drawables(
    drawables: &[DrawableReference],
    node_count: usize,
) -> Result<(), RhError> {
    for (i, drawable) in drawables.iter().enumerate() {
        let node = drawable.max_node_index();
        if node >= node_count {
            error!(
                "drawable {} refers to node {} but there are only {} nodes",
                i, node, node_count
            );
            return Err(RhError::InvalidNodeIndex(node));
        }
    }
    Ok(())
}

/// One posable copy of a scene.
///
/// Node templates, drawable references and track names are shared with
/// every other instance made from the same data. Everything that changes
/// per frame is owned here.
#[derive(Clone, Debug)]
pub struct SceneInstance {
    graph: NodeGraph,
    drawables: Arc<[DrawableReference]>,
    transforms: Vec<GeometryTransform>,
    tracks: Arc<AnimationTracks>,
}

impl SceneInstance {
    /// Creates an instance in the static pose
    ///
    /// # Errors
    /// Returns `RhError::InvalidParentIndex` if a node's parent does not
    /// come before it, or `RhError::InvalidNodeIndex` if a drawable refers
    /// to a missing node. Nothing is created in either case.
    pub fn new(
        templates: Arc<[NodeTemplate]>,
        drawables: Arc<[DrawableReference]>,
        tracks: Arc<AnimationTracks>,
        options: &RuntimeOptions,
    ) -> Result<Self, RhError> {
        validate_hierarchy(&templates)?;
        validate_drawables(&drawables, templates.len())?;
        Ok(Self::from_validated(templates, drawables, tracks, options))
    }

    pub(crate) fn from_validated(
        templates: Arc<[NodeTemplate]>,
        drawables: Arc<[DrawableReference]>,
        tracks: Arc<AnimationTracks>,
        options: &RuntimeOptions,
    ) -> Self {
        let graph = NodeGraph::from_validated(templates, options.singular_epsilon);
        let transforms = drawables
            .iter()
            .map(DrawableReference::create_geometry_transform)
            .collect();
        debug!(
            "scene instance created with {} nodes, {} drawables, {} tracks",
            graph.len(),
            drawables.len(),
            tracks.len()
        );
        Self {
            graph,
            drawables,
            transforms,
            tracks,
        }
    }

    #[must_use]
    pub const fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// All nodes in logical order
    #[must_use]
    pub fn logical_nodes(&self) -> &[NodeInstance] {
        self.graph.nodes()
    }

    /// Root nodes, from which the rest of the hierarchy can be reached
    pub fn visual_nodes(&self) -> impl Iterator<Item = &NodeInstance> {
        self.graph.roots()
    }

    #[must_use]
    pub fn node(&self, index: usize) -> Option<&NodeInstance> {
        self.graph.node(index)
    }

    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<usize> {
        self.graph.find(name)
    }

    #[must_use]
    pub fn local_matrix(&self, index: usize) -> Option<&glm::Mat4> {
        self.graph.node(index).map(NodeInstance::local_matrix)
    }

    /// World matrix of a node, or `None` if the index is out of range.
    /// Takes `&mut self` because stale cached matrices are refreshed.
    pub fn world_matrix(&mut self, index: usize) -> Option<glm::Mat4> {
        self.graph.world_matrix(index)
    }

    /// # Errors
    /// Returns `RhError::InvalidNodeIndex` if the index is out of range
    pub fn set_local_matrix(
        &mut self,
        index: usize,
        matrix: glm::Mat4,
    ) -> Result<(), RhError> {
        self.graph.set_local_matrix(index, matrix)
    }

    /// # Errors
    /// Returns `RhError::InvalidNodeIndex` if the index is out of range or
    /// `RhError::SingularMatrix` if the parent's world matrix can not be
    /// inverted
    pub fn set_world_matrix(
        &mut self,
        index: usize,
        matrix: glm::Mat4,
    ) -> Result<(), RhError> {
        self.graph.set_world_matrix(index, matrix)
    }

    /// Sets the local matrix of the first node called `name`. Does nothing
    /// if there is no such node.
    pub fn set_local_matrix_by_name(&mut self, name: &str, matrix: glm::Mat4) {
        let node = self.graph.find(name).and_then(|i| self.graph.node_mut(i));
        let Some(node) = node else {
            debug!("set_local_matrix_by_name: no node named \"{name}\"");
            return;
        };
        node.set_local_matrix(matrix);
    }

    /// Sets the world matrix of the first node called `name`. Does nothing
    /// if there is no such node.
    ///
    /// # Errors
    /// Returns `RhError::SingularMatrix` if the node's parent world matrix
    /// can not be inverted
    pub fn set_world_matrix_by_name(
        &mut self,
        name: &str,
        matrix: glm::Mat4,
    ) -> Result<(), RhError> {
        let Some(index) = self.graph.find(name) else {
            debug!("set_world_matrix_by_name: no node named \"{name}\"");
            return Ok(());
        };
        self.graph.set_world_matrix(index, matrix)
    }

    #[must_use]
    pub fn animation_tracks(&self) -> &AnimationTracks {
        &self.tracks
    }

    /// Duration of a track in seconds, 0 if the index is out of range
    #[must_use]
    pub fn animation_duration(&self, index: usize) -> f32 {
        self.tracks.duration(index)
    }

    #[must_use]
    pub fn animation_duration_by_name(&self, name: &str) -> f32 {
        self.tracks.duration_by_name(name)
    }

    /// Puts every node in its static pose
    pub fn set_pose_transforms(&mut self) {
        self.graph.set_pose_transforms();
    }

    /// Poses every node from one track. With `looped` the time wraps
    /// around the track's duration.
    pub fn set_animation_frame(&mut self, track: usize, time: f32, looped: bool) {
        let time = self.track_time(track, time, looped);
        self.graph.set_animation_frame(Some(track), time);
    }

    /// Poses every node from the track called `name`. An unknown name gives
    /// the static pose.
    pub fn set_animation_frame_by_name(
        &mut self,
        name: &str,
        time: f32,
        looped: bool,
    ) {
        match self.tracks.index_of(name) {
            Some(track) => self.set_animation_frame(track, time, looped),
            None => {
                warn!("no animation track named \"{name}\", using static pose");
                self.graph.set_animation_frame(None, time);
            }
        }
    }

    /// Poses every node from a weighted mix of tracks. Weights are
    /// normalized first. An empty blend gives the static pose.
    pub fn set_blended_animation_frame(&mut self, blend: &[TrackBlend]) {
        if blend.is_empty() {
            self.graph.set_pose_transforms();
            return;
        }
        let normalized = normalize_blend(blend);
        self.graph.set_blended_frame(&normalized);
    }

    fn track_time(&self, track: usize, time: f32, looped: bool) -> f32 {
        let duration = self.tracks.duration(track);
        if looped && duration > 0.0f32 {
            time % duration
        } else {
            time
        }
    }

    #[must_use]
    pub fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    /// Brings the geometry transform of one drawable up to date and returns
    /// it with the drawable's mesh index
    pub fn drawable(
        &mut self,
        index: usize,
    ) -> Option<(usize, &GeometryTransform)> {
        let drawable = self.drawables.get(index)?;
        let xform = &mut self.transforms[index];
        drawable.update_geometry_transform(xform, &mut self.graph);
        Some((drawable.mesh_index(), &self.transforms[index]))
    }

    /// Brings every geometry transform up to date. Items are
    /// `(mesh_index, transform)` in drawable order.
    pub fn drawables(
        &mut self,
    ) -> impl Iterator<Item = (usize, &GeometryTransform)> {
        for (drawable, xform) in
            self.drawables.iter().zip(self.transforms.iter_mut())
        {
            drawable.update_geometry_transform(xform, &mut self.graph);
        }
        self.drawables
            .iter()
            .map(DrawableReference::mesh_index)
            .zip(self.transforms.iter())
    }
}

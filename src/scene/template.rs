use super::{
    drawable::DrawableReference,
    graph::validate_hierarchy,
    instance::{validate_drawables, SceneInstance},
    node_template::NodeTemplate,
    tracks::AnimationTracks,
};
use crate::{config::RuntimeOptions, rh_error::RhError};
use log::info;
use std::sync::Arc;

/// Immutable scene data from which any number of independent
/// `SceneInstance`s can be created cheaply
#[derive(Clone, Debug)]
pub struct SceneTemplate {
    nodes: Arc<[NodeTemplate]>,
    drawables: Arc<[DrawableReference]>,
    tracks: Arc<AnimationTracks>,
    options: RuntimeOptions,
}

impl SceneTemplate {
    /// # Errors
    /// Returns `RhError::InvalidParentIndex` or `RhError::InvalidNodeIndex`
    /// if the nodes or drawables are malformed
    pub fn new(
        nodes: Vec<NodeTemplate>,
        drawables: Vec<DrawableReference>,
        tracks: AnimationTracks,
        options: RuntimeOptions,
    ) -> Result<Self, RhError> {
        validate_hierarchy(&nodes)?;
        validate_drawables(&drawables, nodes.len())?;
        info!(
            "scene template with {} nodes, {} drawables, {} animation tracks",
            nodes.len(),
            drawables.len(),
            tracks.len()
        );
        Ok(Self {
            nodes: nodes.into(),
            drawables: drawables.into(),
            tracks: Arc::new(tracks),
            options,
        })
    }

    /// New instance in the static pose
    #[must_use]
    pub fn create_instance(&self) -> SceneInstance {
        SceneInstance::from_validated(
            Arc::clone(&self.nodes),
            Arc::clone(&self.drawables),
            Arc::clone(&self.tracks),
            &self.options,
        )
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeTemplate] {
        &self.nodes
    }

    #[must_use]
    pub fn drawables(&self) -> &[DrawableReference] {
        &self.drawables
    }

    #[must_use]
    pub fn animation_tracks(&self) -> &AnimationTracks {
        &self.tracks
    }

    #[must_use]
    pub const fn options(&self) -> &RuntimeOptions {
        &self.options
    }
}

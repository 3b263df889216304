use super::{node_instance::NodeInstance, node_template::NodeTemplate};
use crate::{rh_error::RhError, types::TrackBlend};
use log::{debug, error};
use nalgebra_glm as glm;
use smallvec::SmallVec;
use std::sync::Arc;

/// Checks that every parent index is lower than the index of its child.
/// Parents therefore always come before children and the hierarchy can not
/// contain cycles.
///
/// # Errors
/// Returns `RhError::InvalidParentIndex` for the first node that breaks
/// the ordering
pub fn validate_hierarchy(templates: &[NodeTemplate]) -> Result<(), RhError> {
    for (node, template) in templates.iter().enumerate() {
        if let Some(parent) = template.parent() {
            if parent >= node {
                error!(
                    "node {} \"{}\" has invalid parent index {}",
                    node,
                    template.name(),
                    parent
                );
                return Err(RhError::InvalidParentIndex { node, parent });
            }
        }
    }
    Ok(())
}

/// True if the linear part of `m` is too close to singular to invert.
///
/// The 3x3 determinant is divided by the product of the column lengths,
/// giving a value between 0 and 1 that does not depend on scale. Uniformly
/// scaled matrices give 1 and matrices with a collapsed axis give 0.
fn is_near_singular(m: &glm::Mat4, epsilon: f32) -> bool {
    let linear = glm::mat4_to_mat3(m);
    let lengths = linear.column(0).norm()
        * linear.column(1).norm()
        * linear.column(2).norm();
    if lengths == 0.0f32 || !lengths.is_finite() {
        return true;
    }
    (glm::determinant(&linear) / lengths).abs() < epsilon
}

/// Flat array of node instances in parent before child order, sharing one
/// set of immutable templates
#[derive(Clone, Debug)]
pub struct NodeGraph {
    templates: Arc<[NodeTemplate]>,
    nodes: Vec<NodeInstance>,
    singular_epsilon: f32,
}

impl NodeGraph {
    /// Creates one node instance per template, all in their static pose
    ///
    /// # Errors
    /// Returns `RhError::InvalidParentIndex` if the hierarchy is not in
    /// parent before child order. No nodes are created in that case.
    pub fn new(
        templates: Arc<[NodeTemplate]>,
        singular_epsilon: f32,
    ) -> Result<Self, RhError> {
        validate_hierarchy(&templates)?;
        Ok(Self::from_validated(templates, singular_epsilon))
    }

    /// Only for templates that already passed `validate_hierarchy`
    pub(crate) fn from_validated(
        templates: Arc<[NodeTemplate]>,
        singular_epsilon: f32,
    ) -> Self {
        let nodes = templates
            .iter()
            .enumerate()
            .map(|(index, t)| NodeInstance::new(index, t.parent()))
            .collect();
        let mut graph = Self {
            templates,
            nodes,
            singular_epsilon,
        };
        graph.set_pose_transforms();
        debug!("node graph created with {} nodes", graph.nodes.len());
        graph
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn templates(&self) -> &[NodeTemplate] {
        &self.templates
    }

    /// All nodes in logical order
    #[must_use]
    pub fn nodes(&self) -> &[NodeInstance] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, index: usize) -> Option<&NodeInstance> {
        self.nodes.get(index)
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> Option<&mut NodeInstance> {
        self.nodes.get_mut(index)
    }

    /// Nodes without a parent
    pub fn roots(&self) -> impl Iterator<Item = &NodeInstance> {
        self.nodes.iter().filter(|n| n.parent().is_none())
    }

    /// Index of the first node with this name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.templates.iter().position(|t| t.name() == name)
    }

    /// World matrix of a node, or `None` if the index is out of range
    pub fn world_matrix(&mut self, index: usize) -> Option<glm::Mat4> {
        (index < self.nodes.len()).then(|| self.world(index))
    }

    /// World matrix of a node that is known to exist.
    ///
    /// Walks from the node up to its root, then refreshes each node on the
    /// way back down. A node is only recomputed if it has no cache or its
    /// parent was recomputed after the cache was filled.
    pub(crate) fn world(&mut self, index: usize) -> glm::Mat4 {
        let mut chain = SmallVec::<[usize; 16]>::new();
        let mut current = Some(index);
        while let Some(i) = current {
            chain.push(i);
            current = self.nodes[i].parent();
        }

        let mut parent: Option<(glm::Mat4, u64)> = None;
        let mut world = glm::Mat4::identity();
        for &i in chain.iter().rev() {
            let node = &mut self.nodes[i];
            world = node.refresh_world(parent);
            parent = Some((world, node.generation()));
        }
        world
    }

    /// # Errors
    /// Returns `RhError::InvalidNodeIndex` if the index is out of range
    pub fn set_local_matrix(
        &mut self,
        index: usize,
        matrix: glm::Mat4,
    ) -> Result<(), RhError> {
        let node = self
            .nodes
            .get_mut(index)
            .ok_or(RhError::InvalidNodeIndex(index))?;
        node.set_local_matrix(matrix);
        Ok(())
    }

    /// Sets the local matrix so that the world matrix becomes `matrix`
    ///
    /// # Errors
    /// Returns `RhError::InvalidNodeIndex` if the index is out of range or
    /// `RhError::SingularMatrix` if the parent's world matrix can not be
    /// inverted. Nothing is changed on error.
    pub fn set_world_matrix(
        &mut self,
        index: usize,
        matrix: glm::Mat4,
    ) -> Result<(), RhError> {
        let parent = self
            .nodes
            .get(index)
            .ok_or(RhError::InvalidNodeIndex(index))?
            .parent();

        let local = match parent {
            None => matrix,
            Some(p) => {
                let parent_world = self.world(p);
                let invertible =
                    !is_near_singular(&parent_world, self.singular_epsilon);
                let Some(inverse) = parent_world
                    .try_inverse()
                    .filter(|inv| invertible && inv.iter().all(|x| x.is_finite()))
                else {
                    error!("node {index} has a singular parent world matrix");
                    return Err(RhError::SingularMatrix(index));
                };
                inverse * matrix
            }
        };
        self.nodes[index].set_local_matrix(local);
        Ok(())
    }

    /// Puts every node in its static pose
    pub fn set_pose_transforms(&mut self) {
        for (node, template) in self.nodes.iter_mut().zip(self.templates.iter()) {
            node.set_pose_transform(template);
        }
    }

    /// Drives every node to a track at a time. `None` applies the static
    /// pose.
    pub fn set_animation_frame(&mut self, track: Option<usize>, time: f32) {
        for (node, template) in self.nodes.iter_mut().zip(self.templates.iter()) {
            node.set_animation_frame(template, track, time);
        }
    }

    /// Applies the same blend to every node. Weights are used as given.
    pub fn set_blended_frame(&mut self, blend: &[TrackBlend]) {
        for (node, template) in self.nodes.iter_mut().zip(self.templates.iter()) {
            node.set_blended_frame(template, blend);
        }
    }
}

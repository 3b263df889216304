use super::graph::NodeGraph;
use crate::{
    dualquat::{self, DualQuat},
    morph::SparseWeight8,
};
use nalgebra_glm as glm;

/// How a mesh is placed in the scene
#[derive(Clone, Debug)]
pub enum DrawableReference {
    /// Mesh follows the world matrix of one node
    Rigid { mesh_index: usize, node: usize },
    /// Mesh is deformed by a set of joints. Each joint is a node index and
    /// the inverse bind matrix for that joint. Morph weights come from
    /// `morph_node`.
    Skinned {
        mesh_index: usize,
        morph_node: usize,
        joints: Vec<(usize, glm::Mat4)>,
    },
}

impl DrawableReference {
    /// Logical index of the mesh to draw
    #[must_use]
    pub const fn mesh_index(&self) -> usize {
        match self {
            Self::Rigid { mesh_index, .. } | Self::Skinned { mesh_index, .. } => {
                *mesh_index
            }
        }
    }

    /// Largest node index used, for validation against the node count
    #[must_use]
    pub fn max_node_index(&self) -> usize {
        match self {
            Self::Rigid { node, .. } => *node,
            Self::Skinned {
                morph_node, joints, ..
            } => joints
                .iter()
                .map(|(n, _)| *n)
                .fold(*morph_node, usize::max),
        }
    }

    /// Creates a transform of the matching kind, in the identity state
    #[must_use]
    pub fn create_geometry_transform(&self) -> GeometryTransform {
        match self {
            Self::Rigid { .. } => {
                GeometryTransform::Rigid(RigidTransform::default())
            }
            Self::Skinned { joints, .. } => {
                GeometryTransform::Skin(SkinTransform {
                    joints: vec![glm::Mat4::identity(); joints.len()],
                    morph_weights: SparseWeight8::default(),
                })
            }
        }
    }

    /// Refreshes `xform` from the current world matrices. Node indices must
    /// already be validated against `graph`.
    pub(crate) fn update_geometry_transform(
        &self,
        xform: &mut GeometryTransform,
        graph: &mut NodeGraph,
    ) {
        match (self, xform) {
            (Self::Rigid { node, .. }, GeometryTransform::Rigid(rigid)) => {
                rigid.world = graph.world(*node);
                rigid
                    .morph_weights
                    .clone_from(graph.nodes()[*node].morph_weights());
            }
            (
                Self::Skinned {
                    morph_node, joints, ..
                },
                GeometryTransform::Skin(skin),
            ) => {
                skin.joints.clear();
                for (node, inverse_bind) in joints {
                    skin.joints.push(graph.world(*node) * inverse_bind);
                }
                skin.morph_weights
                    .clone_from(graph.nodes()[*morph_node].morph_weights());
            }
            (_, xform) => {
                // Transform was made for a different kind of drawable
                *xform = self.create_geometry_transform();
                self.update_geometry_transform(xform, graph);
            }
        }
    }
}

/// Placement of a rigid mesh
#[derive(Clone, Debug)]
pub struct RigidTransform {
    world: glm::Mat4,
    morph_weights: SparseWeight8,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self {
            world: glm::Mat4::identity(),
            morph_weights: SparseWeight8::default(),
        }
    }
}

/// Joint palette of a skinned mesh. Each entry is the joint's world matrix
/// multiplied by its inverse bind matrix.
#[derive(Clone, Debug, Default)]
pub struct SkinTransform {
    joints: Vec<glm::Mat4>,
    morph_weights: SparseWeight8,
}

/// Everything a renderer needs to place and deform one drawable for the
/// current frame
#[derive(Clone, Debug)]
pub enum GeometryTransform {
    Rigid(RigidTransform),
    Skin(SkinTransform),
}

fn linear_determinant(m: &glm::Mat4) -> f32 {
    glm::determinant(&glm::mat4_to_mat3(m))
}

impl GeometryTransform {
    #[must_use]
    pub const fn morph_weights(&self) -> &SparseWeight8 {
        match self {
            Self::Rigid(r) => &r.morph_weights,
            Self::Skin(s) => &s.morph_weights,
        }
    }

    /// World matrix of a rigid drawable, `None` for skinned ones
    #[must_use]
    pub const fn world_matrix(&self) -> Option<&glm::Mat4> {
        match self {
            Self::Rigid(r) => Some(&r.world),
            Self::Skin(_) => None,
        }
    }

    /// Joint palette of a skinned drawable, empty for rigid ones
    #[must_use]
    pub fn joint_matrices(&self) -> &[glm::Mat4] {
        match self {
            Self::Rigid(_) => &[],
            Self::Skin(s) => &s.joints,
        }
    }

    /// Palette for dual quaternion skinning. A rigid drawable gives a single
    /// entry for its world matrix. Scale is not carried over.
    #[must_use]
    pub fn joint_dual_quats(&self) -> Vec<DualQuat> {
        match self {
            Self::Rigid(r) => vec![dualquat::from_mat4(&r.world)],
            Self::Skin(s) => s.joints.iter().map(dualquat::from_mat4).collect(),
        }
    }

    /// False when the mesh is scaled down to nothing
    #[must_use]
    pub fn visible(&self) -> bool {
        match self {
            Self::Rigid(r) => linear_determinant(&r.world) != 0.0f32,
            Self::Skin(s) => {
                s.joints.iter().any(|m| linear_determinant(m) != 0.0f32)
            }
        }
    }

    /// True when the world matrix mirrors the mesh, so triangle winding must
    /// be reversed. Skinned meshes never report this.
    #[must_use]
    pub fn flip_faces(&self) -> bool {
        match self {
            Self::Rigid(r) => linear_determinant(&r.world) < 0.0f32,
            Self::Skin(_) => false,
        }
    }
}

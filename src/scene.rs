pub mod drawable;
pub mod graph;
pub mod instance;
pub mod node_instance;
pub mod node_template;
pub mod template;
pub mod tracks;

// Re-exports
pub use {
    drawable::{
        DrawableReference, GeometryTransform, RigidTransform, SkinTransform,
    },
    graph::{validate_hierarchy, NodeGraph},
    instance::{normalize_blend, SceneInstance},
    node_instance::NodeInstance,
    node_template::NodeTemplate,
    template::SceneTemplate,
    tracks::AnimationTracks,
};

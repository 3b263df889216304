pub mod animation;
pub mod config;
pub mod dualquat;
pub mod morph;
pub mod par;
pub mod rh_error;
pub mod scene;
pub mod transform;
pub mod types;

// Re-exports
pub use {
    config::RuntimeOptions,
    rh_error::RhError,
    scene::{SceneInstance, SceneTemplate},
    types::TrackBlend,
};

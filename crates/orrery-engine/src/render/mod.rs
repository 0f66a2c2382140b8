//! Render actor.
//!
//! Loads the skybox and the textured spheres once, then draws them every frame
//! from a snapshot of the shared camera.

mod actor;
mod loaded;
mod settings;

pub use actor::RenderActor;
pub use loaded::{LoadedScene, Placement, MVP_UNIFORM};
pub use settings::{RenderSettings, SceneObject};

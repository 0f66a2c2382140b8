//! Math and transform utilities.
//!
//! Vector and matrix types come from `glam`. This module adds the small set of
//! builders the renderer and input gestures use, plus the camera pose value.
//!
//! Conventions:
//! - right-handed world, +Y up
//! - clip-space depth in `0..1` (wgpu)

mod location;
mod transform;

pub use glam::{DVec2, Mat4, Quat, Vec2, Vec3, Vec4};
pub use location::{HasPose, Location};
pub use transform::{
    look_at, perspective, rotate, scale, transform_point, translate, up_vector, view_projection,
    FAR_PLANE, NEAR_PLANE, WORLD_UP,
};

use glam::{Mat4, Quat, Vec3};

use super::HasPose;

/// World up axis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Near clip plane used by the viewer projection.
pub const NEAR_PLANE: f32 = 0.01;

/// Far clip plane used by the viewer projection.
pub const FAR_PLANE: f32 = 1000.0;

/// Translation matrix.
#[inline]
pub fn translate(v: Vec3) -> Mat4 {
    Mat4::from_translation(v)
}

/// Non-uniform scale matrix.
#[inline]
pub fn scale(v: Vec3) -> Mat4 {
    Mat4::from_scale(v)
}

/// Rotation of `angle` radians about `axis`.
///
/// `axis` does not need to be normalized; a zero axis yields the identity.
#[inline]
pub fn rotate(angle: f32, axis: Vec3) -> Mat4 {
    match axis.try_normalize() {
        Some(axis) => Mat4::from_axis_angle(axis, angle),
        None => Mat4::IDENTITY,
    }
}

/// Applies `m` to the point `v` (w = 1) and drops w again.
#[inline]
pub fn transform_point(m: &Mat4, v: Vec3) -> Vec3 {
    let r = *m * v.extend(1.0);
    r.truncate()
}

/// Perspective projection with a vertical field of view given in degrees.
pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_degrees.to_radians(), aspect, near, far)
}

/// View matrix looking from `eye` towards `target`.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, target, up)
}

/// World up rotated by the pose's roll about its forward axis.
pub fn up_vector<P: HasPose + ?Sized>(pose: &P) -> Vec3 {
    match pose.focus().try_normalize() {
        Some(forward) => Quat::from_axis_angle(forward, pose.roll()) * WORLD_UP,
        None => WORLD_UP,
    }
}

/// `projection * view` for a pose, a vertical field of view (degrees) and an
/// aspect ratio, using the viewer's fixed clip planes.
pub fn view_projection<P: HasPose + ?Sized>(pose: &P, fov_degrees: f32, aspect: f32) -> Mat4 {
    let projection = perspective(fov_degrees, aspect, NEAR_PLANE, FAR_PLANE);
    let eye = pose.position();
    let view = look_at(eye, eye + pose.focus(), up_vector(pose));
    projection * view
}

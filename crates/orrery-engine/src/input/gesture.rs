use std::f32::consts::FRAC_PI_2;

use glam::{DVec2, Vec3};

use crate::math::{rotate, transform_point, Location, WORLD_UP};

use super::types::{Modifiers, MouseButton};

/// Pointer travel (logical pixels) per decade of zoom.
pub const ZOOM_PIXELS_PER_DECADE: f64 = 500.0;

/// Pointer travel (logical pixels) per radian of orbit.
pub const ORBIT_PIXELS_PER_RADIAN: f64 = 40.0;

/// Camera edit selected by the held buttons and modifiers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Gesture {
    /// Middle drag, or shift + left drag.
    Zoom,
    /// Left drag without shift.
    Orbit,
    Idle,
}

impl Gesture {
    pub fn detect(button_down: impl Fn(MouseButton) -> bool, modifiers: Modifiers) -> Self {
        let left = button_down(MouseButton::Left);
        if button_down(MouseButton::Middle) || (left && modifiers.shift) {
            Gesture::Zoom
        } else if left {
            Gesture::Orbit
        } else {
            Gesture::Idle
        }
    }

    /// Applies the gesture for a pointer movement of `delta`.
    pub fn apply(self, camera: Location, delta: DVec2) -> Location {
        match self {
            Gesture::Zoom => zoom(camera, delta),
            Gesture::Orbit => orbit(camera, delta),
            Gesture::Idle => camera,
        }
    }
}

/// Scales the camera's distance from the origin by `10^((dy - dx) / 500)` and
/// re-aims it at the origin.
///
/// Dragging down or left moves away; up or right moves closer.
pub fn zoom(camera: Location, delta: DVec2) -> Location {
    let exponent = (delta.y - delta.x) / ZOOM_PIXELS_PER_DECADE;
    let factor = 10f64.powf(exponent) as f32;
    let position = camera.position * factor;

    Location::new(position, -position, camera.roll)
}

/// Orbits the camera around the origin.
///
/// Horizontal travel turns about the world up axis, vertical travel about the
/// horizontal axis perpendicular to the camera position.
pub fn orbit(camera: Location, delta: DVec2) -> Location {
    let yaw = (-delta.x / ORBIT_PIXELS_PER_RADIAN) as f32;
    let pitch = (-delta.y / ORBIT_PIXELS_PER_RADIAN) as f32;

    let rotation = rotate(yaw, WORLD_UP) * rotate(pitch, alt_axis(camera.position));
    let position = transform_point(&rotation, camera.position);

    Location::new(position, -position, camera.roll)
}

/// Horizontal axis perpendicular to `position`: the normalized horizontal
/// projection of `position` turned a quarter turn about world up.
///
/// Directly above or below the origin the projection vanishes; `+X` is used.
pub fn alt_axis(position: Vec3) -> Vec3 {
    let horizontal = (position * Vec3::new(1.0, 0.0, 1.0))
        .try_normalize()
        .unwrap_or(Vec3::Z);
    transform_point(&rotate(FRAC_PI_2, WORLD_UP), horizontal)
}

use glam::Vec3;

/// Read access to an object's pose.
///
/// Implemented by [`Location`]; other scene-object kinds can implement it to
/// be used wherever a camera pose is expected.
pub trait HasPose {
    /// Position in world coordinates.
    fn position(&self) -> Vec3;

    /// Viewing direction relative to the position (not a point).
    fn focus(&self) -> Vec3;

    /// Rotation in radians about the focus direction.
    fn roll(&self) -> f32;
}

/// Position, focus direction and roll of an object.
///
/// `focus = (0, 0, -1), roll = 0` looks forward upright; the same focus with
/// `roll = pi` looks forward upside down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Location {
    pub position: Vec3,
    pub focus: Vec3,
    pub roll: f32,
}

impl Location {
    #[inline]
    pub const fn new(position: Vec3, focus: Vec3, roll: f32) -> Self {
        Self {
            position,
            focus,
            roll,
        }
    }

    /// A pose at `position` looking at the world origin.
    pub fn looking_at_origin(position: Vec3) -> Self {
        Self::new(position, -position, 0.0)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::looking_at_origin(Vec3::new(0.0, 10.0, 8.0))
    }
}

impl HasPose for Location {
    #[inline]
    fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    fn focus(&self) -> Vec3 {
        self.focus
    }

    #[inline]
    fn roll(&self) -> f32 {
        self.roll
    }
}

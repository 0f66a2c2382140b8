//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The window runtime translates platform events into `InputEvent`s and tracks
//! them in an `InputState`; the input actor reads that state through the
//! [`WindowSystem`] trait and turns pointer drags into camera gestures.

mod actor;
mod gesture;
mod state;
mod types;

pub(crate) mod platform;

pub use actor::{InputActor, WindowSystem};
pub use gesture::{alt_axis, orbit, zoom, Gesture, ORBIT_PIXELS_PER_RADIAN, ZOOM_PIXELS_PER_DECADE};
pub use state::InputState;
pub use types::{InputEvent, Modifiers, MouseButton, MouseButtonState};

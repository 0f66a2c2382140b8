//! Orrery engine crate.
//!
//! Core of a two-thread 3D viewer: an input actor on the main thread turns
//! pointer drags into camera updates, a render actor on its own thread draws a
//! skybox and textured spheres. The two share nothing but a [`SharedScene`].
//!
//! [`SharedScene`]: scene::SharedScene

pub mod assets;
pub mod device;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod math;
pub mod render;
pub mod resources;
pub mod scene;
pub mod time;
pub mod window;

mod error;

pub use error::{Error, Result};

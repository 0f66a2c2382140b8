//! Owning wrappers around GPU objects.
//!
//! Each wrapper holds exactly one device object (a mesh holds a buffer and the
//! vertex array describing it) and releases it when dropped. Wrappers are not
//! `Clone`; moving one transfers the object. [`take`](Shader::take) moves the
//! object out of a wrapper in place and leaves an empty wrapper behind whose
//! drop does nothing.
//!
//! Wrappers borrow the device that created them, so they cannot outlive it.

mod cube_map;
mod mesh;
mod program;
mod shader;

pub use cube_map::{CubeMap, CUBE_FACES};
pub use mesh::Mesh;
pub use program::Program;
pub use shader::Shader;

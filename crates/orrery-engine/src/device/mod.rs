//! Graphics-device collaborator.
//!
//! This module is responsible for:
//! - the [`GraphicsDevice`] / [`Present`] contracts the resource wrappers and the
//!   render actor are written against
//! - the handle and state types crossing that boundary
//! - the process-wide GPU subsystem handle
//! - the wgpu implementation of both contracts ([`WgpuDevice`])
//!
//! All calls happen on the render thread; implementations use `&self` and keep
//! their own interior state.

mod backend;
mod subsystem;

use std::fmt;
use std::num::NonZeroU32;

use glam::Mat4;

pub use backend::{GpuInit, SurfaceErrorAction, WgpuDevice, GPU_INSTANCE};
pub use subsystem::{Subsystem, SubsystemHandle};

/// Name of a GPU object as issued by a [`GraphicsDevice`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RawHandle(NonZeroU32);

impl RawHandle {
    #[inline]
    pub const fn new(id: NonZeroU32) -> Self {
        Self(id)
    }

    /// Returns `None` for the reserved name `0`.
    #[inline]
    pub const fn from_raw(id: u32) -> Option<Self> {
        match NonZeroU32::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

/// Programmable pipeline stage of a shader.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Location of a uniform inside a linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub u32);

/// Rectangle in physical pixels, origin top-left.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ViewRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ViewRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width` x `height` target.
    #[inline]
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }
}

/// One decoded cube-map face: tightly packed RGBA8 rows.
#[derive(Debug, Copy, Clone)]
pub struct FaceImage<'a> {
    pub width: u32,
    pub height: u32,
    pub pixels: &'a [u8],
}

/// GPU operations consumed by the resource wrappers and the render actor.
///
/// Creation calls hand out [`RawHandle`]s that the caller owns and must give
/// back through the matching `delete_*` call exactly once. Compile and link
/// report failure with the driver's diagnostic text.
pub trait GraphicsDevice {
    fn create_shader(&self, stage: ShaderStage, source: &str) -> Result<RawHandle, String>;
    fn delete_shader(&self, shader: RawHandle);

    /// Links the given shaders into a program. The shaders stay owned by the
    /// caller and may be deleted once this returns.
    fn link_program(&self, shaders: &[(ShaderStage, RawHandle)]) -> Result<RawHandle, String>;
    fn delete_program(&self, program: RawHandle);

    /// Makes `program` the active program for subsequent uniform and draw calls.
    fn use_program(&self, program: RawHandle);
    fn uniform_location(&self, program: RawHandle, name: &str) -> Option<UniformLocation>;

    /// Sets a uniform of the active program.
    fn set_uniform_mat4(&self, location: UniformLocation, value: &Mat4);

    fn create_vertex_buffer(&self, data: &[f32]) -> RawHandle;
    fn delete_buffer(&self, buffer: RawHandle);

    /// Describes `buffer` as tightly packed float vectors of `components` each,
    /// fed to vertex attribute 0.
    fn create_vertex_array(&self, buffer: RawHandle, components: u32) -> RawHandle;
    fn delete_vertex_array(&self, vertex_array: RawHandle);

    /// Faces in `+X, -X, +Y, -Y, +Z, -Z` order.
    fn create_cube_map(&self, faces: &[FaceImage<'_>; 6]) -> RawHandle;
    fn delete_texture(&self, texture: RawHandle);
    fn bind_cube_map(&self, texture: RawHandle);

    /// Draws `vertex_count` vertices as a triangle list with the active program.
    fn draw_triangles(&self, vertex_array: RawHandle, vertex_count: u32);

    fn set_viewport(&self, rect: ViewRect);
    fn set_scissor(&self, rect: ViewRect);
    fn set_depth_write(&self, enabled: bool);
    fn clear(&self, color: [f32; 4]);

    /// Blocks until all submitted GPU work has completed.
    fn finish(&self);
}

/// Windowing side of a frame.
pub trait Present {
    /// Resizes the drawable to `width` x `height` physical pixels.
    fn resize(&self, width: u32, height: u32);

    /// Shows everything drawn since the previous call.
    fn present(&self) -> crate::Result<()>;
}

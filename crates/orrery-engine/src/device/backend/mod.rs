//! wgpu implementation of [`GraphicsDevice`](super::GraphicsDevice) and
//! [`Present`](super::Present).

mod frame;
mod gpu;
mod init;
mod shader;
mod surface;

pub use gpu::WgpuDevice;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;

use super::Subsystem;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Bytes reserved per draw in the uniform ring; also the largest uniform block
/// a program may declare.
pub(crate) const UNIFORM_SLOT_SIZE: usize = 256;

/// Draw calls recorded past this count in one frame are dropped.
pub(crate) const MAX_DRAWS_PER_FRAME: usize = 256;

/// Process-wide wgpu instance, shared by every window surface.
pub static GPU_INSTANCE: Subsystem<wgpu::Instance> = Subsystem::new("gpu", create_instance);

fn create_instance() -> wgpu::Instance {
    // Use all backends to allow wgpu to select the optimal platform backend.
    wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

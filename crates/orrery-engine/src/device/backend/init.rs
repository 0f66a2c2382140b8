/// Settings for [`WgpuDevice::new`](super::WgpuDevice::new).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB swapchain format when the surface offers one. Cube-map
    /// faces are uploaded as sRGB, so this keeps colors unchanged end to end.
    pub prefer_srgb: bool,

    /// `Fifo` blocks `present` until vertical blank and is what paces the
    /// render actor to the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Compositing mode; `None` or an unsupported mode takes the surface's first.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Frames the surface may queue ahead of the display.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

use super::DEPTH_FORMAT;

/// What `present` does after failing to acquire a swapchain texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface configured again; the frame is dropped and the next one draws.
    Reconfigured,
    /// Frame dropped, nothing else to do.
    SkipFrame,
    /// The render actor stops with a windowing error.
    Fatal,
}

/// Swapchain format: an sRGB format if wanted and offered, else the surface's
/// preferred (first) one.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let srgb = formats.iter().copied().find(|f| f.is_srgb());
    match srgb {
        Some(format) if prefer_srgb => Some(format),
        _ => formats.first().copied(),
    }
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    match requested {
        Some(mode) if supported.contains(&mode) => mode,
        _ => supported
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
    }
}

/// Reconfigures the surface for a new drawable size.
///
/// Zero-sized and unchanged sizes leave the configuration alone. Returns
/// whether the surface was reconfigured.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    width: u32,
    height: u32,
) -> bool {
    if width == 0 || height == 0 || (config.width, config.height) == (width, height) {
        return false;
    }

    config.width = width;
    config.height = height;
    surface.configure(device, config);
    true
}

/// Only running out of memory ends the session; a lost or outdated swapchain
/// is rebuilt and everything else drops the frame.
pub(crate) fn surface_error_action(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

/// Applies [`surface_error_action`], reconfiguring the surface when asked to.
pub(crate) fn handle_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    err: &wgpu::SurfaceError,
) -> SurfaceErrorAction {
    let action = surface_error_action(err);
    if action == SurfaceErrorAction::Reconfigured {
        surface.configure(device, config);
    }
    action
}

/// Depth attachment matching a `width` x `height` swapchain.
pub(crate) fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("orrery depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

use crate::device::ViewRect;

use super::{MAX_DRAWS_PER_FRAME, UNIFORM_SLOT_SIZE};

/// One recorded draw, self-contained so the objects it was recorded from may be
/// deleted before the frame is presented.
pub(crate) struct DrawCall {
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub texture: wgpu::BindGroup,
    pub uniforms: [u8; UNIFORM_SLOT_SIZE],
    pub viewport: ViewRect,
    pub scissor: Option<ViewRect>,
}

/// Draws recorded since the last present.
#[derive(Default)]
pub(crate) struct FrameRecorder {
    clear_color: Option<[f32; 4]>,
    draws: Vec<DrawCall>,
    dropped: usize,
}

/// A finished recording, ready to be replayed into a render pass.
pub(crate) struct FrameRecording {
    pub clear_color: wgpu::Color,
    pub draws: Vec<DrawCall>,
    pub dropped: usize,
}

impl FrameRecorder {
    /// Clearing discards everything drawn before it in the same frame.
    pub fn clear(&mut self, color: [f32; 4]) {
        self.clear_color = Some(color);
        self.draws.clear();
    }

    pub fn push(&mut self, draw: DrawCall) {
        if self.draws.len() >= MAX_DRAWS_PER_FRAME {
            self.dropped += 1;
            return;
        }
        self.draws.push(draw);
    }

    pub fn take(&mut self) -> FrameRecording {
        let [r, g, b, a] = self.clear_color.take().unwrap_or([0.0, 0.0, 0.0, 1.0]);
        FrameRecording {
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
            draws: std::mem::take(&mut self.draws),
            dropped: std::mem::replace(&mut self.dropped, 0),
        }
    }
}

/// Dynamic offset of a draw's uniform slot.
#[inline]
pub(crate) fn uniform_offset(slot: usize) -> u32 {
    (slot * UNIFORM_SLOT_SIZE) as u32
}

/// Clamps `rect` to a `width` x `height` target.
///
/// Returns `None` when nothing of the rectangle remains visible.
pub(crate) fn clamp_rect(rect: ViewRect, width: u32, height: u32) -> Option<ViewRect> {
    let x = rect.x.min(width);
    let y = rect.y.min(height);
    let w = rect.width.min(width - x);
    let h = rect.height.min(height - y);

    if w == 0 || h == 0 {
        return None;
    }
    Some(ViewRect::new(x, y, w, h))
}

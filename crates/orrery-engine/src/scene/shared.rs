use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::math::Location;

/// Vertical field of view in degrees used when none is configured.
pub const DEFAULT_FIELD_OF_VIEW: f32 = 110.0;

/// Window dimensions in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    /// Size assumed before the first real one is observed. Non-zero so the
    /// aspect ratio is always defined.
    pub const PLACEHOLDER: Self = Self::new(1, 1);

    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A minimized window reports a zero dimension.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    #[inline]
    const fn pack(self) -> u64 {
        ((self.width as u64) << 32) | self.height as u64
    }

    #[inline]
    const fn unpack(bits: u64) -> Self {
        Self::new((bits >> 32) as u32, bits as u32)
    }
}

/// State shared by the input actor (main thread) and the render actor.
///
/// Every field has one writer:
///
/// | field            | written by                                   | read by       |
/// |------------------|----------------------------------------------|---------------|
/// | `window_size`    | input actor                                  | render actor  |
/// | `resize_pending` | input actor sets, render actor clears        | render actor  |
/// | `stop`           | input actor, or the owner on a fatal error    | both          |
/// | `camera`         | input actor                                  | render actor  |
/// | `field_of_view`  | nobody after construction                    | render actor  |
///
/// `stop` only ever goes from `false` to `true`. The window size is stored as
/// one packed atomic and the camera behind one lock, so readers always get a
/// whole value; a reader may see a value one update old.
#[derive(Debug)]
pub struct SharedScene {
    window_size: AtomicU64,
    resize_pending: AtomicBool,
    stop: AtomicBool,
    camera: Mutex<Location>,
    field_of_view: f32,
}

impl SharedScene {
    pub fn new(camera: Location, field_of_view: f32) -> Self {
        Self {
            window_size: AtomicU64::new(WindowSize::PLACEHOLDER.pack()),
            resize_pending: AtomicBool::new(false),
            stop: AtomicBool::new(false),
            camera: Mutex::new(camera),
            field_of_view,
        }
    }

    /// Latest observed window size; never zero in either dimension.
    pub fn window_size(&self) -> WindowSize {
        WindowSize::unpack(self.window_size.load(Ordering::Acquire))
    }

    /// Input actor only.
    pub fn set_window_size(&self, size: WindowSize) {
        let size = WindowSize::new(size.width.max(1), size.height.max(1));
        self.window_size.store(size.pack(), Ordering::Release);
    }

    /// Input actor only. Publish the new size with
    /// [`set_window_size`](Self::set_window_size) first.
    pub fn mark_resize(&self) {
        self.resize_pending.store(true, Ordering::Release);
    }

    pub fn resize_pending(&self) -> bool {
        self.resize_pending.load(Ordering::Acquire)
    }

    /// Render actor only, after it applied the current window size.
    pub fn clear_resize(&self) {
        self.resize_pending.store(false, Ordering::Release);
    }

    /// Render actor only. Clears the resize flag and reports whether it was
    /// set; read [`window_size`](Self::window_size) afterwards. A resize raised
    /// after this call stays pending for the next frame.
    pub fn take_resize(&self) -> bool {
        self.resize_pending.swap(false, Ordering::AcqRel)
    }

    /// Asks both actors to leave their loops. Cannot be undone.
    pub fn request_stop(&self) {
        if !self.stop.swap(true, Ordering::AcqRel) {
            log::debug!("stop requested");
        }
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Snapshot of the camera.
    pub fn camera(&self) -> Location {
        *self.camera.lock()
    }

    /// Input actor only.
    pub fn set_camera(&self, camera: Location) {
        *self.camera.lock() = camera;
    }

    /// Input actor only. Rewrites the camera from its current value in one step.
    pub fn update_camera(&self, edit: impl FnOnce(Location) -> Location) {
        let mut camera = self.camera.lock();
        *camera = edit(*camera);
    }

    /// Vertical field of view in degrees.
    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }
}

impl Default for SharedScene {
    fn default() -> Self {
        Self::new(Location::default(), DEFAULT_FIELD_OF_VIEW)
    }
}

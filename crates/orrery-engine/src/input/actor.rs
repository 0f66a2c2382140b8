use std::sync::Arc;

use anyhow::Result;
use glam::DVec2;

use crate::scene::{SharedScene, WindowSize};

use super::gesture::Gesture;
use super::types::{Modifiers, MouseButton};

/// Window-system queries the input actor runs against.
///
/// Implementations are bound to the thread that owns the window.
pub trait WindowSystem {
    /// Blocks until at least one event has been processed.
    fn wait_events(&mut self) -> Result<()>;

    /// Drawable size in physical pixels.
    fn window_size(&self) -> WindowSize;

    /// Pointer position in logical pixels.
    fn cursor_position(&self) -> DVec2;

    fn button_down(&self, button: MouseButton) -> bool;

    fn modifiers(&self) -> Modifiers;

    fn close_requested(&self) -> bool;
}

/// Turns window events into scene updates. Runs on the main thread.
///
/// Sole writer of the window size, the camera and the stop flag, and the only
/// actor that raises the resize flag.
pub struct InputActor {
    scene: Arc<SharedScene>,
    cached_size: WindowSize,
    last_cursor: Option<DVec2>,
}

impl InputActor {
    pub fn new(scene: Arc<SharedScene>) -> Self {
        let cached_size = scene.window_size();
        Self {
            scene,
            cached_size,
            last_cursor: None,
        }
    }

    pub fn scene(&self) -> &Arc<SharedScene> {
        &self.scene
    }

    /// Waits for events and applies them until stop is requested.
    ///
    /// A failing wait is fatal: stop is requested and the error returned.
    pub fn run<W: WindowSystem + ?Sized>(&mut self, window: &mut W) -> Result<()> {
        log::info!("input actor started");

        while !self.scene.stop_requested() {
            if let Err(err) = window.wait_events() {
                self.scene.request_stop();
                return Err(err.context("waiting for window events failed"));
            }
            self.step(window);
        }

        log::info!("input actor exited");
        Ok(())
    }

    /// Applies the current window state to the scene once, without waiting.
    pub fn step<W: WindowSystem + ?Sized>(&mut self, window: &W) {
        let size = window.window_size();
        if !size.is_empty() && size != self.cached_size {
            self.cached_size = size;
            self.scene.set_window_size(size);
            self.scene.mark_resize();
        }

        let cursor = window.cursor_position();
        let delta = cursor - self.last_cursor.unwrap_or(cursor);
        self.last_cursor = Some(cursor);

        let gesture = Gesture::detect(|b| window.button_down(b), window.modifiers());
        if gesture != Gesture::Idle {
            self.scene
                .update_camera(|camera| gesture.apply(camera, delta));
        }

        if window.close_requested() {
            self.scene.request_stop();
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::input::platform::translate_window_event;
use crate::input::{InputState, Modifiers, MouseButton, WindowSystem};
use crate::math::DVec2;
use crate::scene::WindowSize;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub maximized: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "orrery".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            maximized: true,
        }
    }
}

/// User events delivered through the event loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RuntimeEvent {
    /// Unblocks a pending [`WindowSystem::wait_events`].
    Wake,
}

/// Wakes the event loop from another thread.
#[derive(Clone)]
pub struct Waker {
    proxy: EventLoopProxy<RuntimeEvent>,
}

impl Waker {
    /// Returns `false` once the event loop is gone.
    pub fn wake(&self) -> bool {
        self.proxy.send_event(RuntimeEvent::Wake).is_ok()
    }
}

/// Owns the `winit` event loop and the single application window.
///
/// Must be created and driven on the main thread. Events are pumped on demand
/// from [`WindowSystem::wait_events`] rather than from a callback loop, so the
/// input actor owns the thread's control flow.
pub struct WindowRuntime {
    event_loop: EventLoop<RuntimeEvent>,
    tracker: Tracker,
    window: Arc<Window>,
}

impl WindowRuntime {
    /// Creates the event loop and the window.
    pub fn open(config: RuntimeConfig) -> Result<Self> {
        let mut event_loop = EventLoop::<RuntimeEvent>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut tracker = Tracker::new(config);

        // The window is created from `resumed`, delivered by the first pumps.
        let window = loop {
            if let Some(window) = &tracker.window {
                break Arc::clone(window);
            }
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut tracker);
            if let Some(err) = tracker.error.take() {
                return Err(err);
            }
            if let PumpStatus::Exit(code) = status {
                anyhow::bail!("event loop exited with code {code} before a window was created");
            }
        };

        Ok(Self {
            event_loop,
            tracker,
            window,
        })
    }

    /// Window handle for surface creation on another thread.
    pub fn window(&self) -> Arc<Window> {
        Arc::clone(&self.window)
    }

    pub fn waker(&self) -> Waker {
        Waker {
            proxy: self.event_loop.create_proxy(),
        }
    }
}

impl WindowSystem for WindowRuntime {
    fn wait_events(&mut self) -> Result<()> {
        let status = self.event_loop.pump_app_events(None, &mut self.tracker);
        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {code}");
            self.tracker.close_requested = true;
        }
        match self.tracker.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn window_size(&self) -> WindowSize {
        let size = self.window.inner_size();
        WindowSize::new(size.width, size.height)
    }

    fn cursor_position(&self) -> DVec2 {
        self.tracker.input.pointer_pos
    }

    fn button_down(&self, button: MouseButton) -> bool {
        self.tracker.input.button_down(button)
    }

    fn modifiers(&self) -> Modifiers {
        self.tracker.input.modifiers
    }

    fn close_requested(&self) -> bool {
        self.tracker.close_requested
    }
}

/// Event-loop callbacks: creates the window and tracks its input state.
struct Tracker {
    config: RuntimeConfig,
    window: Option<Arc<Window>>,
    input: InputState,
    close_requested: bool,
    error: Option<anyhow::Error>,
}

impl Tracker {
    fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            window: None,
            input: InputState::default(),
            close_requested: false,
            error: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(true)
            .with_maximized(self.config.maximized);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let size = window.inner_size();
        log::info!(
            "window created: \"{}\" {}x{} (scale {})",
            self.config.title,
            size.width,
            size.height,
            window.scale_factor()
        );

        self.window = Some(Arc::new(window));
        Ok(())
    }
}

impl ApplicationHandler<RuntimeEvent> for Tracker {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: RuntimeEvent) {
        match event {
            RuntimeEvent::Wake => log::trace!("event loop woken"),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        if let Some(ev) = translate_window_event(window, &event) {
            self.input.apply_event(&ev);
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.close_requested = true;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                log::trace!("window resized to {}x{}", size.width, size.height);
            }
            _ => {}
        }
    }
}

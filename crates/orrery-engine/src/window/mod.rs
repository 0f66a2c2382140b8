//! Windowing collaborator.
//!
//! Owns the `winit` EventLoop and Window on the main thread and exposes them
//! to the input actor as a [`WindowSystem`](crate::input::WindowSystem).

mod runtime;

pub use runtime::{RuntimeConfig, RuntimeEvent, Waker, WindowRuntime};

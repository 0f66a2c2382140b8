//! Frame timing.
//!
//! The render actor ticks one `FrameClock` per presented frame and feeds the
//! result to `FrameStats` for periodic frame-rate logging.

mod frame_clock;
mod stats;

pub use frame_clock::{FrameClock, FrameTime};
pub use stats::{FrameReport, FrameStats};

//! Cross-thread scene state.
//!
//! [`SharedScene`] is the only object the input and render actors share.

mod shared;

pub use shared::{SharedScene, WindowSize, DEFAULT_FIELD_OF_VIEW};

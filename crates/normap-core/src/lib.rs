//! Shared plumbing for the normal mapping demo: per-frame timing and
//! viewport data, and tracing setup.

pub mod inputs;
pub mod logging;

pub use inputs::{FrameData, Viewport};
pub use logging::initialise_tracing;

//! Shared utilities: hex colour conversion and frame timing.

pub mod color;
pub mod frame_timing;

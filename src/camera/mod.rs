//! Perspective cameras and the look-at basis shared by cameras and the
//! cone markers that represent them.

/// Camera struct, look-at rotation, and GPU view uniform.
pub mod core;

pub use self::core::{look_rotation, Camera, ViewUniform};

//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the triview crate.
#[derive(Debug)]
pub enum TriviewError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A panel edit addressed a field that does not exist or carried a
    /// value of the wrong type.
    OptionPath(String),
    /// An embedded texture could not be decoded.
    Texture(String),
    /// WGSL module registration or composition failure.
    ShaderCompose(String),
    /// Viewer event-loop failure.
    Viewer(String),
    /// Browser canvas / DOM failure.
    Web(String),
}

impl fmt::Display for TriviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::OptionPath(msg) => write!(f, "invalid option edit: {msg}"),
            Self::Texture(msg) => write!(f, "texture decode error: {msg}"),
            Self::ShaderCompose(msg) => {
                write!(f, "shader composition error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
            Self::Web(msg) => write!(f, "web error: {msg}"),
        }
    }
}

impl std::error::Error for TriviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for TriviewError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for TriviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

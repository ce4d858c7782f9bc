//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation (key press, pointer gesture, or a
//! programmatic call) is represented as a `TriviewCommand`. Consumers
//! construct commands and pass them to
//! [`TriviewEngine::execute`](super::TriviewEngine::execute).

use glam::Vec2;

use crate::scene::TrackedCamera;

/// A discrete or parameterized operation the engine can perform.
///
/// The engine never cares *how* a command was triggered:
///
/// ```ignore
/// engine.execute(TriviewCommand::Select { camera: TrackedCamera::Red });
/// engine.execute(TriviewCommand::DollyOverview { delta: -1.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriviewCommand {
    // ── Gizmo target ────────────────────────────────────────────────
    /// Attach the translate gizmo to a tracked camera's cone.
    Select {
        /// The camera whose cone becomes the drag target.
        camera: TrackedCamera,
    },

    /// Detach the translate gizmo.
    Deselect,

    // ── Pointer ─────────────────────────────────────────────────────
    /// The pointer moved to `position` (physical pixels, top-left origin).
    PointerMoved {
        /// Cursor position.
        position: Vec2,
    },

    /// The primary button went down at `position`.
    PointerPressed {
        /// Cursor position.
        position: Vec2,
    },

    /// The primary button was released.
    PointerReleased,

    // ── Overview camera ─────────────────────────────────────────────
    /// Move the overview eye along Z by `delta`, clamped to the panel
    /// range.
    DollyOverview {
        /// Signed distance change.
        delta: f32,
    },
}

use serde::{Deserialize, Serialize};

use crate::engine::command::TriviewCommand;
use crate::scene::TrackedCamera;

/// Engine-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// select_green = "Digit1"
/// deselect = "Escape"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Attach the gizmo to the green camera's cone.
    SelectGreen,
    /// Attach the gizmo to the red camera's cone.
    SelectRed,
    /// Detach the gizmo.
    Deselect,
}

impl KeyAction {
    /// Every action, in the order that wins when two share a key.
    pub const ALL: [KeyAction; 3] =
        [KeyAction::SelectGreen, KeyAction::SelectRed, KeyAction::Deselect];

    /// Convert to the corresponding parameterless [`TriviewCommand`].
    #[must_use]
    pub fn to_command(self) -> TriviewCommand {
        match self {
            Self::SelectGreen => TriviewCommand::Select {
                camera: TrackedCamera::Green,
            },
            Self::SelectRed => TriviewCommand::Select {
                camera: TrackedCamera::Red,
            },
            Self::Deselect => TriviewCommand::Deselect,
        }
    }
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

/// On-disk form of the binding table; the reverse map is rebuilt from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BindingTable {
    /// Action → key string.
    pub bindings: HashMap<KeyAction, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "BindingTable", into = "BindingTable")]
/// Configurable keyboard bindings mapping actions to key codes.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format, which is
/// also what the DOM reports as `KeyboardEvent.code` (`"Digit1"`,
/// `"Escape"`, ...).
pub struct KeybindingOptions {
    /// Maps action → key string (e.g. `SelectGreen` → `"Digit1"`).
    pub bindings: HashMap<KeyAction, String>,
    /// Reverse lookup cache (key string → action).
    key_to_action: HashMap<String, KeyAction>,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        Self::from(BindingTable {
            bindings: HashMap::from([
                (KeyAction::SelectGreen, "Digit1".into()),
                (KeyAction::SelectRed, "Digit2".into()),
                (KeyAction::Deselect, "Escape".into()),
            ]),
        })
    }
}

impl From<BindingTable> for KeybindingOptions {
    fn from(table: BindingTable) -> Self {
        let mut opts = Self {
            bindings: table.bindings,
            key_to_action: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl From<KeybindingOptions> for BindingTable {
    fn from(opts: KeybindingOptions) -> Self {
        Self {
            bindings: opts.bindings,
        }
    }
}

impl KeybindingOptions {
    /// Rebuild the reverse lookup map (key string → action).
    ///
    /// When a hand-edited table binds one key to several actions, the
    /// earliest in [`KeyAction::ALL`] keeps it.
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_action.clear();
        for action in KeyAction::ALL {
            let Some(key) = self.bindings.get(&action) else {
                continue;
            };
            match self.key_to_action.get(key) {
                Some(owner) => {
                    log::warn!(
                        "key {key} bound to {owner:?} and {action:?}; \
                         keeping {owner:?}"
                    );
                }
                None => {
                    let _ = self.key_to_action.insert(key.clone(), action);
                }
            }
        }
    }

    /// Bind `action` to `key`, replacing its previous key. Any other
    /// action holding `key` loses it.
    pub fn bind(&mut self, action: KeyAction, key: impl Into<String>) {
        let key = key.into();
        self.bindings.retain(|other, bound| *other == action || *bound != key);
        let _ = self.bindings.insert(action, key);
        self.rebuild_reverse_map();
    }

    /// Look up the action for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.key_to_action.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_key_goes_to_the_earliest_action() {
        let table = BindingTable {
            bindings: HashMap::from([
                (KeyAction::Deselect, "KeyQ".to_owned()),
                (KeyAction::SelectRed, "KeyQ".to_owned()),
                (KeyAction::SelectGreen, "Digit1".to_owned()),
            ]),
        };
        // Same answer however the map happens to iterate.
        for _ in 0..8 {
            let opts = KeybindingOptions::from(table.clone());
            assert_eq!(opts.lookup("KeyQ"), Some(KeyAction::SelectRed));
            assert_eq!(opts.lookup("Digit1"), Some(KeyAction::SelectGreen));
        }
    }

    #[test]
    fn bind_takes_the_key_from_its_previous_owner() {
        let mut opts = KeybindingOptions::default();
        opts.bind(KeyAction::Deselect, "Digit1");
        assert_eq!(opts.lookup("Digit1"), Some(KeyAction::Deselect));
        assert!(!opts.bindings.contains_key(&KeyAction::SelectGreen));
        assert_eq!(opts.lookup("Escape"), None);
        assert_eq!(opts.lookup("Digit2"), Some(KeyAction::SelectRed));
    }
}

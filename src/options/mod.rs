//! Position records, scene lighting, and key bindings with TOML preset
//! support.
//!
//! The camera sections are the records the parameter panel binds to: the
//! JSON schema generated here drives the panel's folders and sliders, and
//! panel edits come back as JSON-path writes via
//! [`Options::with_value_at`].

mod camera;
mod keybindings;
mod lighting;

use std::path::Path;

pub use camera::{OverviewOptions, PositionOptions, TrackedCameraOptions};
pub use keybindings::{BindingTable, KeybindingOptions};
pub use lighting::LightingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::TriviewError;
use crate::scene::TrackedCamera;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[red_camera.position]`) work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Overview camera distance.
    pub overview: OverviewOptions,
    /// Red tracked camera (top-right view).
    #[schemars(title = "Red Camera")]
    #[serde(deserialize_with = "TrackedCameraOptions::deserialize_red")]
    pub red_camera: TrackedCameraOptions,
    /// Green tracked camera (bottom-right view).
    #[schemars(title = "Green Camera")]
    #[serde(deserialize_with = "TrackedCameraOptions::deserialize_green")]
    pub green_camera: TrackedCameraOptions,
    /// Hemisphere light parameters.
    #[schemars(skip)]
    pub lighting: LightingOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            overview: OverviewOptions::default(),
            red_camera: TrackedCameraOptions::red_default(),
            green_camera: TrackedCameraOptions::green_default(),
            lighting: LightingOptions::default(),
            keybindings: KeybindingOptions::default(),
        }
    }
}

impl Options {
    /// Generate JSON Schema describing the panel-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Position record of a tracked camera.
    #[must_use]
    pub fn tracked(&self, camera: TrackedCamera) -> &TrackedCameraOptions {
        match camera {
            TrackedCamera::Green => &self.green_camera,
            TrackedCamera::Red => &self.red_camera,
        }
    }

    /// Mutable position record of a tracked camera.
    pub fn tracked_mut(
        &mut self,
        camera: TrackedCamera,
    ) -> &mut TrackedCameraOptions {
        match camera {
            TrackedCamera::Green => &mut self.green_camera,
            TrackedCamera::Red => &mut self.red_camera,
        }
    }

    /// Return a copy with the value at a JSON object path replaced
    /// (`["red_camera", "position", "x"]`).
    ///
    /// # Errors
    ///
    /// Returns [`TriviewError::OptionPath`] if the path does not name an
    /// existing field or the value does not fit the field's type.
    pub fn with_value_at(
        &self,
        path: &[String],
        value: serde_json::Value,
    ) -> Result<Self, TriviewError> {
        let mut root = serde_json::to_value(self)
            .map_err(|e| TriviewError::OptionPath(e.to_string()))?;
        let slot = path
            .iter()
            .try_fold(&mut root, |node, key| node.get_mut(key.as_str()))
            .ok_or_else(|| {
                TriviewError::OptionPath(format!(
                    "unknown option `{}`",
                    path.join(".")
                ))
            })?;
        *slot = value;
        serde_json::from_value(root)
            .map_err(|e| TriviewError::OptionPath(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TriviewError::Io`] if the file cannot be read and
    /// [`TriviewError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, TriviewError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| TriviewError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`TriviewError::OptionsParse`] on serialization failure and
    /// [`TriviewError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), TriviewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TriviewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Preset names (TOML file stems) in a directory, sorted.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|path| {
                path.file_stem().and_then(|s| s.to_str()).map(str::to_owned)
            })
            .collect();
        names.sort();
        names
    }
}

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Overview Camera", inline)]
#[serde(default)]
/// The wide overview camera. Only its distance along +Z is adjustable.
pub struct OverviewOptions {
    /// Eye distance along +Z (the eye sits at `(0, 10, z)`).
    #[schemars(title = "z", range(min = 20.0, max = 50.0), extend("step" = 1.0))]
    pub z: f32,
}

impl OverviewOptions {
    /// Smallest eye distance the panel allows.
    pub const MIN_Z: f32 = 20.0;
    /// Largest eye distance the panel allows.
    pub const MAX_Z: f32 = 50.0;
    /// Fixed eye height.
    pub const EYE_HEIGHT: f32 = 10.0;

    /// World-space eye position.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, Self::EYE_HEIGHT, self.z)
    }
}

impl Default for OverviewOptions {
    fn default() -> Self {
        Self { z: 40.0 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Position", inline)]
#[serde(default)]
/// A world-space position record edited by sliders and the gizmo.
pub struct PositionOptions {
    #[schemars(title = "x", range(min = -10.0, max = 10.0), extend("step" = 0.1))]
    /// X coordinate.
    pub x: f32,
    #[schemars(title = "y", range(min = -10.0, max = 10.0), extend("step" = 0.1))]
    /// Y coordinate.
    pub y: f32,
    #[schemars(title = "z", range(min = -10.0, max = 10.0), extend("step" = 0.1))]
    /// Z coordinate.
    pub z: f32,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::from(Vec3::ZERO)
    }
}

impl From<Vec3> for PositionOptions {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<PositionOptions> for Vec3 {
    fn from(p: PositionOptions) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[schemars(inline)]
#[serde(default)]
/// A tracked camera. Its position is both the camera eye (clamped) and the
/// cone marker location (raw).
pub struct TrackedCameraOptions {
    /// Position record.
    pub position: PositionOptions,
}

impl TrackedCameraOptions {
    /// Tracked camera starting at `position`.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position: position.into(),
        }
    }

    /// Default green camera, front right of the box.
    #[must_use]
    pub fn green_default() -> Self {
        Self::at(Vec3::new(5.0, 5.0, 5.0))
    }

    /// Default red camera, front left of the box.
    #[must_use]
    pub fn red_default() -> Self {
        Self::at(Vec3::new(-5.0, 5.0, 5.0))
    }

    pub(super) fn deserialize_green<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        TrackedCameraPatch::deserialize(deserializer)
            .map(|patch| patch.apply(Self::green_default()))
    }

    pub(super) fn deserialize_red<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        TrackedCameraPatch::deserialize(deserializer)
            .map(|patch| patch.apply(Self::red_default()))
    }
}

/// On-disk form of a tracked camera: every coordinate is optional and
/// falls back to that camera's own default, not to the origin.
#[derive(Deserialize, Default)]
#[serde(default)]
struct TrackedCameraPatch {
    position: PositionPatch,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct PositionPatch {
    x: Option<f32>,
    y: Option<f32>,
    z: Option<f32>,
}

impl TrackedCameraPatch {
    fn apply(self, base: TrackedCameraOptions) -> TrackedCameraOptions {
        let PositionOptions { x, y, z } = base.position;
        let p = self.position;
        TrackedCameraOptions {
            position: PositionOptions {
                x: p.x.unwrap_or(x),
                y: p.y.unwrap_or(y),
                z: p.z.unwrap_or(z),
            },
        }
    }
}

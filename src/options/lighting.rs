use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Hemisphere light shared by every lit mesh.
pub struct LightingOptions {
    /// Sky colour (sRGB hex).
    pub sky_color: u32,
    /// Ground colour (sRGB hex).
    pub ground_color: u32,
    /// Intensity multiplier applied to both colours.
    pub intensity: f32,
    /// Direction that receives the full sky colour.
    pub direction: [f32; 3],
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            sky_color: 0x00ff_ffff,
            ground_color: 0x0000_0003,
            intensity: 1.0,
            direction: [0.0, 0.0, 1.0],
        }
    }
}

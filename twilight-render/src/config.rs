use serde::{Deserialize, Serialize};

use twilight_core::StarFieldConfig;

use crate::error::RenderError;

/// Colors of the sky ramp and the stars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyPalette {
    /// Fully dark sky; the haze fades toward this at its top edge.
    pub night: [u8; 3],
    /// Dawn/dusk glow at the horizon.
    pub warm: [u8; 3],
    /// Daylight blue above the warm band.
    pub day: [u8; 3],
    /// Stars high above the transition band.
    pub star: [u8; 3],
    /// Share of the transition band painted warm in the haze layer.
    pub warm_band_share: f64,
}

impl Default for SkyPalette {
    fn default() -> Self {
        Self {
            night: [0, 0, 0],
            warm: [255, 72, 0],
            day: [0, 110, 189],
            star: [255, 255, 255],
            warm_band_share: 0.75,
        }
    }
}

/// Everything about a render that is not part of the animated parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub palette: SkyPalette,
    pub star_field: StarFieldConfig,
    /// Horizontal field of view of the spherical camera, in degrees.
    pub fov_degrees: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            palette: SkyPalette::default(),
            star_field: StarFieldConfig::default(),
            fov_degrees: 30.0,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(RenderError::InvalidConfig {
                reason: format!("fov_degrees must be in (0, 180), got {}", self.fov_degrees),
            });
        }
        let share = self.palette.warm_band_share;
        if !(share > 0.0 && share <= 1.0) {
            return Err(RenderError::InvalidConfig {
                reason: format!("warm_band_share must be in (0, 1], got {share}"),
            });
        }
        let sf = &self.star_field;
        if sf.reference_width == 0 || sf.reference_height == 0 {
            return Err(RenderError::InvalidConfig {
                reason: format!(
                    "reference resolution must be non-zero, got {}×{}",
                    sf.reference_width, sf.reference_height
                ),
            });
        }
        Ok(())
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::field::{FieldValue, FIELDS};

/// How stars are projected onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum RenderType {
    /// Normalized star coordinates are scaled to the canvas and scrolled by
    /// latitude/longitude, wrapping at the edges.
    Flat,
    /// Stars live on a unit sphere viewed through a perspective camera.
    #[default]
    Spherical,
}

impl RenderType {
    pub const ALL: [RenderType; 2] = [RenderType::Flat, RenderType::Spherical];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Spherical => "spherical",
        }
    }
}

impl fmt::Display for RenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderType {
    type Err = CoreError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "spherical" => Ok(Self::Spherical),
            other => Err(CoreError::invalid(
                "render_type",
                format!("expected `flat` or `spherical`, got `{other}`"),
            )),
        }
    }
}

/// Wrap `value` into `[0, cycle)`.
///
/// `rem_euclid` can round up to exactly `cycle` for tiny negative inputs,
/// which would break the half-open range, so that case folds to zero.
#[inline]
pub fn wrap_cyclical(value: f64, cycle: f64) -> f64 {
    let wrapped = value.rem_euclid(cycle);
    if wrapped >= cycle {
        0.0
    } else {
        wrapped
    }
}

/// Clamp a linear field into `[min, max]`. NaN passes through unchanged and
/// is rejected by the caller.
#[inline]
pub fn clamp_linear(value: f64, min: f64, max: f64) -> f64 {
    value.clamp(min, max)
}

fn finite(field: &'static str, value: f64) -> crate::Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::invalid(field, format!("not a real number: {value}")))
    }
}

/// The full set of parameters for one twilight render.
///
/// Every field is normalized when written: cyclical fields wrap, bounded
/// linear fields clamp, and values that cannot be normalized are rejected
/// with [`CoreError::InvalidParameter`]. Reads never re-normalize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterState {
    width: u32,
    height: u32,
    seed: u32,
    /// Hour of the day in `[0, 24)`.
    time_of_day: f64,
    /// Multiplier on the number of displayed stars.
    star_density: f64,
    /// Fraction of the canvas height covered by the warm horizon band.
    transition_ratio: f64,
    /// Viewer latitude in degrees, `[0, 360)`.
    latitude: f64,
    /// Viewer longitude in degrees, `[0, 360)`.
    longitude: f64,
    render_type: RenderType,
}

impl ParameterState {
    pub const DEFAULT_WIDTH: u32 = 1920;
    pub const DEFAULT_HEIGHT: u32 = 1080;
    pub const DEFAULT_STAR_DENSITY: f64 = 1.0;
    pub const DEFAULT_TRANSITION_RATIO: f64 = 0.2;

    pub const MAX_SEED: u32 = 1_000_000;
    pub const MIN_STAR_DENSITY: f64 = 0.1;
    pub const MAX_STAR_DENSITY: f64 = 5.0;
    pub const MIN_TRANSITION_RATIO: f64 = 0.05;
    pub const MAX_TRANSITION_RATIO: f64 = 0.5;

    /// Cycle length of `time_of_day`.
    pub const HOURS_PER_DAY: f64 = 24.0;
    /// Cycle length of `latitude` and `longitude`.
    pub const DEGREES_PER_TURN: f64 = 360.0;

    /// Default parameters with the identity fields set explicitly.
    pub fn new(width: u32, height: u32, seed: u32) -> crate::Result<Self> {
        Self::default().with_dimensions(width, height)?.with_seed(seed)
    }

    // -- accessors ---------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn time_of_day(&self) -> f64 {
        self.time_of_day
    }

    pub fn star_density(&self) -> f64 {
        self.star_density
    }

    pub fn transition_ratio(&self) -> f64 {
        self.transition_ratio
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn render_type(&self) -> RenderType {
        self.render_type
    }

    /// Canvas aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    // -- validating setters ------------------------------------------------

    pub fn set_width(&mut self, width: u32) -> crate::Result<()> {
        if width == 0 {
            return Err(CoreError::invalid("width", "must be a positive integer"));
        }
        self.width = width;
        Ok(())
    }

    pub fn set_height(&mut self, height: u32) -> crate::Result<()> {
        if height == 0 {
            return Err(CoreError::invalid("height", "must be a positive integer"));
        }
        self.height = height;
        Ok(())
    }

    pub fn set_seed(&mut self, seed: u32) -> crate::Result<()> {
        if seed > Self::MAX_SEED {
            return Err(CoreError::invalid(
                "seed",
                format!("must be between 0 and {}, got {seed}", Self::MAX_SEED),
            ));
        }
        self.seed = seed;
        Ok(())
    }

    pub fn set_time_of_day(&mut self, hours: f64) -> crate::Result<()> {
        self.time_of_day = wrap_cyclical(finite("time_of_day", hours)?, Self::HOURS_PER_DAY);
        Ok(())
    }

    pub fn set_star_density(&mut self, density: f64) -> crate::Result<()> {
        self.star_density = clamp_linear(
            finite("star_density", density)?,
            Self::MIN_STAR_DENSITY,
            Self::MAX_STAR_DENSITY,
        );
        Ok(())
    }

    pub fn set_transition_ratio(&mut self, ratio: f64) -> crate::Result<()> {
        self.transition_ratio = clamp_linear(
            finite("transition_ratio", ratio)?,
            Self::MIN_TRANSITION_RATIO,
            Self::MAX_TRANSITION_RATIO,
        );
        Ok(())
    }

    pub fn set_latitude(&mut self, degrees: f64) -> crate::Result<()> {
        self.latitude = wrap_cyclical(finite("latitude", degrees)?, Self::DEGREES_PER_TURN);
        Ok(())
    }

    pub fn set_longitude(&mut self, degrees: f64) -> crate::Result<()> {
        self.longitude = wrap_cyclical(finite("longitude", degrees)?, Self::DEGREES_PER_TURN);
        Ok(())
    }

    pub fn set_render_type(&mut self, render_type: RenderType) {
        self.render_type = render_type;
    }

    /// Set a field by name, as listed in [`FIELDS`].
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> crate::Result<()> {
        let spec = FIELDS
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| CoreError::UnknownField(name.to_string()))?;
        (spec.set)(self, value)
    }

    /// All fields as `(name, value)` pairs in table order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, FieldValue)> + '_ {
        FIELDS.iter().map(move |f| (f.name, (f.get)(self)))
    }

    // -- chaining builders -------------------------------------------------

    pub fn with_dimensions(mut self, width: u32, height: u32) -> crate::Result<Self> {
        self.set_width(width)?;
        self.set_height(height)?;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u32) -> crate::Result<Self> {
        self.set_seed(seed)?;
        Ok(self)
    }

    pub fn with_time_of_day(mut self, hours: f64) -> crate::Result<Self> {
        self.set_time_of_day(hours)?;
        Ok(self)
    }

    pub fn with_star_density(mut self, density: f64) -> crate::Result<Self> {
        self.set_star_density(density)?;
        Ok(self)
    }

    pub fn with_transition_ratio(mut self, ratio: f64) -> crate::Result<Self> {
        self.set_transition_ratio(ratio)?;
        Ok(self)
    }

    pub fn with_latitude(mut self, degrees: f64) -> crate::Result<Self> {
        self.set_latitude(degrees)?;
        Ok(self)
    }

    pub fn with_longitude(mut self, degrees: f64) -> crate::Result<Self> {
        self.set_longitude(degrees)?;
        Ok(self)
    }

    pub fn with_render_type(mut self, render_type: RenderType) -> Self {
        self.set_render_type(render_type);
        self
    }
}

impl Default for ParameterState {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            seed: 0,
            time_of_day: 0.0,
            star_density: Self::DEFAULT_STAR_DENSITY,
            transition_ratio: Self::DEFAULT_TRANSITION_RATIO,
            latitude: 0.0,
            longitude: 0.0,
            render_type: RenderType::Spherical,
        }
    }
}

/// Deserialization goes through the validating setters, so a loaded state
/// holds the same invariants as one built in code.
impl<'de> Deserialize<'de> for ParameterState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(default)]
        struct Raw {
            width: u32,
            height: u32,
            seed: u32,
            time_of_day: f64,
            star_density: f64,
            transition_ratio: f64,
            latitude: f64,
            longitude: f64,
            render_type: String,
        }

        impl Default for Raw {
            fn default() -> Self {
                let d = ParameterState::default();
                Self {
                    width: d.width,
                    height: d.height,
                    seed: d.seed,
                    time_of_day: d.time_of_day,
                    star_density: d.star_density,
                    transition_ratio: d.transition_ratio,
                    latitude: d.latitude,
                    longitude: d.longitude,
                    render_type: d.render_type.as_str().to_string(),
                }
            }
        }

        let raw = Raw::deserialize(deserializer)?;
        let build = || -> crate::Result<ParameterState> {
            Ok(ParameterState::new(raw.width, raw.height, raw.seed)?
                .with_time_of_day(raw.time_of_day)?
                .with_star_density(raw.star_density)?
                .with_transition_ratio(raw.transition_ratio)?
                .with_latitude(raw.latitude)?
                .with_longitude(raw.longitude)?
                .with_render_type(raw.render_type.parse()?))
        };
        build().map_err(serde::de::Error::custom)
    }
}

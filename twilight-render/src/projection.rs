use std::f64::consts::PI;

use twilight_core::{ParameterState, RenderType};

use crate::config::GeneratorConfig;
use crate::error::RenderError;

/// Sky panned as a flat, tiling sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatProjector {
    width: f64,
    height: f64,
    shift_x: f64,
    shift_y: f64,
}

impl FlatProjector {
    pub fn new(state: &ParameterState) -> Self {
        let width = f64::from(state.width());
        let height = f64::from(state.height());
        Self {
            width,
            height,
            shift_x: state.longitude() / ParameterState::DEGREES_PER_TURN * width,
            shift_y: state.latitude() / ParameterState::DEGREES_PER_TURN * height,
        }
    }

    #[inline]
    pub fn project(&self, nx: f64, ny: f64) -> (i64, i64) {
        let x = (nx * self.width + self.shift_x).rem_euclid(self.width);
        let y = (ny * self.height + self.shift_y).rem_euclid(self.height);
        (x.floor() as i64, y.floor() as i64)
    }
}

/// Pinhole camera at the center of the celestial sphere.
///
/// Normalized star coordinates map to `λ = nx·2π`, `φ = (ny − 0.5)·π`. The
/// camera looks along the viewer's longitude/latitude; stars behind it
/// (`dz <= 0`) are culled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalProjector {
    width: f64,
    height: f64,
    lon: f64,
    sin_lat: f64,
    cos_lat: f64,
    /// `2 · tan(fov / 2)` for the horizontal and vertical axes.
    span_x: f64,
    span_y: f64,
}

impl SphericalProjector {
    pub fn new(state: &ParameterState, fov_degrees: f64) -> Self {
        let half_tan = (fov_degrees.to_radians() * 0.5).tan();
        let lat = state.latitude().to_radians();
        Self {
            width: f64::from(state.width()),
            height: f64::from(state.height()),
            lon: state.longitude().to_radians(),
            sin_lat: lat.sin(),
            cos_lat: lat.cos(),
            span_x: 2.0 * half_tan,
            span_y: 2.0 * half_tan / state.aspect_ratio(),
        }
    }

    pub fn project(&self, nx: f64, ny: f64) -> Option<(i64, i64)> {
        let star_lon = nx * 2.0 * PI;
        let star_lat = (ny - 0.5) * PI;
        let (sin_phi, cos_phi) = star_lat.sin_cos();
        let (sin_dl, cos_dl) = (star_lon - self.lon).sin_cos();

        let dx = cos_phi * sin_dl;
        let dy = cos_phi * cos_dl * self.sin_lat - sin_phi * self.cos_lat;
        let dz = cos_phi * cos_dl * self.cos_lat + sin_phi * self.sin_lat;
        if dz <= 0.0 {
            return None;
        }

        let x = self.width * (0.5 + dx / self.span_x);
        let y = self.height * (0.5 + dy / self.span_y);
        Some((x.floor() as i64, y.floor() as i64))
    }
}

/// Maps normalized star coordinates to bottom-up canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Flat(FlatProjector),
    Spherical(SphericalProjector),
}

impl Projection {
    pub fn for_state(state: &ParameterState, config: &GeneratorConfig) -> crate::Result<Self> {
        match state.render_type() {
            RenderType::Flat => Ok(Self::Flat(FlatProjector::new(state))),
            RenderType::Spherical => Ok(Self::Spherical(SphericalProjector::new(
                state,
                config.fov_degrees,
            ))),
            other => Err(RenderError::UnsupportedRenderMode(other.to_string())),
        }
    }

    /// Pixel position of a star center, or `None` if it is not visible.
    ///
    /// Flat positions always land on the canvas. Spherical positions may fall
    /// outside it and are left for the caller to clip.
    #[inline]
    pub fn project(&self, nx: f64, ny: f64) -> Option<(i64, i64)> {
        match self {
            Self::Flat(p) => Some(p.project(nx, ny)),
            Self::Spherical(p) => p.project(nx, ny),
        }
    }

    /// Whether shapes drawn across an edge continue on the opposite side.
    pub fn wraps(&self) -> bool {
        matches!(self, Self::Flat(_))
    }
}

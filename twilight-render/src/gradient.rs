//! The haze gradient and the star color ramp.
//!
//! Both are driven by the same sky phase `s = sin(2π · time / 24)`:
//!
//! - the haze band sits `clamp(1 + s, 0, 1) × height` rows below its fully
//!   risen position, so it is fully set while `s >= 0` and fully risen at
//!   `s = -1` (18:00);
//! - the star night factor is `(1 + s) / 2`, peaking at 06:00 where the haze
//!   is deepest below the horizon and vanishing at 18:00.
//!
//! Row coordinates here are bottom-up: row 0 is the horizon.

use std::f64::consts::TAU;

use rayon::prelude::*;

use twilight_core::ParameterState;

use crate::config::SkyPalette;

/// `sin(2π · time / 24)`.
#[inline]
pub fn sky_phase(time_of_day: f64) -> f64 {
    (TAU * time_of_day / ParameterState::HOURS_PER_DAY).sin()
}

/// How far below its risen position the haze band sits, as a fraction of
/// the canvas height in `[0, 1]`.
#[inline]
pub fn haze_offset(time_of_day: f64) -> f64 {
    (1.0 + sky_phase(time_of_day)).clamp(0.0, 1.0)
}

/// Star brightness multiplier in `[0, 1]`.
#[inline]
pub fn night_factor(time_of_day: f64) -> f64 {
    ((1.0 + sky_phase(time_of_day)) * 0.5).clamp(0.0, 1.0)
}

#[inline]
pub(crate) fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    [
        (a[0] as f64 * inv + b[0] as f64 * t).round() as u8,
        (a[1] as f64 * inv + b[1] as f64 * t).round() as u8,
        (a[2] as f64 * inv + b[2] as f64 * t).round() as u8,
    ]
}

#[inline]
fn scale_rgb(c: [u8; 3], factor: f64) -> [u8; 3] {
    let f = factor.clamp(0.0, 1.0);
    [
        (c[0] as f64 * f).round() as u8,
        (c[1] as f64 * f).round() as u8,
        (c[2] as f64 * f).round() as u8,
    ]
}

/// One RGBA color per bottom-up row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientLayer {
    pub rows: Vec<[u8; 4]>,
}

impl GradientLayer {
    /// Color of bottom-up row `y`; rows past the end are transparent.
    #[inline]
    pub fn row(&self, y: usize) -> [u8; 4] {
        self.rows.get(y).copied().unwrap_or([0, 0, 0, 0])
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// Build the haze layer for `state`.
///
/// Within the visible band the ramp runs warm → day over the first
/// `transition_ratio × warm_band_share` of the height (opaque), then day →
/// night with alpha falling to zero.
pub fn gradient_layer(state: &ParameterState, palette: &SkyPalette) -> GradientLayer {
    let height = f64::from(state.height());
    let offset = haze_offset(state.time_of_day()) * height;
    let warm = state.transition_ratio() * palette.warm_band_share;

    let rows = (0..state.height())
        .into_par_iter()
        .map(|y| {
            let ratio = (f64::from(y) + offset) / height;
            if ratio >= 1.0 {
                return [0, 0, 0, 0];
            }
            if ratio < warm {
                let [r, g, b] = lerp_rgb(palette.warm, palette.day, ratio / warm);
                [r, g, b, 255]
            } else {
                let u = ((ratio - warm) / (1.0 - warm)).clamp(0.0, 1.0);
                let [r, g, b] = lerp_rgb(palette.day, palette.night, u);
                [r, g, b, (255.0 * (1.0 - u)).round() as u8]
            }
        })
        .collect();

    GradientLayer { rows }
}

/// Color of a star whose center sits on bottom-up row `y`.
///
/// Stars inside the transition band take the warm → day ramp, stars above
/// it are `palette.star`; either way the result is dimmed by
/// [`night_factor`].
pub fn star_color(y: i64, state: &ParameterState, palette: &SkyPalette) -> [u8; 3] {
    let ratio = y as f64 / f64::from(state.height());
    let cutoff = state.transition_ratio();
    let base = if ratio < cutoff {
        lerp_rgb(palette.warm, palette.day, ratio / cutoff)
    } else {
        palette.star
    };
    scale_rgb(base, night_factor(state.time_of_day()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_at(time: f64) -> ParameterState {
        ParameterState::new(40, 100, 1)
            .unwrap()
            .with_time_of_day(time)
            .unwrap()
    }

    #[test]
    fn night_factor_extremes() {
        assert!((night_factor(6.0) - 1.0).abs() < 1e-12);
        assert!(night_factor(18.0).abs() < 1e-12);
        assert!((night_factor(0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn haze_is_set_while_phase_is_positive() {
        let layer = gradient_layer(&state_at(6.0), &SkyPalette::default());
        assert_eq!(layer.height(), 100);
        assert!(layer.rows.iter().all(|c| c[3] == 0));
    }

    #[test]
    fn risen_haze_starts_warm_at_the_horizon() {
        let palette = SkyPalette::default();
        let layer = gradient_layer(&state_at(18.0), &palette);
        let [r, g, b, a] = layer.row(0);
        assert_eq!([r, g, b], palette.warm);
        assert_eq!(a, 255);
        // Alpha falls off toward the top.
        assert!(layer.row(99)[3] < 10);
        for pair in layer.rows.windows(2) {
            assert!(pair[1][3] <= pair[0][3]);
        }
    }

    #[test]
    fn gradient_is_periodic_and_continuous() {
        let palette = SkyPalette::default();
        let a = gradient_layer(&state_at(20.0), &palette);
        let b = gradient_layer(&state_at(44.0), &palette);
        assert_eq!(a, b);

        let c = gradient_layer(&state_at(20.001), &palette);
        for (x, y) in a.rows.iter().zip(&c.rows) {
            for ch in 0..4 {
                assert!((x[ch] as i32 - y[ch] as i32).abs() <= 2);
            }
        }
    }

    #[test]
    fn gradient_ignores_seed_and_view() {
        let palette = SkyPalette::default();
        let a = state_at(19.0);
        let b = a
            .clone()
            .with_seed(999)
            .unwrap()
            .with_latitude(80.0)
            .unwrap()
            .with_star_density(4.0)
            .unwrap();
        assert_eq!(gradient_layer(&a, &palette), gradient_layer(&b, &palette));
    }

    #[test]
    fn star_colors_follow_band_and_night_factor() {
        let palette = SkyPalette::default();
        let midnight = state_at(6.0);
        assert_eq!(star_color(0, &midnight, &palette), palette.warm);
        assert_eq!(star_color(90, &midnight, &palette), palette.star);
        let daytime = state_at(18.0);
        assert_eq!(star_color(90, &daytime, &palette), [0, 0, 0]);
        let dusk = state_at(0.0);
        assert_eq!(star_color(90, &dusk, &palette), [128, 128, 128]);
    }
}

use twilight_core::{ParameterState, StarField};

use crate::buffer::StarCanvas;
use crate::config::GeneratorConfig;
use crate::gradient::star_color;
use crate::projection::Projection;

/// Draw every visible star of `field` onto a black, bottom-up canvas.
///
/// Small stars are single pixels. Big stars are filled diamonds of
/// half-diagonal `round(size × width)` pixels, drawn after the small stars.
/// Each star is colored from the row its center lands on.
pub fn star_layer(
    state: &ParameterState,
    field: &StarField,
    config: &GeneratorConfig,
) -> crate::Result<StarCanvas> {
    let mut canvas = StarCanvas::new(state.width(), state.height());
    let projection = Projection::for_state(state, config)?;
    let palette = &config.palette;

    for star in field.small_stars() {
        let Some((x, y)) = projection.project(star.x, star.y) else {
            continue;
        };
        if canvas.contains(x, y) {
            canvas.put(x, y, star_color(y, state, palette));
        }
    }

    let width = f64::from(state.width());
    let wraps = projection.wraps();
    for star in field.big_stars() {
        let Some((x, y)) = projection.project(star.x, star.y) else {
            continue;
        };
        if !canvas.contains(x, y) {
            continue;
        }
        let size = diamond_size(star.size, width);
        draw_diamond(&mut canvas, x, y, size, star_color(y, state, palette), wraps);
    }

    Ok(canvas)
}

/// Pixel half-diagonal of a big star. Sizes are whole pixels divided by the
/// width, so rounding recovers them exactly.
#[inline]
fn diamond_size(normalized: f64, width: f64) -> i64 {
    (normalized * width).round() as i64
}

/// Fill `|dx| + |dy| <= size` around `(cx, cy)`.
fn draw_diamond(
    canvas: &mut StarCanvas,
    cx: i64,
    cy: i64,
    size: i64,
    color: [u8; 3],
    wraps: bool,
) {
    let w = i64::from(canvas.width);
    let h = i64::from(canvas.height);
    for dy in -size..=size {
        let span = size - dy.abs();
        for dx in -span..=span {
            let (mut x, mut y) = (cx + dx, cy + dy);
            if wraps {
                x = x.rem_euclid(w);
                y = y.rem_euclid(h);
            }
            canvas.put(x, y, color);
        }
    }
}

use rayon::prelude::*;

use crate::buffer::{RasterImage, StarCanvas};
use crate::gradient::GradientLayer;

/// Alpha-composite the gradient over the opaque star canvas and flip the
/// bottom-up rows so that row 0 of the result is the top of the sky.
pub fn composite(canvas: &StarCanvas, gradient: &GradientLayer) -> RasterImage {
    let w = canvas.width;
    let h = canvas.height;
    let stride = (w as usize * 3).max(1);
    let mut pixels = vec![0u8; w as usize * h as usize * 3];

    pixels
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(out_row, row)| {
            let src_row = h - 1 - out_row as u32;
            let under = canvas.row(src_row).unwrap_or_default();
            let [gr, gg, gb, ga] = gradient.row(src_row as usize);
            let a = f64::from(ga) / 255.0;
            let over = [gr, gg, gb];
            for (dst, src) in row.chunks_exact_mut(3).zip(under.chunks_exact(3)) {
                for c in 0..3 {
                    dst[c] = blend(over[c], src[c], a);
                }
            }
        });

    RasterImage {
        width: w,
        height: h,
        pixels,
    }
}

#[inline]
fn blend(over: u8, under: u8, alpha: f64) -> u8 {
    (f64::from(over) * alpha + f64::from(under) * (1.0 - alpha)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_gradient_only_flips() {
        let mut canvas = StarCanvas::new(2, 3);
        canvas.put(1, 0, [200, 100, 50]);
        let gradient = GradientLayer {
            rows: vec![[0, 0, 0, 0]; 3],
        };
        let img = composite(&canvas, &gradient);
        assert_eq!(img.pixel(1, 2), Some([200, 100, 50]));
        assert_eq!(img.pixel(1, 0), Some([0, 0, 0]));
    }

    #[test]
    fn opaque_gradient_hides_stars() {
        let mut canvas = StarCanvas::new(2, 2);
        canvas.put(0, 1, [255, 255, 255]);
        let gradient = GradientLayer {
            rows: vec![[10, 20, 30, 255], [40, 50, 60, 255]],
        };
        let img = composite(&canvas, &gradient);
        // Bottom-up row 1 is the top output row.
        assert_eq!(img.pixel(0, 0), Some([40, 50, 60]));
        assert_eq!(img.pixel(1, 1), Some([10, 20, 30]));
    }

    #[test]
    fn half_alpha_mixes_evenly() {
        let mut canvas = StarCanvas::new(1, 1);
        canvas.put(0, 0, [200, 0, 100]);
        let gradient = GradientLayer {
            rows: vec![[0, 200, 100, 128]],
        };
        let img = composite(&canvas, &gradient);
        let a = 128.0 / 255.0;
        let expect = |o: f64, u: f64| (o * a + u * (1.0 - a)).round() as u8;
        assert_eq!(
            img.pixel(0, 0),
            Some([expect(0.0, 200.0), expect(200.0, 0.0), expect(100.0, 100.0)])
        );
    }

    #[test]
    fn empty_canvas_composites_to_empty_image() {
        let img = composite(&StarCanvas::new(0, 0), &GradientLayer { rows: Vec::new() });
        assert!(img.pixels.is_empty());
    }
}

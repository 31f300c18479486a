/// A finished RGB image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// RGB pixel data, 3 bytes per pixel, row-major, top row first.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Create a black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 3],
        }
    }

    /// RGB value at `(x, y)`, with `y = 0` the top row.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// One row of RGB triples, or `None` past the bottom edge.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width as usize * 3;
        let start = y as usize * stride;
        self.pixels.get(start..start + stride)
    }

    /// Copy into an [`image::RgbImage`] for encoding by the caller.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }
}

/// Opaque RGB canvas the stars are drawn onto.
///
/// Rows are stored bottom-up: row 0 is the horizon. The compositor flips
/// them when producing the final [`RasterImage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarCanvas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl StarCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 3],
        }
    }

    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// Write a pixel. Coordinates outside the canvas are ignored.
    #[inline]
    pub fn put(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if !self.contains(x, y) {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[idx..idx + 3].copy_from_slice(&color);
    }

    pub fn get(&self, x: i64, y: i64) -> Option<[u8; 3]> {
        if !self.contains(x, y) {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    /// Bottom-up row `y`, or `None` past the top edge.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width as usize * 3;
        let start = y as usize * stride;
        self.pixels.get(start..start + stride)
    }

    /// Number of non-black pixels.
    pub fn lit_pixels(&self) -> usize {
        self.pixels
            .chunks_exact(3)
            .filter(|px| px.iter().any(|&c| c > 0))
            .count()
    }
}

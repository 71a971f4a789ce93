//! CPU surface for painting - premultiplied RGBA float storage

use image::RgbaImage;

/// A premultiplied RGBA CPU surface
/// Stores pixels as [f32; 4] in row-major order
#[derive(Clone, PartialEq)]
pub struct CpuSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order, each pixel is premultiplied [r, g, b, a]
    pixels: Vec<[f32; 4]>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; pixel_count],
        }
    }

    /// Resize the surface, discarding its contents
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize((width as usize) * (height as usize), [0.0, 0.0, 0.0, 0.0]);
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Clear the surface to a solid color
    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set a pixel at the given coordinates
    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Set pixels `x_start..x_end` of row `y`, clipped to the surface
    pub fn fill_span(&mut self, y: u32, x_start: u32, x_end: u32, color: [f32; 4]) {
        let x_end = x_end.min(self.width);
        if y >= self.height || x_start >= x_end {
            return;
        }
        let row = (y as usize) * (self.width as usize);
        self.pixels[row + x_start as usize..row + x_end as usize].fill(color);
    }

    /// Composite a premultiplied color over a pixel, scaled by coverage
    /// Formula: out = src * coverage + dst * (1 - src_alpha * coverage)
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4], coverage: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        self.pixels[i] = over(scale(color, coverage), self.pixels[i]);
    }

    /// Erase a pixel (destination-out)
    /// The erase_amount (0-1) determines how much of the pixel is removed
    #[inline]
    pub fn erase_pixel(&mut self, x: u32, y: u32, erase_amount: f32) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        let remaining = (1.0 - erase_amount).clamp(0.0, 1.0);
        self.pixels[i] = scale(self.pixels[i], remaining);
    }

    /// Composite `src` over this surface. Both must have the same size;
    /// pixels outside the overlap are left untouched.
    pub fn composite_over(&mut self, src: &CpuSurface) {
        if src.size() == self.size() {
            for (dst, src) in self.pixels.iter_mut().zip(&src.pixels) {
                if src[3] > 0.0 {
                    *dst = over(*src, *dst);
                }
            }
            return;
        }
        let w = self.width.min(src.width);
        let h = self.height.min(src.height);
        for y in 0..h {
            for x in 0..w {
                if let Some(s) = src.get_pixel(x, y) {
                    self.blend_pixel(x, y, s, 1.0);
                }
            }
        }
    }

    /// Convert to 8-bit straight-alpha RGBA bytes
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &[r, g, b, a] in &self.pixels {
            let (r, g, b) = if a > 0.0 {
                (r / a, g / a, b / a)
            } else {
                (0.0, 0.0, 0.0)
            };
            out.extend_from_slice(&[to_u8(r), to_u8(g), to_u8(b), to_u8(a)]);
        }
        out
    }

    /// Convert to an `image` buffer for encoding
    pub fn to_image(&self) -> RgbaImage {
        // Length always matches width * height * 4
        RgbaImage::from_raw(self.width, self.height, self.to_rgba8())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Get direct access to pixel data
    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }
}

#[inline]
fn scale(c: [f32; 4], k: f32) -> [f32; 4] {
    [c[0] * k, c[1] * k, c[2] * k, c[3] * k]
}

#[inline]
fn over(src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
    let inv = 1.0 - src[3];
    [
        src[0] + dst[0] * inv,
        src[1] + dst[1] * inv,
        src[2] + dst[2] * inv,
        src[3] + dst[3] * inv,
    ]
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

//! Float RGBA pixel buffers for environment maps.
//!
//! Analysis always runs on top-left origin buffers. Sources that store the
//! bottom row first declare [`Orientation::BottomLeft`] and are flipped on
//! construction, so the rest of the crate never sees that convention.

use std::path::Path;

use crate::core::{Error, Result};

/// Which row a source buffer stores first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Row 0 is the top of the image
    #[default]
    TopLeft,
    /// Row 0 is the bottom of the image
    BottomLeft,
}

/// Row-major RGBA float pixels with row 0 at the top
#[derive(Clone, Debug, PartialEq)]
pub struct HdriBuffer {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 4]>,
}

impl HdriBuffer {
    /// Wrap `width * height` pixels stored in `orientation` order
    pub fn from_pixels(
        width: usize,
        height: usize,
        mut pixels: Vec<[f32; 4]>,
        orientation: Orientation,
    ) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(Error::Buffer(format!(
                "expected {}x{} = {} pixels, got {}",
                width,
                height,
                width * height,
                pixels.len()
            )));
        }
        if orientation == Orientation::BottomLeft {
            flip_rows(&mut pixels, width);
        }
        Ok(Self { width, height, pixels })
    }

    /// Wrap interleaved RGBA floats, four per pixel
    pub fn from_raw(width: usize, height: usize, data: &[f32], orientation: Orientation) -> Result<Self> {
        if data.len() % 4 != 0 {
            return Err(Error::Buffer(format!(
                "interleaved RGBA data length {} is not a multiple of 4",
                data.len()
            )));
        }
        let pixels: &[[f32; 4]] = bytemuck::cast_slice(data);
        Self::from_pixels(width, height, pixels.to_vec(), orientation)
    }

    /// All-black buffer
    pub fn black(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 1.0]; width * height],
        }
    }

    /// Decode an image file (EXR, Radiance HDR, PNG, ...) into float RGBA.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading HDRI {}", path.display());
        let image = image::open(path)?.into_rgba32f();
        let (width, height) = image.dimensions();
        // The decoder hands rows out top first
        Self::from_raw(width as usize, height as usize, image.as_raw(), Orientation::TopLeft)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y` (row 0 at the top)
    pub fn pixel(&self, x: usize, y: usize) -> [f32; 4] {
        self.pixels[y * self.width + x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [f32; 4]) {
        self.pixels[y * self.width + x] = rgba;
    }

    /// One row of pixels
    pub fn row(&self, y: usize) -> &[[f32; 4]] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }
}

fn flip_rows(pixels: &mut [[f32; 4]], width: usize) {
    if width == 0 {
        return;
    }
    let rows = pixels.len() / width;
    for y in 0..rows / 2 {
        let (top, bottom) = pixels.split_at_mut((rows - 1 - y) * width);
        top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: usize, height: usize) -> Vec<[f32; 4]> {
        (0..width * height).map(|i| [i as f32, 0.0, 0.0, 1.0]).collect()
    }

    #[test]
    fn test_bottom_left_is_flipped() {
        let buf = HdriBuffer::from_pixels(2, 3, numbered(2, 3), Orientation::BottomLeft).unwrap();
        // Stored bottom row [4, 5] becomes row 0
        assert_eq!(buf.pixel(0, 0)[0], 4.0);
        assert_eq!(buf.pixel(1, 0)[0], 5.0);
        assert_eq!(buf.pixel(0, 1)[0], 2.0);
        assert_eq!(buf.pixel(0, 2)[0], 0.0);
    }

    #[test]
    fn test_top_left_is_kept() {
        let buf = HdriBuffer::from_pixels(2, 2, numbered(2, 2), Orientation::TopLeft).unwrap();
        assert_eq!(buf.row(1), &[[2.0, 0.0, 0.0, 1.0], [3.0, 0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        assert!(HdriBuffer::from_pixels(3, 3, numbered(2, 2), Orientation::TopLeft).is_err());
        assert!(HdriBuffer::from_raw(1, 1, &[1.0, 2.0, 3.0], Orientation::TopLeft).is_err());
    }

    #[test]
    fn test_from_raw_interleaved() {
        let data = [1.0, 2.0, 3.0, 1.0, 4.0, 5.0, 6.0, 1.0];
        let buf = HdriBuffer::from_raw(2, 1, &data, Orientation::TopLeft).unwrap();
        assert_eq!(buf.pixel(1, 0), [4.0, 5.0, 6.0, 1.0]);
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sky.png");
        let mut img = image::RgbaImage::new(4, 3);
        img.put_pixel(1, 0, image::Rgba([255, 255, 255, 255]));
        img.save(&path).unwrap();

        let buf = HdriBuffer::load(&path).unwrap();
        assert_eq!((buf.width(), buf.height()), (4, 3));
        assert!((buf.pixel(1, 0)[0] - 1.0).abs() < 1e-6);
        assert_eq!(buf.pixel(1, 2)[0], 0.0);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(HdriBuffer::load("/nonexistent/sky.exr").is_err());
    }
}

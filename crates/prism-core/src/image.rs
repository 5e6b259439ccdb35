//! Raster input abstraction and 8-bit channel conversion.
//!
//! The applicator reads pixels through [`PixelSource`] so any decoded image
//! can be graded without copying. Conversions between stored 8-bit values
//! and floats go through `palette`'s sRGB type with no transfer function:
//! `v / 255` on the way in, `round(clamp(v) × 255)` on the way out.

use ::image::{DynamicImage, GenericImageView, Rgba32FImage, RgbaImage};
use palette::{Srgb, Srgba};

use crate::lut::lattice::Sample;

/// A read-only raster exposing normalized RGBA.
///
/// `Sync` because rows are read concurrently while grading.
pub trait PixelSource: Sync {
    /// `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// RGBA at `(x, y)`, each channel in [0, 1].
    fn rgba(&self, x: u32, y: u32) -> [f32; 4];
}

impl PixelSource for RgbaImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn rgba(&self, x: u32, y: u32) -> [f32; 4] {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        let c: Srgba<f32> = Srgba::new(r, g, b, a).into_format();
        [c.red, c.green, c.blue, c.alpha]
    }
}

impl PixelSource for Rgba32FImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn rgba(&self, x: u32, y: u32) -> [f32; 4] {
        self.get_pixel(x, y).0
    }
}

/// Per-pixel conversion through 8-bit RGBA. Convert to [`Rgba32FImage`]
/// first to keep 16-bit and float precision.
impl PixelSource for DynamicImage {
    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rgba(&self, x: u32, y: u32) -> [f32; 4] {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        let c: Srgba<f32> = Srgba::new(r, g, b, a).into_format();
        [c.red, c.green, c.blue, c.alpha]
    }
}

/// Stored 8-bit RGB to a [0, 1] sample.
pub fn unit_from_u8(rgb: [u8; 3]) -> Sample {
    let c: Srgb<f32> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_format();
    Sample::new(c.red, c.green, c.blue)
}

/// Saturate a sample to [0, 1] and quantize to 8 bits per channel.
pub fn quantize_rgb(s: Sample) -> [u8; 3] {
    let s = s.clamp(Sample::ZERO, Sample::ONE);
    let c: Srgb<u8> = Srgb::new(s.x, s.y, s.z).into_format();
    [c.red, c.green, c.blue]
}

/// [`quantize_rgb`] with a pass-through alpha in [0, 1].
pub fn quantize_rgba(s: Sample, alpha: f32) -> [u8; 4] {
    let [r, g, b] = quantize_rgb(s);
    let a: Srgba<u8> = Srgba::new(0.0, 0.0, 0.0, alpha.clamp(0.0, 1.0)).into_format();
    [r, g, b, a.alpha]
}

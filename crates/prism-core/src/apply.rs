//! Parallel application of a LUT to a raster image.
//!
//! One rayon task per output row. Every task owns a disjoint `&mut [u8]`
//! row of the output buffer and only reads the shared lattice and source,
//! so no locking is needed. The parallel iterator joins before returning.
//!
//! Per pixel, with `t` the intensity clamped to [0, 1]:
//! ```text
//! in  = domain_min + rgb × range
//! out = (lerp(in, lut(in), t) − domain_min) / range
//! ```
//! then saturated and quantized to 8 bits. Alpha passes through.

use ::image::RgbaImage;
use rayon::prelude::*;

use crate::format::hald::Hald;
use crate::image::{PixelSource, quantize_rgba};
use crate::lut::lattice::{Lattice, Sample};

/// Uniform grading capability shared by every LUT representation.
pub trait LutApplicator {
    /// Grade `source` at full intensity.
    fn apply(&self, source: &dyn PixelSource) -> RgbaImage {
        self.apply_scaled(source, 1.0)
    }

    /// Grade `source`, blending toward the untouched input as `intensity`
    /// drops from 1 to 0.
    fn apply_scaled(&self, source: &dyn PixelSource, intensity: f32) -> RgbaImage;
}

impl LutApplicator for Lattice {
    fn apply_scaled(&self, source: &dyn PixelSource, intensity: f32) -> RgbaImage {
        apply_lattice(self, source, intensity)
    }
}

impl LutApplicator for Hald {
    fn apply_scaled(&self, source: &dyn PixelSource, intensity: f32) -> RgbaImage {
        apply_lattice(self.lattice(), source, intensity)
    }
}

/// Grade every pixel of `source` through `lut`.
///
/// A NaN intensity is treated as 0 and leaves the image untouched.
pub fn apply_lattice(lut: &Lattice, source: &dyn PixelSource, intensity: f32) -> RgbaImage {
    let intensity = if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 1.0)
    };

    let (width, height) = source.size();
    let mut out = RgbaImage::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let row_len = width as usize * 4;
    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| process_row(lut, source, y as u32, row, intensity));

    tracing::debug!(width, height, intensity, level = lut.level(), "applied LUT");
    out
}

fn process_row(lut: &Lattice, source: &dyn PixelSource, y: u32, row: &mut [u8], intensity: f32) {
    for (x, px) in row.chunks_exact_mut(4).enumerate() {
        let [r, g, b, a] = source.rgba(x as u32, y);
        let graded = lut.transform(Sample::new(r, g, b), intensity);
        px.copy_from_slice(&quantize_rgba(graded, a));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{Rgba, Rgba32FImage};

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                (x * 255 / (width - 1)) as u8,
                (y * 255 / (height - 1)) as u8,
                ((x + y) * 7 % 256) as u8,
                (200 - x % 50) as u8,
            ])
        })
    }

    #[test]
    fn test_identity_preserves_image() {
        let source = gradient(37, 23);
        for level in [2, 5, 17] {
            let lut = Lattice::identity(level).unwrap();
            let out = lut.apply(&source);
            assert_eq!(out.dimensions(), source.dimensions());
            for (a, b) in source.pixels().zip(out.pixels()) {
                for c in 0..4 {
                    assert!(a.0[c].abs_diff(b.0[c]) <= 1, "level {level}: {a:?} vs {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_identity_keeps_pure_red() {
        let source = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        let out = Lattice::identity(2).unwrap().apply(&source);
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_invert_lut() {
        let lut = Lattice::identity(2).unwrap().map_samples(|s| Sample::ONE - s);
        let source = RgbaImage::from_pixel(3, 2, Rgba([255, 51, 0, 77]));
        let out = lut.apply(&source);
        for px in out.pixels() {
            assert_eq!(px.0, [0, 204, 255, 77]);
        }
    }

    #[test]
    fn test_intensity_blends_with_original() {
        let lut = Lattice::identity(2).unwrap().map_samples(|_| Sample::ZERO);
        let source = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255]));

        let half = lut.apply_scaled(&source, 0.5);
        assert_eq!(half.get_pixel(0, 0).0, [100, 50, 25, 255]);

        let none = lut.apply_scaled(&source, 0.0);
        assert_eq!(none.get_pixel(0, 0).0, [200, 100, 50, 255]);
    }

    #[test]
    fn test_intensity_out_of_range_is_clamped() {
        let lut = Lattice::identity(2).unwrap().map_samples(|_| Sample::ZERO);
        let source = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255]));
        assert_eq!(lut.apply_scaled(&source, 4.0), lut.apply(&source));
        assert_eq!(lut.apply_scaled(&source, -1.0), source);
        assert_eq!(lut.apply_scaled(&source, f32::NAN), source);
    }

    #[test]
    fn test_non_unit_domain_roundtrips_through_domain() {
        let identity = Lattice::identity(3).unwrap();
        let lut = Lattice::new(
            3,
            Sample::splat(-1.0),
            Sample::splat(1.0),
            identity.samples().iter().map(|s| *s * 2.0 - 1.0).collect(),
        )
        .unwrap();
        let source = gradient(9, 9);
        let out = lut.apply(&source);
        for (a, b) in source.pixels().zip(out.pixels()) {
            for c in 0..3 {
                assert!(a.0[c].abs_diff(b.0[c]) <= 1);
            }
        }
    }

    #[test]
    fn test_float_source() {
        let source = Rgba32FImage::from_pixel(2, 2, Rgba([0.25, 0.5, 0.75, 1.0]));
        let out = Lattice::identity(5).unwrap().apply(&source);
        assert_eq!(out.get_pixel(1, 1).0, [64, 128, 191, 255]);
    }

    #[test]
    fn test_hald_and_lattice_grade_alike() {
        let hald = Hald::identity(2).unwrap();
        let source = gradient(16, 8);
        let via_hald: &dyn LutApplicator = &hald;
        let via_lattice: &dyn LutApplicator = hald.lattice();
        assert_eq!(via_hald.apply(&source), via_lattice.apply(&source));
    }

    #[test]
    fn test_empty_image() {
        let source = RgbaImage::new(0, 0);
        let out = Lattice::identity(2).unwrap().apply(&source);
        assert_eq!(out.dimensions(), (0, 0));
    }
}

//! HALD image-LUT codec.
//!
//! A HALD of level L stores a lattice with `L²` points per axis in a square
//! image of side `L³` (so `L⁶` pixels for `L⁶` samples). Pixels are read in
//! row-major order and the pixel index equals the lattice flat index:
//! ```text
//! cube = L²,  side = L³
//! idx  = r + g×cube + b×cube²
//! x    = idx mod side
//! y    = idx div side
//! ```
//! The domain is fixed to [0, 1]. Dimension validation in [`hald_level`]
//! is the single authority on which images are accepted.

use std::io::{BufRead, Seek, Write};
use std::path::Path;

use ::image::codecs::png::PngEncoder;
use ::image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, Rgb, RgbImage};

use crate::error::{LutError, Result};
use crate::image::{quantize_rgb, unit_from_u8};
use crate::lut::lattice::{Lattice, Sample};

/// A lattice held in HALD layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Hald {
    level: u32,
    lattice: Lattice,
}

impl Hald {
    /// The neutral HALD of the given level.
    pub fn identity(level: u32) -> Result<Self> {
        check_level(level)?;
        let lattice = Lattice::identity(cube_size(level)?)?;
        Ok(Self { level, lattice })
    }

    /// Decode a HALD from an image, validating its dimensions.
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        let level = hald_level(image.width(), image.height())?;
        let rgb = image.to_rgb8();
        let samples = rgb.pixels().map(|p| unit_from_u8(p.0)).collect();
        let lattice = Lattice::with_unit_domain(cube_size(level)?, samples)?;
        tracing::debug!(level, side = image.width(), "decoded HALD image");
        Ok(Self { level, lattice })
    }

    /// Wrap a lattice as a HALD of the given level.
    ///
    /// A lattice that already has `level²` points over [0, 1] is taken
    /// as-is; anything else is resampled onto the HALD grid.
    pub fn from_lattice(lattice: &Lattice, level: u32) -> Result<Self> {
        check_level(level)?;
        let cube = cube_size(level)?;
        let fits = lattice.level() == cube
            && lattice.domain_min() == Sample::ZERO
            && lattice.domain_max() == Sample::ONE;
        let lattice = if fits {
            lattice.clone()
        } else {
            lattice.resample(cube)?
        };
        Ok(Self { level, lattice })
    }

    /// HALD level L (not the lattice level, which is L²).
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Side length of the encoded image. Every constructor has already
    /// checked that `L³` fits in a `u32`.
    pub fn side(&self) -> u32 {
        self.level.saturating_pow(3)
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn into_lattice(self) -> Lattice {
        self.lattice
    }

    /// Weighted blend of two HALDs of the same level.
    pub fn blend(&self, other: &Hald, w1: f32, w2: f32) -> Result<Hald> {
        if self.level != other.level {
            return Err(LutError::DifferentLevels {
                left: self.level as usize,
                right: other.level as usize,
            });
        }
        let lattice = self.lattice.blend(&other.lattice, w1, w2)?;
        Ok(Hald {
            level: self.level,
            lattice,
        })
    }

    /// Encode as an 8-bit RGB image.
    pub fn to_image(&self) -> RgbImage {
        let side = self.side();
        let mut image = RgbImage::new(side, side);
        for (px, &s) in image.pixels_mut().zip(self.lattice.samples()) {
            *px = Rgb(quantize_rgb(s));
        }
        image
    }

    /// Decode a HALD from PNG data.
    pub fn load<R: BufRead + Seek>(reader: R) -> Result<Self> {
        let image = ::image::load(reader, ImageFormat::Png)?;
        Self::from_image(&image)
    }

    /// Decode a HALD from an image file; the format follows the extension.
    pub fn load_file(path: &Path) -> Result<Self> {
        let image = ::image::open(path)?;
        Self::from_image(&image)
    }

    /// Encode as PNG into any writer.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<()> {
        let image = self.to_image();
        PngEncoder::new(writer).write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(())
    }

    /// Save as a PNG file regardless of the path's extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_image().save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

/// Lattice points per axis for a HALD level.
pub fn cube_size(level: u32) -> Result<usize> {
    (level as usize)
        .checked_pow(2)
        .ok_or(LutError::InvalidLevel(level as usize))
}

/// A level is usable when it is at least 2 and its image side `L³` is
/// representable as an image dimension.
fn check_level(level: u32) -> Result<()> {
    if level < 2 || level.checked_pow(3).is_none() {
        return Err(LutError::InvalidLevel(level as usize));
    }
    Ok(())
}

/// The HALD level encoded by an image of the given dimensions.
///
/// The image must be square with side `L³` for an integer `L >= 2`.
pub fn hald_level(width: u32, height: u32) -> Result<u32> {
    if width == 0 || height == 0 {
        return Err(LutError::EmptyInput("image has no pixels"));
    }
    let invalid = LutError::InvalidDimensions { width, height };
    if width != height {
        return Err(invalid);
    }
    let level = f64::from(width).cbrt().round() as u32;
    if level < 2 || level.checked_pow(3) != Some(width) {
        return Err(invalid);
    }
    Ok(level)
}

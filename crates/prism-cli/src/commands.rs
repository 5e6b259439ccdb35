//! Subcommand implementations. All LUT math lives in `prism-core`.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use prism_core::format::grid;
use prism_core::{Hald, Lattice, LutApplicator, LutError};

use crate::cli::{ApplyArgs, BlendArgs, ConvertArgs, InfoArgs};
use crate::config::AppConfig;

/// Errors surfaced to the user by the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Lut(#[from] LutError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported LUT type: {}", .0.display())]
    UnsupportedLut(PathBuf),
    #[error("unsupported image format: {}", .0.display())]
    UnsupportedImage(PathBuf),
    #[error("unsupported conversion from {from:?} to {to:?}")]
    UnsupportedConversion { from: String, to: String },
}

/// On-disk LUT flavours, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LutKind {
    Grid,
    Hald,
}

impl LutKind {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        match extension(path).as_str() {
            "cube" => Ok(Self::Grid),
            "png" => Ok(Self::Hald),
            _ => Err(CliError::UnsupportedLut(path.to_path_buf())),
        }
    }
}

/// Load any supported LUT behind the uniform applicator interface.
pub fn load_applicator(path: &Path) -> Result<Box<dyn LutApplicator>, CliError> {
    Ok(match LutKind::from_path(path)? {
        LutKind::Grid => Box::new(grid::load_file(path)?),
        LutKind::Hald => Box::new(Hald::load_file(path)?),
    })
}

/// Load any supported LUT as a plain lattice.
pub fn load_lattice(path: &Path) -> Result<Lattice, CliError> {
    Ok(match LutKind::from_path(path)? {
        LutKind::Grid => grid::load_file(path)?,
        LutKind::Hald => Hald::load_file(path)?.into_lattice(),
    })
}

pub fn apply(args: ApplyArgs, config: &AppConfig) -> Result<(), CliError> {
    let lut = load_applicator(&args.lut.path)?;
    let source = image::open(&args.image)?.to_rgba32f();
    let output = args.output.unwrap_or_else(|| default_output(&args.image));

    tracing::info!(
        "applying {} at intensity {} to {}",
        args.lut.path.display(),
        args.lut.intensity,
        args.image.display()
    );
    let graded = lut.apply_scaled(&source, args.lut.intensity);
    save_image(&graded, &output, config.jpeg_quality)?;
    tracing::info!("wrote {}", output.display());
    Ok(())
}

pub fn convert(args: ConvertArgs, config: &AppConfig) -> Result<(), CliError> {
    let from = LutKind::from_path(&args.input)?;
    let to = LutKind::from_path(&args.output)?;

    match (from, to) {
        (LutKind::Grid, LutKind::Hald) => {
            let level = args.level.unwrap_or(config.hald_level);
            let lattice = grid::load_file(&args.input)?;
            let hald = Hald::from_lattice(&lattice, level)?;
            hald.save(&args.output)?;
            tracing::info!("wrote HALD level {level} to {}", args.output.display());
        }
        (LutKind::Hald, LutKind::Grid) => {
            let mut lattice = Hald::load_file(&args.input)?.into_lattice();
            lattice.title = args.title;
            grid::save(&lattice, &args.output)?;
            tracing::info!(
                "wrote {}³ grid to {}",
                lattice.level(),
                args.output.display()
            );
        }
        _ => {
            return Err(CliError::UnsupportedConversion {
                from: extension(&args.input),
                to: extension(&args.output),
            });
        }
    }
    Ok(())
}

pub fn blend(args: BlendArgs) -> Result<(), CliError> {
    let first = grid::load_file(&args.first.path)?;
    let second = grid::load_file(&args.second.path)?;

    let mut blended = first.blend(&second, args.first.intensity, args.second.intensity)?;
    if args.clamp {
        blended = blended.clamp();
    }
    if args.rescale {
        blended = blended.rescale();
    }
    if let Some(title) = args.title {
        blended.title = Some(title);
    }

    match args.output {
        Some(path) => {
            grid::save(&blended, &path)?;
            tracing::info!("wrote {}", path.display());
        }
        None => grid::write(&blended, io::stdout().lock())?,
    }
    Ok(())
}

pub fn info(args: InfoArgs) -> Result<(), CliError> {
    let lattice = load_lattice(&args.lut)?;
    println!("{}", serde_json::to_string_pretty(&lattice.summary())?);
    Ok(())
}

/// `dir/photo.jpg` → `dir/photo.prism.jpg`.
pub fn default_output(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match image.extension() {
        Some(ext) => format!("{stem}.prism.{}", ext.to_string_lossy()),
        None => format!("{stem}.prism"),
    };
    image.with_file_name(name)
}

/// Encode by output extension. JPEG drops alpha.
fn save_image(image: &RgbaImage, path: &Path, jpeg_quality: u8) -> Result<(), CliError> {
    match extension(path).as_str() {
        "png" => image.save_with_format(path, ImageFormat::Png)?,
        "jpg" | "jpeg" => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let writer = BufWriter::new(File::create(path)?);
            JpegEncoder::new_with_quality(writer, jpeg_quality).encode_image(&rgb)?;
        }
        _ => return Err(CliError::UnsupportedImage(path.to_path_buf())),
    }
    Ok(())
}

fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

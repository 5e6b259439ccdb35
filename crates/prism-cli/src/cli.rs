//! Command-line surface.

use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "prism", version, about = "Apply, convert and blend 3D color LUTs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply a LUT (.cube or HALD .png) to an image
    Apply(ApplyArgs),
    /// Convert between .cube and HALD .png
    Convert(ConvertArgs),
    /// Blend two .cube LUTs together
    Blend(BlendArgs),
    /// Print a JSON summary of a LUT
    Info(InfoArgs),
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Write output to FILE (default: IMAGE.prism.EXT)
    #[arg(short, long = "out", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// LUT file with optional intensity in [0, 1]
    #[arg(value_name = "LUT[:INTENSITY]")]
    pub lut: LutSpec,

    /// Input image (PNG or JPEG)
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Title for the generated .cube
    #[arg(short, long)]
    pub title: Option<String>,

    /// HALD level for .cube to .png (default: PRISM_HALD_LEVEL or 12)
    #[arg(short, long)]
    pub level: Option<u32>,

    /// Input LUT file
    #[arg(value_name = "LUT")]
    pub input: PathBuf,

    /// Output LUT file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct BlendArgs {
    /// Remap the result from its domain to [0, 1]
    #[arg(short, long)]
    pub clamp: bool,

    /// Stretch the result's value range over its domain
    #[arg(short, long)]
    pub rescale: bool,

    /// Write output to FILE instead of stdout
    #[arg(short, long = "out", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Title for the blended LUT
    #[arg(short, long)]
    pub title: Option<String>,

    /// First LUT with optional weight
    #[arg(value_name = "LUT1[:INTENSITY1]")]
    pub first: LutSpec,

    /// Second LUT with optional weight
    #[arg(value_name = "LUT2[:INTENSITY2]")]
    pub second: LutSpec,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// LUT file (.cube or HALD .png)
    #[arg(value_name = "LUT")]
    pub lut: PathBuf,
}

/// A LUT path with an optional `:INTENSITY` suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct LutSpec {
    pub path: PathBuf,
    pub intensity: f32,
}

impl FromStr for LutSpec {
    type Err = Infallible;

    /// The text after the last `:` is an intensity only if it parses as a
    /// number. Otherwise the whole argument is the path, so paths that
    /// contain colons survive; intensity is then 1.0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .rsplit_once(':')
            .and_then(|(path, suffix)| Some((path, suffix.parse::<f32>().ok()?)));
        let (path, intensity) = split.unwrap_or((s, 1.0));
        Ok(Self {
            path: PathBuf::from(path),
            intensity,
        })
    }
}

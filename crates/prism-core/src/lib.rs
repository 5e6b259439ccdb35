//! Prism Core — 3D color LUT model, codecs and image application.
//!
//! This crate contains the lattice data model, trilinear evaluation, LUT
//! combination operators, the `.cube` grid and HALD image codecs, and the
//! parallel per-pixel applicator. No CLI or file-naming concerns.

pub mod apply;
pub mod error;
pub mod format;
pub mod image;
pub mod lut;

// Re-exports for convenience.
pub use apply::LutApplicator;
pub use error::{LutError, Result};
pub use format::hald::Hald;
pub use crate::image::PixelSource;
pub use lut::lattice::{Lattice, Sample};

//! On-disk LUT codecs: the `.cube` text grid and the HALD image.

pub mod grid;
pub mod hald;

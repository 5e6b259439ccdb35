//! Error type shared by every LUT operation.

/// Every recoverable failure a LUT operation can produce.
///
/// Parse and dimension failures are structural: retrying with the same
/// input will fail the same way.
#[derive(Debug, thiserror::Error)]
pub enum LutError {
    #[error("invalid image-LUT dimensions {width}x{height}: expected a square image of side L³")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
    #[error("invalid lattice level {0}: must be at least 2")]
    InvalidLevel(usize),
    #[error("invalid domain: max must be greater than min on every channel")]
    InvalidDomain,
    #[error("invalid blend weights {0} and {1}: their sum must be positive")]
    InvalidWeights(f32, f32),
    #[error("different LUT levels: {left} vs {right}")]
    DifferentLevels { left: usize, right: usize },
    #[error("sample count mismatch: expected {expected}, found {found}")]
    SampleCountMismatch { expected: usize, found: usize },
    #[error("missing LUT_3D_SIZE declaration")]
    MissingSize,
    #[error("unrecognised line {line}: {content:?}")]
    UnrecognizedLine { line: usize, content: String },
    #[error("malformed field {field:?} on line {line}")]
    MalformedField { line: usize, field: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] ::image::ImageError),
}

pub type Result<T> = std::result::Result<T, LutError>;

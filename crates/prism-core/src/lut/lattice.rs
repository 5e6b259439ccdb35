//! The N×N×N sample lattice underlying every LUT.
//!
//! Samples are stored flat with red varying fastest:
//! ```text
//! idx(r, g, b) = r + g×N + b×N²
//! ```
//! Both codecs and the interpolator go through this single linearization.

use glam::Vec3;
use serde::Serialize;

use crate::error::{LutError, Result};

/// A single RGB triple. `x` = R, `y` = G, `z` = B.
///
/// Values are unconstrained and may leave [0, 1] while LUTs are being
/// combined, until a `clamp` or `rescale` brings them back.
pub type Sample = Vec3;

/// A 3D lookup table: `level³` samples over a per-channel input domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    /// Optional name, emitted as `TITLE` by the grid codec.
    pub title: Option<String>,
    /// Free-form `#` comment lines, kept verbatim.
    pub comments: Vec<String>,
    level: usize,
    domain_min: Sample,
    domain_max: Sample,
    samples: Vec<Sample>,
}

impl Lattice {
    /// Build a lattice from a flat sample sequence in `idx(r, g, b)` order.
    ///
    /// Fails if `level < 2` or `level³` overflows, if the sequence is empty
    /// or not exactly `level³` long, or if the domain is empty on any channel.
    pub fn new(
        level: usize,
        domain_min: Sample,
        domain_max: Sample,
        samples: Vec<Sample>,
    ) -> Result<Self> {
        if level < 2 {
            return Err(LutError::InvalidLevel(level));
        }
        if samples.is_empty() {
            return Err(LutError::EmptyInput("lattice has no samples"));
        }
        let expected = level.checked_pow(3).ok_or(LutError::InvalidLevel(level))?;
        if samples.len() != expected {
            return Err(LutError::SampleCountMismatch {
                expected,
                found: samples.len(),
            });
        }
        let bounds_ok = domain_min.is_finite()
            && domain_max.is_finite()
            && domain_max.cmpgt(domain_min).all();
        if !bounds_ok {
            return Err(LutError::InvalidDomain);
        }

        Ok(Self {
            title: None,
            comments: Vec::new(),
            level,
            domain_min,
            domain_max,
            samples,
        })
    }

    /// Build a lattice over the unit domain [0, 1]³.
    pub fn with_unit_domain(level: usize, samples: Vec<Sample>) -> Result<Self> {
        Self::new(level, Sample::ZERO, Sample::ONE, samples)
    }

    /// The neutral lattice: the sample at `(r, g, b)` is
    /// `(r, g, b) / (level − 1)`.
    pub fn identity(level: usize) -> Result<Self> {
        if level < 2 {
            return Err(LutError::InvalidLevel(level));
        }
        let den = (level - 1) as f32;
        let samples = grid_points(level)
            .map(|[r, g, b]| Sample::new(r as f32, g as f32, b as f32) / den)
            .collect();
        Self::with_unit_domain(level, samples)
    }

    /// Builder-style title setter.
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Number of sample points per axis.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn domain_min(&self) -> Sample {
        self.domain_min
    }

    pub fn domain_max(&self) -> Sample {
        self.domain_max
    }

    /// Per-channel width of the domain. Always strictly positive.
    pub fn domain_range(&self) -> Sample {
        self.domain_max - self.domain_min
    }

    /// All samples in flat `idx(r, g, b)` order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Mutable view of the samples. The length is fixed, so the
    /// `level³` invariant holds.
    pub(crate) fn samples_mut(&mut self) -> &mut [Sample] {
        &mut self.samples
    }

    /// Flat index of lattice point `(r, g, b)`.
    pub fn index(&self, r: usize, g: usize, b: usize) -> usize {
        r + g * self.level + b * self.level * self.level
    }

    /// Sample at lattice point `(r, g, b)`.
    ///
    /// Returns `None` if any coordinate is `>= level`. Callers that work in
    /// continuous space clamp before calling.
    pub fn get(&self, r: usize, g: usize, b: usize) -> Option<Sample> {
        if r >= self.level || g >= self.level || b >= self.level {
            return None;
        }
        Some(self.samples[self.index(r, g, b)])
    }

    /// Unchecked lookup for coordinates already clamped to the lattice.
    pub(crate) fn sample_at(&self, r: usize, g: usize, b: usize) -> Sample {
        self.samples[self.index(r, g, b)]
    }

    /// Smallest and largest channel value across every sample.
    pub fn channel_bounds(&self) -> (f32, f32) {
        self.samples
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.min_element()), hi.max(s.max_element()))
            })
    }

    /// Descriptive statistics for reporting.
    pub fn summary(&self) -> LatticeSummary {
        let (channel_min, channel_max) = self.channel_bounds();
        LatticeSummary {
            title: self.title.clone(),
            level: self.level,
            sample_count: self.samples.len(),
            domain_min: self.domain_min,
            domain_max: self.domain_max,
            channel_min,
            channel_max,
        }
    }

    /// Replace the samples while keeping level, domain and metadata.
    pub(crate) fn map_samples(&self, f: impl Fn(Sample) -> Sample) -> Self {
        Self {
            samples: self.samples.iter().map(|&s| f(s)).collect(),
            ..self.clone()
        }
    }
}

/// Serializable overview of a lattice, without its samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatticeSummary {
    pub title: Option<String>,
    pub level: usize,
    pub sample_count: usize,
    pub domain_min: Sample,
    pub domain_max: Sample,
    /// Smallest channel value across all samples.
    pub channel_min: f32,
    /// Largest channel value across all samples.
    pub channel_max: f32,
}

/// Every lattice coordinate `[r, g, b]` of a `level`-sized cube, in flat
/// index order (red fastest).
pub fn grid_points(level: usize) -> impl Iterator<Item = [usize; 3]> {
    (0..level).flat_map(move |b| {
        (0..level).flat_map(move |g| (0..level).map(move |r| [r, g, b]))
    })
}

//! LUT combination operators: scale, clamp, sum, blend and rescale.
//!
//! Every operator borrows its inputs and returns a new lattice, so a failed
//! combination never leaves either operand half-modified. Chaining reads as
//! `a.blend(&b, 0.7, 0.3)?.clamp()`.

use super::lattice::{Lattice, Sample};
use crate::error::{LutError, Result};

impl Lattice {
    /// Multiply every sample by `factor`.
    ///
    /// Factors outside `(0, 1]` would push samples out of the domain by
    /// construction; they are ignored and an unchanged copy is returned.
    pub fn scale(&self, factor: f32) -> Lattice {
        if !(factor > 0.0 && factor <= 1.0) {
            tracing::warn!(factor, "scale factor outside (0, 1], ignoring");
            return self.clone();
        }
        self.map_samples(|s| s * factor)
    }

    /// Remap every channel from `[domain_min, domain_max]` to `[0, 1]`.
    ///
    /// This is a domain normalization, not saturation: values outside the
    /// domain land outside [0, 1].
    pub fn clamp(&self) -> Lattice {
        let min = self.domain_min();
        let range = self.domain_range();
        self.map_samples(|s| (s - min) / range)
    }

    /// Element-wise sum of two lattices of the same level.
    pub fn sum(&self, other: &Lattice) -> Result<Lattice> {
        self.check_compatible(other)?;
        Ok(self.zip_samples(other, |a, b| a + b))
    }

    /// Weighted per-sample average of two lattices of the same level.
    ///
    /// The weights are normalized to sum to 1, so only their ratio matters.
    /// ```text
    /// out = a × w1/(w1+w2) + b × w2/(w1+w2)
    /// ```
    pub fn blend(&self, other: &Lattice, w1: f32, w2: f32) -> Result<Lattice> {
        self.check_compatible(other)?;
        let total = w1 + w2;
        if !(total.is_finite() && total > 0.0) {
            return Err(LutError::InvalidWeights(w1, w2));
        }
        let (w1, w2) = (w1 / total, w2 / total);
        Ok(self.zip_samples(other, |a, b| a * w1 + b * w2))
    }

    /// Linearly remap all samples so the global channel range spans the
    /// domain.
    ///
    /// The single smallest channel value over every sample maps to
    /// `domain_min` and the largest to `domain_max`. A flat LUT collapses
    /// to the domain midpoint.
    pub fn rescale(&self) -> Lattice {
        let (lo, hi) = self.channel_bounds();
        let min = self.domain_min();
        let range = self.domain_range();

        if lo == hi {
            let mid = min + range * 0.5;
            return self.map_samples(|_| mid);
        }

        let span = hi - lo;
        self.map_samples(|s| min + (s - lo) / span * range)
    }

    /// [`Lattice::sum`], panicking on incompatible inputs.
    pub fn must_sum(&self, other: &Lattice) -> Lattice {
        match self.sum(other) {
            Ok(lut) => lut,
            Err(e) => panic!("LUT sum failed: {e}"),
        }
    }

    /// [`Lattice::blend`], panicking on incompatible inputs or weights.
    pub fn must_blend(&self, other: &Lattice, w1: f32, w2: f32) -> Lattice {
        match self.blend(other, w1, w2) {
            Ok(lut) => lut,
            Err(e) => panic!("LUT blend failed: {e}"),
        }
    }

    fn check_compatible(&self, other: &Lattice) -> Result<()> {
        if self.samples().is_empty() || other.samples().is_empty() {
            return Err(LutError::EmptyInput("cannot combine an empty LUT"));
        }
        if self.samples().len() != other.samples().len() {
            return Err(LutError::SampleCountMismatch {
                expected: self.samples().len(),
                found: other.samples().len(),
            });
        }
        Ok(())
    }

    fn zip_samples(&self, other: &Lattice, f: impl Fn(Sample, Sample) -> Sample) -> Lattice {
        let mut out = self.clone();
        out.samples_mut()
            .iter_mut()
            .zip(other.samples())
            .for_each(|(a, &b)| *a = f(*a, b));
        out
    }
}

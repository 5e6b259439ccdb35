//! Trilinear evaluation of a lattice at continuous coordinates.
//!
//! # Algorithm
//! The input is normalized against the domain to lattice space `[0, N−1]`,
//! clamped, and split into an integer corner and fractional weights. The
//! 8 corners of the enclosing cell are then blended along R, then G, then B:
//! ```text
//! c00 = lerp(c000, c100, rf)   c01 = lerp(c001, c101, rf)
//! c10 = lerp(c010, c110, rf)   c11 = lerp(c011, c111, rf)
//! c0  = lerp(c00, c10, gf)     c1  = lerp(c01, c11, gf)
//! out = lerp(c0, c1, bf)
//! ```
//! On the top edge both corners collapse to `N−1` and the result is a
//! direct lookup; inputs outside the domain are clamped, never extrapolated.
//!
//! # Complexity
//! O(1) per evaluation: 8 lookups and 7 vector lerps.

use rayon::prelude::*;

use super::lattice::{Lattice, Sample};
use crate::error::Result;

impl Lattice {
    /// Map a color in domain space to continuous lattice coordinates,
    /// clamped to `[0, N−1]` on every axis.
    pub fn lattice_coords(&self, rgb: Sample) -> Sample {
        let top = (self.level() - 1) as f32;
        let t = (rgb - self.domain_min()) / self.domain_range();
        (t * top).clamp(Sample::ZERO, Sample::splat(top))
    }

    /// Evaluate the LUT at a color given in domain space.
    pub fn interpolate(&self, rgb: Sample) -> Sample {
        let coords = self.lattice_coords(rgb);
        self.interpolate_coords(coords)
    }

    /// Evaluate the LUT at continuous lattice coordinates in `[0, N−1]`.
    pub fn interpolate_coords(&self, coords: Sample) -> Sample {
        let last = self.level() - 1;
        let floor = coords.floor();
        let frac = coords - floor;

        let r0 = (floor.x as usize).min(last);
        let g0 = (floor.y as usize).min(last);
        let b0 = (floor.z as usize).min(last);
        let r1 = (r0 + 1).min(last);
        let g1 = (g0 + 1).min(last);
        let b1 = (b0 + 1).min(last);

        let c000 = self.sample_at(r0, g0, b0);
        let c001 = self.sample_at(r0, g0, b1);
        let c010 = self.sample_at(r0, g1, b0);
        let c011 = self.sample_at(r0, g1, b1);
        let c100 = self.sample_at(r1, g0, b0);
        let c101 = self.sample_at(r1, g0, b1);
        let c110 = self.sample_at(r1, g1, b0);
        let c111 = self.sample_at(r1, g1, b1);

        // Along r
        let c00 = c000.lerp(c100, frac.x);
        let c01 = c001.lerp(c101, frac.x);
        let c10 = c010.lerp(c110, frac.x);
        let c11 = c011.lerp(c111, frac.x);

        // Along g
        let c0 = c00.lerp(c10, frac.y);
        let c1 = c01.lerp(c11, frac.y);

        // Along b
        c0.lerp(c1, frac.z)
    }

    /// The per-pixel transform used by the applicator.
    ///
    /// `rgb` is a normalized [0, 1] color. It is mapped into the domain,
    /// evaluated, blended with the untouched input by `intensity`, then
    /// mapped back out of the domain. The result is not saturated.
    pub fn transform(&self, rgb: Sample, intensity: f32) -> Sample {
        let range = self.domain_range();
        let input = self.domain_min() + rgb * range;
        let graded = self.interpolate(input);
        let blended = input.lerp(graded, intensity);
        (blended - self.domain_min()) / range
    }

    /// Bake this LUT into a new lattice of `level` points per axis over the
    /// unit domain.
    ///
    /// Each new point is [`Lattice::transform`] of the matching identity
    /// color at full intensity, so the result grades exactly like `self`
    /// at lattice points and approximates it in between.
    pub fn resample(&self, level: usize) -> Result<Lattice> {
        let identity = Lattice::identity(level)?;
        let samples = identity
            .samples()
            .par_iter()
            .map(|&rgb| self.transform(rgb, 1.0))
            .collect();

        let mut out = Lattice::with_unit_domain(level, samples)?;
        out.title = self.title.clone();
        out.comments = self.comments.clone();
        tracing::debug!(from = self.level(), to = level, "resampled lattice");
        Ok(out)
    }
}

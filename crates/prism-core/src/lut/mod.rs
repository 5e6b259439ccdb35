//! LUT data model — lattice, trilinear evaluation and combination operators.

pub mod combine;
pub mod interpolate;
pub mod lattice;

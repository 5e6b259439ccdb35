//! End-to-end tests over the public API: codecs, combinators and the
//! applicator working together on real files.
//!
//! Run with: `cargo test -p prism-core`

use image::{Rgba, RgbaImage};
use prism_core::format::{grid, hald};
use prism_core::{Hald, Lattice, LutApplicator, LutError, Sample};

const EPSILON: f32 = 1e-5;

/// A warm look: boosts red, lifts blacks, pulls blue down.
fn warm_look(level: usize) -> Lattice {
    let identity = Lattice::identity(level).unwrap();
    let samples = identity
        .samples()
        .iter()
        .map(|s| Sample::new((s.x * 1.1).min(1.0), s.y * 0.95 + 0.05, s.z * 0.8))
        .collect();
    Lattice::with_unit_domain(level, samples)
        .unwrap()
        .titled("warm")
}

fn checker(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let v = if (x + y) % 2 == 0 { 230 } else { 40 };
        Rgba([v, (x * 20) as u8, (y * 30) as u8, 255])
    })
}

#[test]
fn test_grid_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warm.cube");

    let lut = warm_look(9);
    grid::save(&lut, &path).unwrap();
    let back = grid::load_file(&path).unwrap();

    assert_eq!(back.title.as_deref(), Some("warm"));
    assert_eq!(back.level(), 9);
    for (a, b) in lut.samples().iter().zip(back.samples()) {
        assert!((*a - *b).abs().max_element() < EPSILON);
    }
}

#[test]
fn test_missing_grid_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = grid::load_file(&dir.path().join("absent.cube")).unwrap_err();
    assert!(matches!(err, LutError::Io(_)));
}

#[test]
fn test_grid_to_hald_grades_like_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warm.png");

    let lut = warm_look(17);
    Hald::from_lattice(&lut, 4).unwrap().save(&path).unwrap();
    let hald = Hald::load_file(&path).unwrap();
    assert_eq!(hald.level(), 4);

    let source = checker(12, 10);
    let from_grid = lut.apply(&source);
    let from_hald = hald.apply(&source);
    for (a, b) in from_grid.pixels().zip(from_hald.pixels()) {
        for c in 0..4 {
            assert!(a.0[c].abs_diff(b.0[c]) <= 2, "{a:?} vs {b:?}");
        }
    }
}

#[test]
fn test_hald_to_grid_keeps_samples() {
    let hald = Hald::identity(3).unwrap();
    let lattice = hald.clone().into_lattice().titled("from hald");
    let text = lattice.to_string();
    let parsed = grid::parse_str(&text).unwrap();
    assert_eq!(parsed.level(), 9);
    assert_eq!(parsed.title.as_deref(), Some("from hald"));
    for (a, b) in hald.lattice().samples().iter().zip(parsed.samples()) {
        assert!((*a - *b).abs().max_element() < EPSILON);
    }
}

#[test]
fn test_hald_rejects_non_cubic_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    checker(10, 10).save(&path).unwrap();
    assert!(matches!(
        Hald::load_file(&path),
        Err(LutError::InvalidDimensions { width: 10, height: 10 })
    ));
    assert!(matches!(hald::hald_level(100, 100), Err(LutError::InvalidDimensions { .. })));
}

#[test]
fn test_blend_then_clamp_chain() {
    let warm = warm_look(5);
    let identity = Lattice::identity(5).unwrap();
    let half = warm.blend(&identity, 1.0, 1.0).unwrap().clamp();

    let probe = Sample::new(0.4, 0.6, 0.2);
    let expected = (warm.interpolate(probe) + identity.interpolate(probe)) * 0.5;
    assert!((half.interpolate(probe) - expected).abs().max_element() < EPSILON);
}

#[test]
fn test_sum_then_rescale_fits_domain() {
    let warm = warm_look(4);
    let summed = warm.sum(&warm).unwrap().sum(&warm).unwrap();
    let (_, hi) = summed.channel_bounds();
    assert!(hi > 1.0);

    let rescaled = summed.rescale();
    let (lo, hi) = rescaled.channel_bounds();
    assert!(lo.abs() < EPSILON);
    assert!((hi - 1.0).abs() < EPSILON);
}

#[test]
fn test_boxed_applicators_are_interchangeable() {
    let luts: Vec<Box<dyn LutApplicator>> = vec![
        Box::new(Lattice::identity(4).unwrap()),
        Box::new(Hald::identity(2).unwrap()),
    ];
    let source = checker(6, 6);
    for lut in &luts {
        let out = lut.apply_scaled(&source, 0.7);
        for (a, b) in source.pixels().zip(out.pixels()) {
            for c in 0..4 {
                assert!(a.0[c].abs_diff(b.0[c]) <= 1);
            }
        }
    }
}

#[test]
fn test_summary_reports_bounds() {
    let summary = warm_look(3).summary();
    assert_eq!(summary.level, 3);
    assert_eq!(summary.sample_count, 27);
    assert_eq!(summary.title.as_deref(), Some("warm"));
    assert!((summary.channel_min - 0.0).abs() < EPSILON);
    assert!((summary.channel_max - 1.0).abs() < EPSILON);
}

use std::f64::consts::PI;

use gabor_eye_core::patch::to_intensity;
use gabor_eye_core::{gabor_patch, to_radians, GaborError, PatchParams};

fn sample_angles() -> Vec<f64> {
    let mut angles: Vec<f64> = (0..180).step_by(7).map(|deg| to_radians(deg as f64)).collect();
    angles.extend([0.123, 1.0, 2.5, 3.0, -0.7]);
    angles
}

#[test]
fn half_turn_yields_identical_buffers() {
    for &theta in &sample_angles() {
        for size in [33, 64] {
            let base = gabor_patch(size, theta, 4.0, 0.35, 0.9).unwrap();
            let plus = gabor_patch(size, theta + PI, 4.0, 0.35, 0.9).unwrap();
            let minus = gabor_patch(size, theta - PI, 4.0, 0.35, 0.9).unwrap();
            assert_eq!(base, plus, "theta {theta} size {size}");
            assert_eq!(base, minus, "theta {theta} size {size}");
        }
    }
}

#[test]
fn synthesis_is_idempotent() {
    let params = PatchParams::new(120, to_radians(135.0), 5.2, 0.35, 0.9);
    let first = params.render().unwrap();
    let second = params.render().unwrap();
    assert_eq!(first.as_slice(), second.as_slice());
}

#[test]
fn odd_center_pixel_equals_contrast_intensity() {
    for contrast in [-1.0, -0.5, 0.0, 0.35, 0.9, 1.0, 1.7] {
        for &theta in &sample_angles() {
            let image = gabor_patch(101, theta, 4.0, 0.35, contrast).unwrap();
            assert_eq!(
                image.pixel(50, 50),
                to_intensity(contrast),
                "contrast {contrast} theta {theta}"
            );
        }
    }
    assert_eq!(to_intensity(0.9), 242);
}

#[test]
fn even_center_pixel_is_close_to_contrast_intensity() {
    let image = gabor_patch(120, 0.0, 4.0, 0.35, 0.9).unwrap();
    let expected = to_intensity(0.9) as i32;
    for (row, col) in [(59, 59), (59, 60), (60, 59), (60, 60)] {
        let actual = image.pixel(row, col) as i32;
        assert!((actual - expected).abs() <= 8, "({row}, {col}) = {actual}");
    }
}

#[test]
fn strong_contrast_clamps_instead_of_wrapping() {
    let image = gabor_patch(64, 0.0, 4.0, 0.35, 3.0).unwrap();
    let pixels = image.as_slice();
    assert_eq!(pixels.iter().copied().max(), Some(255));
    assert_eq!(pixels.iter().copied().min(), Some(0));
}

#[test]
fn quarter_turn_transposes_the_patch() {
    let size = 49;
    let horizontal = gabor_patch(size, 0.0, 3.0, 0.35, 0.9).unwrap();
    let vertical = gabor_patch(size, PI / 2.0, 3.0, 0.35, 0.9).unwrap();
    for row in 0..size {
        for col in 0..size {
            let a = horizontal.pixel(row, col) as i32;
            let b = vertical.pixel(col, row) as i32;
            assert!((a - b).abs() <= 1, "({row}, {col}): {a} vs {b}");
        }
    }
}

#[test]
fn mean_intensity_sits_near_mid_gray() {
    let image = gabor_patch(120, to_radians(45.0), 4.2, 0.35, 0.9).unwrap();
    let mean = image.mean_intensity();
    assert!((mean - 127.5).abs() < 5.0, "mean {mean}");
}

#[test]
fn invalid_parameters_are_errors() {
    let err = gabor_patch(0, 0.0, 4.0, 0.35, 0.9).unwrap_err();
    assert!(matches!(err, GaborError::InvalidParameter { .. }));
    assert!(gabor_patch(8, 0.0, -1.0, 0.35, 0.9).is_err());
    assert!(gabor_patch(8, 0.0, 4.0, 0.0, 0.9).is_err());
}

#[test]
fn overflowing_frequency_is_rejected() {
    match gabor_patch(5, 0.3, 1e308, 0.35, 0.9) {
        Err(GaborError::InvalidParameter { parameter, .. }) => assert_eq!(parameter, "frequency"),
        other => panic!("expected frequency error, got {other:?}"),
    }
    assert!(gabor_patch(5, 0.3, 1e6, 0.35, 0.9).is_ok());
}

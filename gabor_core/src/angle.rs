//! Orientation arithmetic under π-periodicity.
//!
//! A grating rotated by 180° is the same stimulus, so orientations are
//! compared as equivalence classes modulo π rather than as raw radians.

use std::f64::consts::PI;

/// Orientation in radians. Only the class modulo π is meaningful.
pub type Orientation = f64;

/// Tolerance for [`angular_equal`]. Orientations built from integer degrees
/// are at least 1° (≈0.01745 rad) apart, so this is effectively exact-match.
pub const ANGLE_EPSILON: f64 = 1.0e-6;

/// Resolution used by [`canonical_orientation`] to absorb last-ulp noise.
const ORIENTATION_QUANTUM: f64 = 1.0e-9;

/// Converts degrees to radians.
pub fn to_radians(degrees: f64) -> Orientation {
    degrees.to_radians()
}

/// Converts radians to degrees in `[0, 180)`.
pub fn to_degrees(theta: Orientation) -> f64 {
    canonical_orientation(theta).to_degrees()
}

/// Minimal distance between two orientations modulo π, in `[0, π/2]`.
pub fn orientation_distance(a: Orientation, b: Orientation) -> f64 {
    let diff = (a - b).rem_euclid(PI);
    diff.min(PI - diff)
}

/// True when `a` and `b` describe the same stimulus within `epsilon`.
pub fn angular_equal_within(a: Orientation, b: Orientation, epsilon: f64) -> bool {
    orientation_distance(a, b) <= epsilon
}

/// [`angular_equal_within`] at the fixed [`ANGLE_EPSILON`].
pub fn angular_equal(a: Orientation, b: Orientation) -> bool {
    angular_equal_within(a, b, ANGLE_EPSILON)
}

/// Reduces `theta` to its representative in `[0, π)`.
///
/// The result is snapped to a 1e-9 rad grid so that `θ` and `θ + π` map to
/// the same bit pattern even when the addition perturbs the last ulp.
pub fn canonical_orientation(theta: Orientation) -> Orientation {
    let reduced = theta.rem_euclid(PI);
    let snapped = (reduced / ORIENTATION_QUANTUM).round() * ORIENTATION_QUANTUM;
    if snapped <= 0.0 || snapped >= PI - ORIENTATION_QUANTUM * 0.5 {
        0.0
    } else {
        snapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_to_itself_and_half_turn() {
        for deg in [0.0, 17.0, 45.0, 90.0, 135.0, 179.0] {
            let theta = to_radians(deg);
            assert!(angular_equal(theta, theta));
            assert!(angular_equal(theta, theta + PI));
            assert!(angular_equal(theta, theta - PI));
        }
    }

    #[test]
    fn distinct_beyond_twenty_degrees() {
        for offset in [20.0, 45.0, 90.0, 160.0] {
            let a = to_radians(30.0);
            let b = to_radians(30.0 + offset);
            assert!(!angular_equal(a, b), "offset {offset} compared equal");
        }
    }

    #[test]
    fn distance_wraps_around_half_turn() {
        let a = to_radians(1.0);
        let b = to_radians(179.0);
        assert!((orientation_distance(a, b) - to_radians(2.0)).abs() < 1e-12);
    }

    #[test]
    fn canonical_orientation_absorbs_half_turns() {
        let theta = to_radians(150.0);
        assert_eq!(
            canonical_orientation(theta).to_bits(),
            canonical_orientation(theta + PI).to_bits()
        );
        assert_eq!(canonical_orientation(PI), 0.0);
        assert_eq!(canonical_orientation(-PI).to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn degrees_round_trip() {
        assert!((to_degrees(to_radians(120.0)) - 120.0).abs() < 1e-6);
        assert!((to_degrees(to_radians(300.0)) - 120.0).abs() < 1e-6);
    }
}

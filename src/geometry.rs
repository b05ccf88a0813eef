//! Planar joint-angle geometry.
//!
//! Computes the angle at a joint from three 2-D points using the normalized
//! dot product of the two limb vectors meeting at that joint.

use crate::constants::MIN_VECTOR_LENGTH;

/// A point in normalized frame coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

impl Point2 {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Angle at vertex `b` between rays `b→a` and `b→c`, in degrees within [0, 180].
///
/// Returns `None` when either ray is shorter than [`MIN_VECTOR_LENGTH`] or the
/// inputs are not finite. Callers must treat `None` as "no reading", never as zero.
#[must_use]
pub fn angle_degrees(a: Point2, b: Point2, c: Point2) -> Option<f64> {
    let (abx, aby) = (a.x - b.x, a.y - b.y);
    let (cbx, cby) = (c.x - b.x, c.y - b.y);

    let dot = abx * cbx + aby * cby;
    let mag1 = abx.hypot(aby);
    let mag2 = cbx.hypot(cby);

    // NaN magnitudes fail this comparison too
    if !(mag1 >= MIN_VECTOR_LENGTH && mag2 >= MIN_VECTOR_LENGTH) {
        return None;
    }

    let cos = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    let angle = cos.acos().to_degrees();
    angle.is_finite().then_some(angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_straight_arm() {
        let angle = angle_degrees(Point2::new(0.0, 0.0), Point2::new(0.5, 0.0), Point2::new(1.0, 0.0)).unwrap();
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_degrees(Point2::new(0.0, 1.0), Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_folded_arm() {
        let angle = angle_degrees(Point2::new(1.0, 0.0), Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)).unwrap();
        assert!(angle.abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_vector() {
        let p = Point2::new(0.3, 0.3);
        assert!(angle_degrees(p, p, Point2::new(1.0, 1.0)).is_none());
        assert!(angle_degrees(Point2::new(1.0, 1.0), p, p).is_none());
    }

    #[test]
    fn test_non_finite_input() {
        let angle = angle_degrees(Point2::new(f64::NAN, 0.0), Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert!(angle.is_none());
    }

    proptest! {
        #[test]
        fn prop_angle_in_range(
            ax in -1.0f64..1.0, ay in -1.0f64..1.0,
            bx in -1.0f64..1.0, by in -1.0f64..1.0,
            cx in -1.0f64..1.0, cy in -1.0f64..1.0,
        ) {
            if let Some(angle) = angle_degrees(Point2::new(ax, ay), Point2::new(bx, by), Point2::new(cx, cy)) {
                prop_assert!((0.0..=180.0).contains(&angle));
            }
        }

        #[test]
        fn prop_angle_symmetric(
            ax in -1.0f64..1.0, ay in -1.0f64..1.0,
            cx in -1.0f64..1.0, cy in -1.0f64..1.0,
        ) {
            let b = Point2::new(0.1, -0.2);
            let forward = angle_degrees(Point2::new(ax, ay), b, Point2::new(cx, cy));
            let backward = angle_degrees(Point2::new(cx, cy), b, Point2::new(ax, ay));
            match (forward, backward) {
                (Some(f), Some(r)) => prop_assert!((f - r).abs() < 1e-9),
                (None, None) => {}
                _ => prop_assert!(false, "asymmetric definedness"),
            }
        }
    }
}

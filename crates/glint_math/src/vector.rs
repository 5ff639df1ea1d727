// Vector utilities for DVec3
//
// Extends glam::DVec3 with the checked operations the tracer relies on.
// Note: glam::DVec3 already provides add/sub/scale operators, dot(), cross(),
// length() and length_squared()

use glam::DVec3;
use thiserror::Error;

/// Distances below this are treated as exactly zero.
///
/// A secondary ray leaves from a point that is (numerically) on a surface;
/// without the snap it would re-hit that same surface at a tiny `t`.
pub const SELF_INTERSECTION_EPSILON: f64 = 1e-5;

/// Snap a ray parameter to zero if it falls below [`SELF_INTERSECTION_EPSILON`].
///
/// Every primitive runs its roots through this before deciding on a hit,
/// so a snapped root is rejected by the usual `t <= 0` test.
#[inline]
pub fn snap_to_zero(t: f64) -> f64 {
    if t < SELF_INTERSECTION_EPSILON {
        0.0
    } else {
        t
    }
}

/// Geometry that has no well-defined direction.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DomainError {
    #[error("cannot normalize a zero-length vector ({0})")]
    ZeroLength(DVec3),

    #[error("cannot normalize a non-finite vector ({0})")]
    NonFinite(DVec3),
}

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// The positive unit vector along this axis.
    pub fn unit_vector(self) -> DVec3 {
        match self {
            Axis::X => DVec3::X,
            Axis::Y => DVec3::Y,
            Axis::Z => DVec3::Z,
        }
    }
}

/// Extension trait for DVec3 to provide the tracer's vector operations
pub trait VectorExt {
    /// Scale to unit length, failing instead of producing NaN/Inf.
    fn unit(self) -> Result<DVec3, DomainError>;

    /// The component along a coordinate axis.
    fn component(self, axis: Axis) -> f64;
}

impl VectorExt for DVec3 {
    fn unit(self) -> Result<DVec3, DomainError> {
        let length = self.length();
        if !length.is_finite() {
            return Err(DomainError::NonFinite(self));
        }
        if length == 0.0 {
            return Err(DomainError::ZeroLength(self));
        }
        Ok(self / length)
    }

    fn component(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn approx_eq(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < TOLERANCE
    }

    #[test]
    fn test_sub() {
        let cases = [
            (DVec3::new(2.0, 3.0, 4.0), DVec3::new(1.0, 2.0, 3.0), DVec3::new(1.0, 1.0, 1.0)),
            (DVec3::ONE, DVec3::ONE, DVec3::ZERO),
            (DVec3::ZERO, DVec3::ZERO, DVec3::ZERO),
            (DVec3::splat(-1.0), DVec3::splat(-1.0), DVec3::ZERO),
            (DVec3::ONE, DVec3::splat(-100.0), DVec3::splat(101.0)),
        ];

        for (a, b, expected) in cases {
            assert_eq!(a - b, expected);
        }
    }

    #[test]
    fn test_add() {
        let cases = [
            (DVec3::new(2.0, 3.0, 4.0), DVec3::new(1.0, 2.0, 3.0), DVec3::new(3.0, 5.0, 7.0)),
            (DVec3::ONE, DVec3::ONE, DVec3::splat(2.0)),
            (DVec3::splat(-1.0), DVec3::splat(-1.0), DVec3::splat(-2.0)),
            (DVec3::ONE, DVec3::splat(-100.0), DVec3::splat(-99.0)),
        ];

        for (a, b, expected) in cases {
            assert_eq!(a + b, expected);
        }
    }

    #[test]
    fn test_dot() {
        assert_eq!(DVec3::new(2.0, 3.0, 4.0).dot(DVec3::new(1.0, 2.0, 3.0)), 20.0);
        assert_eq!(DVec3::ONE.dot(DVec3::ONE), 3.0);
        assert_eq!(DVec3::ZERO.dot(DVec3::ZERO), 0.0);
        assert_eq!(DVec3::ONE.dot(DVec3::splat(-100.0)), -300.0);
    }

    #[test]
    fn test_scalar_mult() {
        let v = DVec3::new(2.0, 3.0, 4.0);
        assert_eq!(v * 2.0, DVec3::new(4.0, 6.0, 8.0));
        assert_eq!(v * 0.0, DVec3::ZERO);
        assert_eq!(v * -2.0, DVec3::new(-4.0, -6.0, -8.0));
        assert_eq!(v * 10000.0, DVec3::new(20000.0, 30000.0, 40000.0));
    }

    #[test]
    fn test_length() {
        assert_eq!(DVec3::new(2.0, 3.0, 4.0).length_squared(), 29.0);
        assert_eq!(DVec3::new(2.0, 3.0, 4.0).length(), 29.0_f64.sqrt());
        assert_eq!(DVec3::ONE.length(), 3.0_f64.sqrt());
        assert_eq!(DVec3::ZERO.length(), 0.0);
    }

    #[test]
    fn test_cross() {
        let cases = [
            (DVec3::new(2.0, 3.0, 4.0), DVec3::new(1.0, 2.0, 3.0), DVec3::new(1.0, -2.0, 1.0)),
            (DVec3::ONE, DVec3::ONE, DVec3::ZERO),
            (DVec3::splat(2.0), DVec3::ONE, DVec3::ZERO),
            (DVec3::splat(-2.0), DVec3::ONE, DVec3::ZERO),
            (DVec3::new(-2.0, -3.0, -2.0), DVec3::ONE, DVec3::new(-1.0, 0.0, 1.0)),
        ];

        for (a, b, expected) in cases {
            assert_eq!(a.cross(b), expected);
        }
    }

    #[test]
    fn test_vector_laws() {
        let a = DVec3::new(0.3, -7.25, 12.5);
        let b = DVec3::new(-4.0, 0.125, 3.5);

        assert!(approx_eq((a + b) - b, a));
        assert_eq!(a.cross(a), DVec3::ZERO);
        assert!(approx_eq(a.cross(b), -(b.cross(a))));

        let ua = a.unit().unwrap();
        assert!((ua.dot(ua) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_unit() {
        let up = DVec3::new(0.0, 3.0, 0.0).unit().unwrap();
        assert_eq!(up, DVec3::Y);

        assert_eq!(DVec3::ZERO.unit(), Err(DomainError::ZeroLength(DVec3::ZERO)));
        assert!(matches!(
            DVec3::new(f64::NAN, 0.0, 0.0).unit(),
            Err(DomainError::NonFinite(_))
        ));
        assert!(matches!(
            DVec3::new(f64::INFINITY, 0.0, 0.0).unit(),
            Err(DomainError::NonFinite(_))
        ));
    }

    #[test]
    fn test_snap_to_zero() {
        assert_eq!(snap_to_zero(0.0), 0.0);
        assert_eq!(snap_to_zero(1e-6), 0.0);
        assert_eq!(snap_to_zero(-3.0), 0.0);
        assert_eq!(snap_to_zero(SELF_INTERSECTION_EPSILON), SELF_INTERSECTION_EPSILON);
        assert_eq!(snap_to_zero(4.0), 4.0);
    }

    #[test]
    fn test_axis() {
        let v = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.component(Axis::X), 1.0);
        assert_eq!(v.component(Axis::Y), 2.0);
        assert_eq!(v.component(Axis::Z), 3.0);
        assert_eq!(Axis::default(), Axis::Y);
        assert_eq!(Axis::Z.unit_vector(), DVec3::Z);
    }
}

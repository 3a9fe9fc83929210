// Re-export glam for convenience
pub use glam::*;

// Umbra math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// Normalize `v`, returning the zero vector when `v` has no usable length.
///
/// Degenerate directions never turn into NaN this way, they simply stop
/// contributing to whatever consumes them.
#[inline]
pub fn unit_vector(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// Normalize `v`, or `None` if its length is zero, infinite or NaN.
#[inline]
pub fn try_unit_vector(v: Vec3) -> Option<Vec3> {
    v.try_normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_unit_vector_zero_length() {
        assert_eq!(unit_vector(Vec3::ZERO), Vec3::ZERO);
        assert!(try_unit_vector(Vec3::ZERO).is_none());

        let v = unit_vector(Vec3::new(3.0, 0.0, 4.0));
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!((v.x - 0.6).abs() < 1e-6);
    }
}

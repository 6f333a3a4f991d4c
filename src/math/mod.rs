pub mod curve;
pub mod gradient;

/// Integer grid point.
pub type IntPoint2 = nalgebra::Point2<i32>;

/// Integer grid vector.
pub type IntVector2 = nalgebra::Vector2<i32>;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f32>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f32>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f32>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f32>;

/// 4D vector type, used for tangents with a handedness sign in `w`.
pub type Vector4 = nalgebra::Vector4<f32>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f32 = 1e-5;

/// Linear interpolation between `a` and `b`; `t` is not clamped.
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse of [`lerp`], clamped to `[0, 1]`. Returns 0 when `a == b`.
#[must_use]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Normalizes `v`, or returns the zero vector when `v` is too short.
#[must_use]
pub fn normalize_or_zero(v: &Vector3) -> Vector3 {
    v.try_normalize(TOLERANCE).unwrap_or_else(Vector3::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_relative_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_relative_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_relative_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn inverse_lerp_clamps() {
        assert_relative_eq!(inverse_lerp(0.0, 2.0, 1.0), 0.5);
        assert_relative_eq!(inverse_lerp(0.0, 2.0, 5.0), 1.0);
        assert_relative_eq!(inverse_lerp(0.0, 2.0, -1.0), 0.0);
        assert_relative_eq!(inverse_lerp(1.0, 1.0, 3.0), 0.0);
    }

    #[test]
    fn normalize_zero_vector_stays_zero() {
        assert_eq!(normalize_or_zero(&Vector3::zeros()), Vector3::zeros());
        let n = normalize_or_zero(&Vector3::new(0.0, 0.0, 4.0));
        assert_relative_eq!(n, Vector3::new(0.0, 0.0, 1.0));
    }
}

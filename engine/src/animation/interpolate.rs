//! Interpolation Functions
//!
//! Linear interpolation for scalars and vectors, spherical linear
//! interpolation for unit quaternions.

use glam::{Quat, Vec3};

/// Above this dot product two quaternions are treated as colinear and
/// blended linearly instead of through `sin(theta)`.
pub const SLERP_COLINEAR_THRESHOLD: f32 = 0.9995;

/// Interpolation function stored per track.
pub type InterpolateFn<T> = fn(&T, &T, f32) -> T;

/// Values that carry a default interpolation scheme.
pub trait Interpolate: Clone {
    fn interpolate(a: &Self, b: &Self, fraction: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(a: &Self, b: &Self, fraction: f32) -> Self {
        lerp(*a, *b, fraction)
    }
}

impl Interpolate for Vec3 {
    fn interpolate(a: &Self, b: &Self, fraction: f32) -> Self {
        a.lerp(*b, fraction)
    }
}

impl Interpolate for Quat {
    fn interpolate(a: &Self, b: &Self, fraction: f32) -> Self {
        slerp(*a, *b, fraction)
    }
}

pub fn lerp(a: f32, b: f32, fraction: f32) -> f32 {
    a + (b - a) * fraction
}

/// Spherical linear interpolation along the shorter arc.
///
/// The second quaternion is negated when the dot product is negative so the
/// blend never takes the long way round. Nearly colinear inputs fall back to
/// a normalized linear blend, which avoids dividing by a vanishing
/// `sin(theta)`. The result is always unit length.
pub fn slerp(a: Quat, b: Quat, fraction: f32) -> Quat {
    let a = a.normalize();
    let mut b = b.normalize();
    let mut dot = a.dot(b);

    if dot < 0.0 {
        b = -b;
        dot = -dot;
    }

    if dot > SLERP_COLINEAR_THRESHOLD {
        return (a * (1.0 - fraction) + b * fraction).normalize();
    }

    let theta_0 = dot.clamp(-1.0, 1.0).acos();
    let theta = theta_0 * fraction;
    let sin_theta_0 = theta_0.sin();

    let s0 = (theta_0 - theta).sin() / sin_theta_0;
    let s1 = theta.sin() / sin_theta_0;

    (a * s0 + b * s1).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_lerp_midpoint() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(Vec3::interpolate(&Vec3::ZERO, &Vec3::splat(2.0), 0.25), Vec3::splat(0.5));
    }

    #[test]
    fn test_slerp_endpoints() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(FRAC_PI_2);
        assert!(slerp(a, b, 0.0).abs_diff_eq(a, 1e-6));
        assert!(slerp(a, b, 1.0).abs_diff_eq(b, 1e-6));
    }

    #[test]
    fn test_slerp_halfway_angle() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(FRAC_PI_2);
        let mid = slerp(a, b, 0.5);
        let expected = Quat::from_rotation_y(FRAC_PI_2 / 2.0);
        assert!(mid.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_slerp_takes_shorter_arc() {
        let a = Quat::from_rotation_z(0.1);
        let b = -Quat::from_rotation_z(0.3);
        let mid = slerp(a, b, 0.5);
        // Same rotation as halfway between 0.1 and 0.3, up to sign.
        let expected = Quat::from_rotation_z(0.2);
        assert!(mid.dot(expected).abs() > 0.9999);
    }

    #[test]
    fn test_slerp_colinear_fallback_is_unit() {
        let a = Quat::from_rotation_x(0.5);
        let b = Quat::from_rotation_x(0.5 + 1e-4);
        let q = slerp(a, b, 0.3);
        assert!((q.length() - 1.0).abs() < 1e-5);
        assert!(q.is_finite());
    }
}

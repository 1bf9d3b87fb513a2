//! Scalar math helpers exposed to scripts as `Mathf`
//!
//! The trig, clamp and lerp entry points were native calls on the original
//! surface; here they resolve to the platform's `f32` intrinsics directly.

/// Pi
pub const PI: f32 = std::f32::consts::PI;

/// 2 * Pi
pub const TAU: f32 = std::f32::consts::TAU;

/// Degrees to radians conversion factor
pub const DEG2RAD: f32 = PI / 180.0;

/// Radians to degrees conversion factor
pub const RAD2DEG: f32 = 180.0 / PI;

/// Tolerance used by [`approximately`]
pub const EPSILON: f32 = 1e-6;

/// Sine of an angle in radians
pub fn sin(value: f32) -> f32 {
    value.sin()
}

/// Cosine of an angle in radians
pub fn cos(value: f32) -> f32 {
    value.cos()
}

/// Tangent of an angle in radians
pub fn tan(value: f32) -> f32 {
    value.tan()
}

/// Absolute value
pub fn abs(value: f32) -> f32 {
    value.abs()
}

/// Smaller of two values
pub fn min(a: f32, b: f32) -> f32 {
    a.min(b)
}

/// Larger of two values
pub fn max(a: f32, b: f32) -> f32 {
    a.max(b)
}

/// Clamp `value` into `[min, max]`
///
/// Unlike `f32::clamp` this never panics; when `min > max` the bounds are
/// checked in order, so `min` wins.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Clamp into `[0, 1]`
pub fn clamp01(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

/// Linear interpolation with `t` clamped to `[0, 1]`
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    lerp_unclamped(a, b, clamp01(t))
}

/// Linear interpolation that extrapolates outside `[0, 1]`
pub fn lerp_unclamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Where `value` sits between `a` and `b`, clamped to `[0, 1]`
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    clamp01((value - a) / (b - a))
}

/// Square root
pub fn sqrt(value: f32) -> f32 {
    value.sqrt()
}

/// `x` raised to `y`
pub fn pow(x: f32, y: f32) -> f32 {
    x.powf(y)
}

/// Arc sine
pub fn asin(value: f32) -> f32 {
    value.asin()
}

/// Arc cosine
pub fn acos(value: f32) -> f32 {
    value.acos()
}

/// Arc tangent
pub fn atan(value: f32) -> f32 {
    value.atan()
}

/// Angle of the vector `(x, y)` in radians
pub fn atan2(y: f32, x: f32) -> f32 {
    y.atan2(x)
}

/// Compare two floats with a tolerance scaled to their magnitude
pub fn approximately(a: f32, b: f32) -> bool {
    (b - a).abs() < (EPSILON * a.abs().max(b.abs())).max(f32::EPSILON * 8.0)
}

//! Math value types shared by scripts and the native engine
//!
//! `Vector3` and `Quaternion` are plain `f32` value types whose composition
//! rules mirror the native side exactly: the Hamilton product composes
//! rotations and vector rotation uses the optimized sandwich product, which is
//! algebraically identical to `q * (v, 0) * conj(q)`.
//!
//! Everything else is delegated to `nalgebra`; the value types convert to
//! and from its vectors and quaternions for free.
//!
//! Coordinate convention: +Z forward, +X right, +Y up.

use approx::{AbsDiffEq, RelativeEq};
use nalgebra as na;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};
use thiserror::Error;

/// Domain errors raised by math operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Normalizing or inverting a value with zero magnitude
    #[error("cannot normalize a zero-magnitude value")]
    ZeroMagnitude,

    /// Building a basis from two parallel directions
    #[error("forward and up directions are parallel")]
    ParallelVectors,
}

/// Three-component vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vector3 {
    /// (0, 0, 0)
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// (1, 1, 1)
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// (0, 0, 1)
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);
    /// (0, 0, -1)
    pub const BACK: Self = Self::new(0.0, 0.0, -1.0);
    /// (1, 0, 0)
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    /// (-1, 0, 0)
    pub const LEFT: Self = Self::new(-1.0, 0.0, 0.0);
    /// (0, 1, 0)
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    /// (0, -1, 0)
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);

    /// Create a vector from its components
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length
    pub fn magnitude(self) -> f32 {
        scaled_norm(&na::Vector3::from(self))
    }

    /// Squared length, avoids the square root
    pub fn sqr_magnitude(self) -> f32 {
        na::Vector3::from(self).norm_squared()
    }

    /// Unit vector pointing in the same direction
    ///
    /// A zero vector has no direction and yields [`MathError::ZeroMagnitude`].
    /// Any other finite input, however large or small, gives unit length.
    pub fn normalized(self) -> Result<Self, MathError> {
        scaled_normalize(&na::Vector3::from(self)).map(Self::from)
    }

    /// Unit vector, or [`Vector3::ZERO`] when the input has no direction
    pub fn normalize_or_zero(self) -> Self {
        self.normalized().unwrap_or(Self::ZERO)
    }

    /// Dot product
    pub fn dot(a: Self, b: Self) -> f32 {
        na::Vector3::from(a).dot(&na::Vector3::from(b))
    }

    /// Cross product
    pub fn cross(a: Self, b: Self) -> Self {
        na::Vector3::from(a).cross(&na::Vector3::from(b)).into()
    }

    /// Component-wise product
    pub fn scale(a: Self, b: Self) -> Self {
        na::Vector3::from(a).component_mul(&na::Vector3::from(b)).into()
    }

    /// Linear interpolation, `t` clamped to [0, 1]
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        na::Vector3::from(a)
            .lerp(&na::Vector3::from(b), t.clamp(0.0, 1.0))
            .into()
    }

    /// Distance between two points
    pub fn distance(a: Self, b: Self) -> f32 {
        (b - a).magnitude()
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

impl Add for Vector3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;
    fn mul(self, d: f32) -> Self {
        Self::new(self.x * d, self.y * d, self.z * d)
    }
}

impl Mul<Vector3> for f32 {
    type Output = Vector3;
    fn mul(self, v: Vector3) -> Vector3 {
        v * self
    }
}

impl Div<f32> for Vector3 {
    type Output = Self;
    fn div(self, d: f32) -> Self {
        Self::new(self.x / d, self.y / d, self.z / d)
    }
}

impl Neg for Vector3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vector3 {
    fn mul_assign(&mut self, d: f32) {
        *self = *self * d;
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vector3> for [f32; 3] {
    fn from(v: Vector3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl From<Vector3> for na::Vector3<f32> {
    fn from(v: Vector3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<na::Vector3<f32>> for Vector3 {
    fn from(v: na::Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl AbsDiffEq for Vector3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vector3 {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

/// Rotation quaternion stored as (x, y, z, w)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// X component of the vector part
    pub x: f32,
    /// Y component of the vector part
    pub y: f32,
    /// Z component of the vector part
    pub z: f32,
    /// Scalar part
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// The rotation that does nothing
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a quaternion from raw components
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about `axis`
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Result<Self, MathError> {
        let axis = na::Unit::new_unchecked(na::Vector3::from(axis.normalized()?));
        Ok(na::UnitQuaternion::from_axis_angle(&axis, angle).into())
    }

    /// Rotation whose forward axis points along `forward` with `up` as the
    /// approximate up direction
    pub fn look_rotation(forward: Vector3, up: Vector3) -> Result<Self, MathError> {
        let forward = forward.normalized()?;
        let up = up.normalized().map_err(|_| MathError::ParallelVectors)?;
        if Vector3::cross(up, forward).normalized().is_err() {
            return Err(MathError::ParallelVectors);
        }
        Ok(na::UnitQuaternion::face_towards(&forward.into(), &up.into()).into())
    }

    /// Four-dimensional dot product
    pub fn dot(a: Self, b: Self) -> f32 {
        na::Quaternion::from(a).dot(&na::Quaternion::from(b))
    }

    /// Norm of the quaternion
    pub fn magnitude(self) -> f32 {
        scaled_norm(&na::Quaternion::from(self).coords)
    }

    /// Unit quaternion in the same direction
    pub fn normalized(self) -> Result<Self, MathError> {
        scaled_normalize(&na::Quaternion::from(self).coords)
            .map(|coords| na::Quaternion::from_vector(coords).into())
    }

    /// Negated vector part; the inverse of a unit quaternion
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Multiplicative inverse, valid for any non-zero quaternion
    pub fn inverse(self) -> Result<Self, MathError> {
        na::Quaternion::from(self)
            .try_inverse()
            .map(Self::from)
            .ok_or(MathError::ZeroMagnitude)
    }

    /// Angle in radians between two rotations
    pub fn angle(a: Self, b: Self) -> f32 {
        a.unit().angle_to(&b.unit())
    }

    /// Spherical interpolation along the shortest arc, `t` clamped to [0, 1]
    pub fn slerp(a: Self, b: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let a = a.unit();
        let mut b = b.unit();
        if a.coords.dot(&b.coords) < 0.0 {
            b = na::UnitQuaternion::new_unchecked(-b.into_inner());
        }
        // Nearly identical rotations have no well-defined arc
        a.try_slerp(&b, t, SLERP_EPSILON)
            .unwrap_or_else(|| a.nlerp(&b, t))
            .into()
    }

    /// Normalized nalgebra rotation; a zero quaternion maps to identity
    fn unit(self) -> na::UnitQuaternion<f32> {
        match self.normalized() {
            Ok(q) => na::UnitQuaternion::new_unchecked(q.into()),
            Err(_) => na::UnitQuaternion::identity(),
        }
    }

    fn vector_part(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3}, {:.3})", self.x, self.y, self.z, self.w)
    }
}

/// Hamilton product; `a * b` applies `b` first, then `a`
impl Mul for Quaternion {
    type Output = Self;
    fn mul(self, b: Self) -> Self {
        let a = self;
        Self::new(
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }
}

/// Rotate a vector: `v + w*t + q.xyz x t` with `t = 2 * (q.xyz x v)`
impl Mul<Vector3> for Quaternion {
    type Output = Vector3;
    fn mul(self, v: Vector3) -> Vector3 {
        let qv = self.vector_part();
        let t = Vector3::cross(qv, v) * 2.0;
        v + t * self.w + Vector3::cross(qv, t)
    }
}

impl From<[f32; 4]> for Quaternion {
    fn from([x, y, z, w]: [f32; 4]) -> Self {
        Self::new(x, y, z, w)
    }
}

impl From<Quaternion> for [f32; 4] {
    fn from(q: Quaternion) -> Self {
        [q.x, q.y, q.z, q.w]
    }
}

impl From<Quaternion> for na::Quaternion<f32> {
    fn from(q: Quaternion) -> Self {
        Self::new(q.w, q.x, q.y, q.z)
    }
}

impl From<na::Quaternion<f32>> for Quaternion {
    fn from(q: na::Quaternion<f32>) -> Self {
        Self::new(q.i, q.j, q.k, q.w)
    }
}

impl From<na::UnitQuaternion<f32>> for Quaternion {
    fn from(q: na::UnitQuaternion<f32>) -> Self {
        q.into_inner().into()
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
            && self.w.abs_diff_eq(&other.w, epsilon)
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
            && self.w.relative_eq(&other.w, epsilon, max_relative)
    }
}

/// Position, rotation and scale snapshot
///
/// Points are scaled, then rotated, then translated, the same order the
/// native engine uses when it builds world matrices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformData {
    /// Position in world space
    pub position: Vector3,
    /// Orientation
    pub rotation: Quaternion,
    /// Per-axis scale
    pub scale: Vector3,
}

impl Default for TransformData {
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vector3::ONE,
        }
    }
}

impl TransformData {
    /// Rigid part of the transform: rotation followed by translation
    pub fn isometry(&self) -> na::Isometry3<f32> {
        na::Isometry3::from_parts(
            na::Translation3::from(na::Vector3::from(self.position)),
            self.rotation.unit(),
        )
    }

    /// Map a local-space point into world space
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        let scaled = na::Point3::from(na::Vector3::from(Vector3::scale(self.scale, point)));
        self.isometry().transform_point(&scaled).coords.into()
    }

    /// Rotate a local-space direction; unaffected by position and scale
    pub fn transform_direction(&self, direction: Vector3) -> Vector3 {
        self.isometry().transform_vector(&direction.into()).into()
    }

    /// Map a world-space point back into local space
    pub fn inverse_transform_point(&self, point: Vector3) -> Result<Vector3, MathError> {
        let scale = na::Vector3::from(self.scale);
        if scale.iter().any(|axis| *axis == 0.0) {
            return Err(MathError::ZeroMagnitude);
        }
        let local = self
            .isometry()
            .inverse_transform_point(&na::Point3::from(na::Vector3::from(point)));
        Ok(local.coords.component_div(&scale).into())
    }

    /// Parent-child composition: the result maps child-local points through
    /// `other` and then through `self`
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            position: self.transform_point(other.position),
            rotation: self.rotation * other.rotation,
            scale: Vector3::scale(self.scale, other.scale),
        }
    }
}

/// Cut-off below which slerp falls back to normalized lerp
const SLERP_EPSILON: f32 = 1.0e-6;

/// Euclidean norm that survives components whose squares overflow or
/// underflow `f32`
fn scaled_norm<const D: usize>(v: &na::SVector<f32, D>) -> f32 {
    let sqr = v.norm_squared();
    if sqr.is_normal() {
        return sqr.sqrt();
    }
    let largest = v.amax();
    if largest == 0.0 || !largest.is_finite() {
        return sqr.sqrt();
    }
    (v / largest).norm() * largest
}

/// Unit-length copy of `v`, rescaled by its largest component first
fn scaled_normalize<const D: usize>(v: &na::SVector<f32, D>) -> Result<na::SVector<f32, D>, MathError> {
    let largest = v.amax();
    if largest == 0.0 {
        return Err(MathError::ZeroMagnitude);
    }
    Ok((v / largest).normalize())
}

//! Unit quaternions for rotating 3D vectors.
//!
//! Conventions used throughout the crate:
//! - quaternion vectors are `[re, i, j, k]`,
//! - `rotate(v)` is the sandwich product `q⁻¹ · [0, v] · q`, so the
//!   composite `a · b` rotates by `a` first and by `b` second,
//! - unit quaternions double cover SO(3): `q` and `-q` act identically.

use crate::{Error, Result, Vec3};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Norm below which a vector is rejected instead of normalized.
pub const NORM_EPSILON: f64 = 1e-9;

/// `norm` if a vector of that length can be normalized.
fn checked_norm(norm: f64) -> Result<f64> {
    if !norm.is_finite() || norm < NORM_EPSILON {
        return Err(Error::Normalization { norm });
    }
    Ok(norm)
}

fn finite_angle(angle: f64) -> Result<f64> {
    if angle.is_finite() {
        Ok(angle)
    } else {
        Err(Error::NonFiniteAngle(angle))
    }
}

/// Hamilton product `a · b`.
#[inline]
pub fn quat_mult(a: &[f64; 4], b: &[f64; 4]) -> [f64; 4] {
    [
        a[0] * b[0] - a[1] * b[1] - a[2] * b[2] - a[3] * b[3],
        a[0] * b[1] + a[1] * b[0] + a[2] * b[3] - a[3] * b[2],
        a[0] * b[2] + a[2] * b[0] + a[3] * b[1] - a[1] * b[3],
        a[0] * b[3] + a[3] * b[0] + a[1] * b[2] - a[2] * b[1],
    ]
}

/// Conjugate of a quaternion vector (the inverse for unit quaternions).
#[inline]
pub fn quat_conj(q: &[f64; 4]) -> [f64; 4] {
    [q[0], -q[1], -q[2], -q[3]]
}

/// Compute `q⁻¹ · [0, v] · q` for a unit quaternion `q`.
#[inline]
pub fn quat_wrap(q: &[f64; 4], v: &Vec3) -> Vec3 {
    // c = [0, v] · q
    let c0 = -v[0] * q[1] - v[1] * q[2] - v[2] * q[3];
    let c1 = v[0] * q[0] + v[1] * q[3] - v[2] * q[2];
    let c2 = v[1] * q[0] + v[2] * q[1] - v[0] * q[3];
    let c3 = v[2] * q[0] + v[0] * q[2] - v[1] * q[1];
    // vector part of q⁻¹ · c
    Vec3::new(
        q[0] * c1 - q[1] * c0 - q[2] * c3 + q[3] * c2,
        q[0] * c2 - q[2] * c0 - q[3] * c1 + q[1] * c3,
        q[0] * c3 - q[3] * c0 - q[1] * c2 + q[2] * c1,
    )
}

/// In-place variant of [`quat_wrap`].
#[inline]
pub fn quat_wrap_ip(q: &[f64; 4], v: &mut Vec3) {
    *v = quat_wrap(q, v);
}

/// Compute `q · [0, v] · q⁻¹`, the exact inverse of [`quat_wrap`].
#[inline]
pub fn quat_unwrap(q: &[f64; 4], v: &Vec3) -> Vec3 {
    quat_wrap(&quat_conj(q), v)
}

/// In-place variant of [`quat_unwrap`].
#[inline]
pub fn quat_unwrap_ip(q: &[f64; 4], v: &mut Vec3) {
    *v = quat_unwrap(q, v);
}

#[inline]
fn norm4(q: &[f64; 4]) -> f64 {
    (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3])
        .max(0.0)
        .sqrt()
}

/// Euler angles in radians.
///
/// - `yaw`: rotation around "up",
/// - `pitch`: rotation around "right",
/// - `roll`: rotation around "forward".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EulerAngles {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl EulerAngles {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }
}

/// A normalized quaternion representing a 3D rotation.
///
/// Every setter keeps `‖q‖ = 1` and refreshes the cached inverse.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "QuaternionRecord", try_from = "QuaternionRecord")]
pub struct UnitQuaternion {
    qvec: [f64; 4],
    inv: [f64; 4],
}

/// Serialized form `{re, i, j, k}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuaternionRecord {
    pub re: f64,
    pub i: f64,
    pub j: f64,
    pub k: f64,
}

impl From<UnitQuaternion> for QuaternionRecord {
    fn from(q: UnitQuaternion) -> Self {
        Self {
            re: q.re(),
            i: q.i(),
            j: q.j(),
            k: q.k(),
        }
    }
}

impl TryFrom<QuaternionRecord> for UnitQuaternion {
    type Error = Error;

    fn try_from(r: QuaternionRecord) -> Result<Self> {
        Self::from_vec([r.re, r.i, r.j, r.k])
    }
}

impl Default for UnitQuaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl UnitQuaternion {
    pub const IDENTITY: UnitQuaternion = UnitQuaternion {
        qvec: [1.0, 0.0, 0.0, 0.0],
        inv: [1.0, 0.0, 0.0, 0.0],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub fn re(&self) -> f64 {
        self.qvec[0]
    }

    #[inline]
    pub fn i(&self) -> f64 {
        self.qvec[1]
    }

    #[inline]
    pub fn j(&self) -> f64 {
        self.qvec[2]
    }

    #[inline]
    pub fn k(&self) -> f64 {
        self.qvec[3]
    }

    /// The quaternion vector `[re, i, j, k]`.
    #[inline]
    pub fn qvec(&self) -> &[f64; 4] {
        &self.qvec
    }

    /// The cached inverse (conjugate) vector.
    #[inline]
    pub fn inv_qvec(&self) -> &[f64; 4] {
        &self.inv
    }

    // ----------------
    // Mutation
    // ----------------

    #[inline]
    fn assign(&mut self, qvec: [f64; 4]) {
        self.qvec = qvec;
        self.inv = quat_conj(&qvec);
    }

    /// Assign a product of unit quaternions, removing accumulated drift.
    #[inline]
    fn assign_product(&mut self, qvec: [f64; 4]) {
        let norm = norm4(&qvec);
        self.assign([
            qvec[0] / norm,
            qvec[1] / norm,
            qvec[2] / norm,
            qvec[3] / norm,
        ]);
    }

    /// Set from a quaternion vector, normalizing it.
    pub fn set_vec(&mut self, qvec: [f64; 4]) -> Result<&mut Self> {
        let norm = checked_norm(norm4(&qvec))?;
        self.assign([
            qvec[0] / norm,
            qvec[1] / norm,
            qvec[2] / norm,
            qvec[3] / norm,
        ]);
        Ok(self)
    }

    /// Set a rotation of `angle` radians about `axis` (normalized here).
    pub fn set_axis(&mut self, angle: f64, axis: Vec3) -> Result<&mut Self> {
        let norm = checked_norm(axis.norm())?;
        let (sin, cos) = (finite_angle(angle)? / 2.0).sin_cos();
        self.assign([
            cos,
            axis[0] * sin / norm,
            axis[1] * sin / norm,
            axis[2] * sin / norm,
        ]);
        Ok(self)
    }

    /// Set from Euler angles: `yaw(−Z) · pitch(+X) · roll(+Y)`.
    pub fn set_euler(&mut self, yaw: f64, pitch: f64, roll: f64) -> Result<&mut Self> {
        let (sy, cy) = (finite_angle(yaw)? / 2.0).sin_cos();
        let (sp, cp) = (finite_angle(pitch)? / 2.0).sin_cos();
        let (sr, cr) = (finite_angle(roll)? / 2.0).sin_cos();
        self.assign([
            sp * sr * sy + cp * cr * cy,
            sp * cr * cy + sr * sy * cp,
            -sp * sy * cr + sr * cp * cy,
            sp * sr * cy - sy * cp * cr,
        ]);
        Ok(self)
    }

    /// Set as the rotation `first`, followed by `second`.
    pub fn set_as_composite(&mut self, first: &Self, second: &Self) -> &mut Self {
        self.assign_product(quat_mult(&first.qvec, &second.qvec));
        self
    }

    /// Become `self`, followed by `other`.
    pub fn set_as_before(&mut self, other: &Self) -> &mut Self {
        self.assign_product(quat_mult(&self.qvec, &other.qvec));
        self
    }

    /// Become `other`, followed by `self`.
    pub fn set_as_after(&mut self, other: &Self) -> &mut Self {
        self.assign_product(quat_mult(&other.qvec, &self.qvec));
        self
    }

    pub fn set_with_reference(&mut self, other: &Self) -> &mut Self {
        self.assign_product(quat_mult(&other.inv, &self.qvec));
        self
    }

    pub fn set_without_reference(&mut self, other: &Self) -> &mut Self {
        self.assign_product(quat_mult(&other.qvec, &self.qvec));
        self
    }

    pub fn set_with_coordinate_convention(&mut self, other: &Self) -> &mut Self {
        let left = quat_mult(&other.inv, &self.qvec);
        self.assign_product(quat_mult(&left, &other.qvec));
        self
    }

    pub fn set_without_coordinate_convention(&mut self, other: &Self) -> &mut Self {
        let left = quat_mult(&other.qvec, &self.qvec);
        self.assign_product(quat_mult(&left, &other.inv));
        self
    }

    /// Invert in place.
    pub fn invert(&mut self) -> &mut Self {
        std::mem::swap(&mut self.qvec, &mut self.inv);
        self
    }

    // ----------------
    // Construction
    // ----------------

    pub fn from_vec(qvec: [f64; 4]) -> Result<Self> {
        let mut q = Self::IDENTITY;
        q.set_vec(qvec)?;
        Ok(q)
    }

    /// Construct from a slice that must hold exactly four components.
    pub fn from_slice(qvec: &[f64]) -> Result<Self> {
        let qvec: [f64; 4] = qvec.try_into().map_err(|_| Error::InvalidDimension {
            expected: 4,
            found: qvec.len(),
        })?;
        Self::from_vec(qvec)
    }

    pub fn from_axis(angle: f64, axis: Vec3) -> Result<Self> {
        let mut q = Self::IDENTITY;
        q.set_axis(angle, axis)?;
        Ok(q)
    }

    /// Construct from an angle and an axis slice of exactly three components.
    pub fn from_axis_slice(angle: f64, axis: &[f64]) -> Result<Self> {
        if axis.len() != 3 {
            return Err(Error::InvalidDimension {
                expected: 3,
                found: axis.len(),
            });
        }
        Self::from_axis(angle, Vec3::from_column_slice(axis))
    }

    pub fn from_euler(angles: EulerAngles) -> Result<Self> {
        let mut q = Self::IDENTITY;
        q.set_euler(angles.yaw, angles.pitch, angles.roll)?;
        Ok(q)
    }

    // ----------------
    // Getters
    // ----------------

    /// Rotation angle in `[0, π]`.
    pub fn angle(&self) -> f64 {
        2.0 * self.qvec[0].abs().min(1.0).acos()
    }

    /// Unit rotation axis matching [`angle`](Self::angle).
    ///
    /// The identity has no defined axis; `(0, 0, 1)` is returned for it.
    pub fn axis(&self) -> Vec3 {
        let half_sin = (self.angle() / 2.0).sin();
        if half_sin < NORM_EPSILON {
            return Vec3::z();
        }
        // q and -q are the same rotation; pick the one with re >= 0
        let sign = if self.qvec[0] < 0.0 { -1.0 } else { 1.0 };
        Vec3::new(self.qvec[1], self.qvec[2], self.qvec[3]) * (sign / half_sin)
    }

    /// Euler angles inverting [`set_euler`](Self::set_euler).
    ///
    /// Pitch is in `[-π/2, π/2]`; near `|pitch| = π/2` yaw and roll are coupled.
    pub fn euler(&self) -> EulerAngles {
        let [w, x, y, z] = self.qvec;
        let pitch = (2.0 * (y * z + w * x)).clamp(-1.0, 1.0).asin();
        let roll = (-2.0 * (x * z - w * y)).atan2(1.0 - 2.0 * (x * x + y * y));
        let yaw = (2.0 * (x * y - w * z)).atan2(1.0 - 2.0 * (x * x + z * z));
        EulerAngles { yaw, pitch, roll }
    }

    /// 3×3 matrix `M` with `M · v == self.rotate(v)`.
    pub fn matrix(&self) -> Matrix3<f64> {
        let [w, x, y, z] = self.qvec;
        Matrix3::new(
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y + w * z),
            2.0 * (x * z - w * y),
            2.0 * (x * y - w * z),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z + w * x),
            2.0 * (x * z + w * y),
            2.0 * (y * z - w * x),
            1.0 - 2.0 * (x * x + y * y),
        )
    }

    /// 3×3 matrix `M` with `M · v == self.unrotate(v)`.
    pub fn matrix_inv(&self) -> Matrix3<f64> {
        self.matrix().transpose()
    }

    // ----------------
    // Operations
    // ----------------

    /// Right multiplication `self · other`.
    pub fn mult(&self, other: &Self) -> Self {
        let mut q = *self;
        q.set_as_before(other);
        q
    }

    /// The rotation `self`, followed by `other`.
    pub fn before(&self, other: &Self) -> Self {
        self.mult(other)
    }

    /// Alias for [`before`](Self::before).
    pub fn then(&self, other: &Self) -> Self {
        self.mult(other)
    }

    /// The rotation `other`, followed by `self`.
    pub fn after(&self, other: &Self) -> Self {
        other.mult(self)
    }

    pub fn inverse(&self) -> Self {
        Self {
            qvec: self.inv,
            inv: self.qvec,
        }
    }

    #[inline]
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        quat_wrap(&self.qvec, v)
    }

    #[inline]
    pub fn rotate_ip(&self, v: &mut Vec3) {
        quat_wrap_ip(&self.qvec, v);
    }

    #[inline]
    pub fn unrotate(&self, v: &Vec3) -> Vec3 {
        quat_wrap(&self.inv, v)
    }

    #[inline]
    pub fn unrotate_ip(&self, v: &mut Vec3) {
        quat_wrap_ip(&self.inv, v);
    }

    /// Re-express this orientation against the frame oriented by `other`:
    /// `other⁻¹ · self`.
    pub fn with_reference(&self, other: &Self) -> Self {
        let mut q = *self;
        q.set_with_reference(other);
        q
    }

    /// Inverse of [`with_reference`](Self::with_reference): `other · self`.
    pub fn without_reference(&self, other: &Self) -> Self {
        let mut q = *self;
        q.set_without_reference(other);
        q
    }

    /// Relabel the axes of this orientation: `other⁻¹ · self · other`.
    pub fn with_coordinate_convention(&self, other: &Self) -> Self {
        let mut q = *self;
        q.set_with_coordinate_convention(other);
        q
    }

    /// Inverse of [`with_coordinate_convention`](Self::with_coordinate_convention).
    pub fn without_coordinate_convention(&self, other: &Self) -> Self {
        let mut q = *self;
        q.set_without_coordinate_convention(other);
        q
    }

    /// Componentwise comparison that treats `q` and `-q` as equal.
    pub fn same_rotation(&self, other: &Self, tol: f64) -> bool {
        let close = |sign: f64| {
            self.qvec
                .iter()
                .zip(other.qvec.iter())
                .all(|(a, b)| (a - sign * b).abs() <= tol)
        };
        close(1.0) || close(-1.0)
    }
}

impl std::ops::Mul for UnitQuaternion {
    type Output = UnitQuaternion;

    fn mul(self, rhs: Self) -> Self::Output {
        self.mult(&rhs)
    }
}

impl std::ops::Mul<&UnitQuaternion> for UnitQuaternion {
    type Output = UnitQuaternion;

    fn mul(self, rhs: &Self) -> Self::Output {
        self.mult(rhs)
    }
}

//! Roto-translations of 3D vectors: a double cover of SE(3).
//!
//! A [`Euclidean`] pairs a [`UnitQuaternion`] with a [`Shift`]. Two
//! parameterizations of the same group are supported:
//! - [`Convention::Forward`]: rotate, then shift (`v' = R v + s`),
//! - [`Convention::Reverse`]: shift, then rotate (`v' = R (v + s)`).

use crate::{Result, Shift, UnitQuaternion, Vec3};
use nalgebra::{Matrix3, Matrix4};
use serde::{Deserialize, Serialize};

/// Order in which the rotation and the shift of a [`Euclidean`] are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    /// Rotate, then shift.
    #[default]
    Forward,
    /// Shift, then rotate.
    Reverse,
}

/// An affine map `v ↦ a · v + b`.
///
/// Serialized as `{"A": [[..], [..], [..]], "b": [..]}` with `A` given row by row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(into = "AffineRecord")]
pub struct Affine {
    pub a: Matrix3<f64>,
    pub b: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AffineRecord {
    #[serde(rename = "A")]
    pub a: [[f64; 3]; 3],
    pub b: [f64; 3],
}

impl From<Affine> for AffineRecord {
    fn from(affine: Affine) -> Self {
        let m = &affine.a;
        Self {
            a: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
            b: [affine.b[0], affine.b[1], affine.b[2]],
        }
    }
}

impl Affine {
    #[inline]
    pub fn apply(&self, v: &Vec3) -> Vec3 {
        self.a * v + self.b
    }

    /// The equivalent 4×4 homogeneous matrix.
    pub fn homogeneous(&self) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.a);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.b);
        m
    }
}

/// Row-major nested array of a homogeneous matrix, the serialized form of
/// [`Euclidean::matrix`].
pub fn homogeneous_rows(m: &Matrix4<f64>) -> [[f64; 4]; 4] {
    let mut rows = [[0.0; 4]; 4];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = m[(r, c)];
        }
    }
    rows
}

/// A rotation and a shift applied in the order given by `convention`.
///
/// Serialized as `{"quat": {re, i, j, k}, "shift": [x, y, z], "type": "forward"}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Euclidean {
    pub quat: UnitQuaternion,
    pub shift: Shift,
    #[serde(rename = "type")]
    pub convention: Convention,
}

impl Euclidean {
    /// Identity transform in the given convention.
    pub fn new(convention: Convention) -> Self {
        Self {
            quat: UnitQuaternion::IDENTITY,
            shift: Shift::zero(),
            convention,
        }
    }

    pub fn forward(quat: UnitQuaternion, shift: Shift) -> Self {
        Self {
            quat,
            shift,
            convention: Convention::Forward,
        }
    }

    pub fn reverse(quat: UnitQuaternion, shift: Shift) -> Self {
        Self {
            quat,
            shift,
            convention: Convention::Reverse,
        }
    }

    pub fn from_vecs(qvec: [f64; 4], vec: Vec3, convention: Convention) -> Result<Self> {
        let mut e = Self::new(convention);
        e.set_vecs(qvec, vec)?;
        Ok(e)
    }

    pub fn set_vecs(&mut self, qvec: [f64; 4], vec: Vec3) -> Result<&mut Self> {
        self.quat.set_vec(qvec)?;
        self.shift.set_vec(vec);
        Ok(self)
    }

    pub fn set_objects(&mut self, quat: UnitQuaternion, shift: Shift) -> &mut Self {
        self.quat = quat;
        self.shift = shift;
        self
    }

    /// The shift as seen after the rotation, i.e. `transform_vec(0)`.
    pub fn translation(&self) -> Vec3 {
        match self.convention {
            Convention::Forward => *self.shift.vec(),
            Convention::Reverse => self.quat.rotate(self.shift.vec()),
        }
    }

    /// Become `first`, followed by `second`. Either operand may use either convention.
    pub fn set_as_composite(&mut self, first: &Euclidean, second: &Euclidean) -> &mut Self {
        let moved = second.transform_vec(&first.translation());
        self.quat.set_as_composite(&first.quat, &second.quat);
        // the reverse shift lives in the pre-rotation frame, so it needs the
        // composite quaternion computed above
        let shift = match self.convention {
            Convention::Forward => moved,
            Convention::Reverse => self.quat.unrotate(&moved),
        };
        self.shift.set_vec(shift);
        self
    }

    /// Become `self`, followed by `other`.
    pub fn set_as_before(&mut self, other: &Euclidean) -> &mut Self {
        let first = *self;
        self.set_as_composite(&first, other)
    }

    /// Become `other`, followed by `self`.
    pub fn set_as_after(&mut self, other: &Euclidean) -> &mut Self {
        let second = *self;
        self.set_as_composite(other, &second)
    }

    /// The inverse transform, in the same convention.
    pub fn get_inv(&self) -> Euclidean {
        let negated = -self.shift.vec();
        let shift = match self.convention {
            Convention::Forward => self.quat.unrotate(&negated),
            Convention::Reverse => self.quat.rotate(&negated),
        };
        Euclidean {
            quat: self.quat.inverse(),
            shift: Shift::new(shift),
            convention: self.convention,
        }
    }

    pub fn transform_vec(&self, v: &Vec3) -> Vec3 {
        let mut out = *v;
        self.transform_vec_ip(&mut out);
        out
    }

    pub fn transform_vec_ip(&self, v: &mut Vec3) {
        match self.convention {
            Convention::Forward => {
                self.quat.rotate_ip(v);
                self.shift.shift_ip(v);
            }
            Convention::Reverse => {
                self.shift.shift_ip(v);
                self.quat.rotate_ip(v);
            }
        }
    }

    pub fn untransform_vec(&self, v: &Vec3) -> Vec3 {
        let mut out = *v;
        self.untransform_vec_ip(&mut out);
        out
    }

    pub fn untransform_vec_ip(&self, v: &mut Vec3) {
        match self.convention {
            Convention::Forward => {
                self.shift.unshift_ip(v);
                self.quat.unrotate_ip(v);
            }
            Convention::Reverse => {
                self.quat.unrotate_ip(v);
                self.shift.unshift_ip(v);
            }
        }
    }

    /// Relabel an orientation into this transform's coordinate convention.
    pub fn transform_quat(&self, q: &UnitQuaternion) -> UnitQuaternion {
        q.with_coordinate_convention(&self.quat)
    }

    pub fn transform_quat_ip(&self, q: &mut UnitQuaternion) {
        q.set_with_coordinate_convention(&self.quat);
    }

    pub fn untransform_quat(&self, q: &UnitQuaternion) -> UnitQuaternion {
        q.without_coordinate_convention(&self.quat)
    }

    pub fn untransform_quat_ip(&self, q: &mut UnitQuaternion) {
        q.set_without_coordinate_convention(&self.quat);
    }

    /// Re-express an orientation against this transform's rotated frame.
    pub fn orient(&self, q: &UnitQuaternion) -> UnitQuaternion {
        q.with_reference(&self.quat)
    }

    pub fn orient_ip(&self, q: &mut UnitQuaternion) {
        q.set_with_reference(&self.quat);
    }

    pub fn unorient(&self, q: &UnitQuaternion) -> UnitQuaternion {
        q.without_reference(&self.quat)
    }

    pub fn unorient_ip(&self, q: &mut UnitQuaternion) {
        q.set_without_reference(&self.quat);
    }

    /// `(A, b)` with `A · v + b == transform_vec(v)`.
    pub fn affine(&self) -> Affine {
        Affine {
            a: self.quat.matrix(),
            b: self.translation(),
        }
    }

    /// `(A, b)` with `A · v + b == untransform_vec(v)`.
    pub fn affine_inv(&self) -> Affine {
        let a = self.quat.matrix_inv();
        Affine {
            a,
            b: -(a * self.translation()),
        }
    }

    /// 4×4 homogeneous form of [`affine`](Self::affine).
    pub fn matrix(&self) -> Matrix4<f64> {
        self.affine().homogeneous()
    }

    /// 4×4 homogeneous form of [`affine_inv`](Self::affine_inv).
    pub fn matrix_inv(&self) -> Matrix4<f64> {
        self.affine_inv().homogeneous()
    }
}

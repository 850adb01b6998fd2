//! Shifts of 3D vectors: a single cover of T(3), the translation group.

use crate::{Error, Result, Vec3};
use serde::{Deserialize, Serialize};

#[inline]
pub fn shift_vec(s: &Vec3, v: &Vec3) -> Vec3 {
    s + v
}

#[inline]
pub fn shift_vec_inv(s: &Vec3, v: &Vec3) -> Vec3 {
    v - s
}

#[inline]
pub fn shift_vec_ip(s: &Vec3, v: &mut Vec3) {
    *v += s;
}

#[inline]
pub fn shift_vec_ip_inv(s: &Vec3, v: &mut Vec3) {
    *v -= s;
}

/// A translation of 3D vectors. The identity is the zero shift.
///
/// Serialized as a plain `[x, y, z]` array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shift {
    vec: Vec3,
}

impl Shift {
    pub fn new(vec: Vec3) -> Self {
        Self { vec }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Construct from a slice that must hold exactly three components.
    pub fn from_slice(vec: &[f64]) -> Result<Self> {
        if vec.len() != 3 {
            return Err(Error::InvalidDimension {
                expected: 3,
                found: vec.len(),
            });
        }
        Ok(Self::new(Vec3::from_column_slice(vec)))
    }

    #[inline]
    pub fn vec(&self) -> &Vec3 {
        &self.vec
    }

    pub fn set_vec(&mut self, vec: Vec3) -> &mut Self {
        self.vec = vec;
        self
    }

    /// Become the shift `first`, followed by `second`.
    pub fn set_as_composite(&mut self, first: &Shift, second: &Shift) -> &mut Self {
        self.vec = shift_vec(&first.vec, &second.vec);
        self
    }

    pub fn add(&self, other: &Shift) -> Shift {
        Shift::new(shift_vec(&self.vec, &other.vec))
    }

    /// Alias for [`add`](Self::add); shifts commute.
    pub fn after(&self, other: &Shift) -> Shift {
        self.add(other)
    }

    pub fn inverse(&self) -> Shift {
        Shift::new(-self.vec)
    }

    #[inline]
    pub fn shift(&self, v: &Vec3) -> Vec3 {
        shift_vec(&self.vec, v)
    }

    #[inline]
    pub fn shift_ip(&self, v: &mut Vec3) {
        shift_vec_ip(&self.vec, v);
    }

    #[inline]
    pub fn unshift(&self, v: &Vec3) -> Vec3 {
        shift_vec_inv(&self.vec, v)
    }

    #[inline]
    pub fn unshift_ip(&self, v: &mut Vec3) {
        shift_vec_ip_inv(&self.vec, v);
    }
}

impl From<Vec3> for Shift {
    fn from(vec: Vec3) -> Self {
        Self::new(vec)
    }
}

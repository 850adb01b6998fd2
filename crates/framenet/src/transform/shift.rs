use super::{EuclideanTransform, Transform};
use crate::State;
use framenet_core::{Euclidean, Result, Shift, Vec3};

/// A translation read from the state under `key` on every update.
///
/// Starts out as the zero shift. Orientations pass through unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct ShiftDynamicTransform {
    key: String,
    euclidean: Euclidean,
}

impl ShiftDynamicTransform {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            euclidean: Euclidean::default(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn shift(&self) -> &Shift {
        &self.euclidean.shift
    }
}

impl Transform for ShiftDynamicTransform {
    fn update(&mut self, state: &State) -> Result<()> {
        if let Some(vec) = state.vec3(&self.key)? {
            self.euclidean.shift.set_vec(vec);
        }
        Ok(())
    }

    forward_to_euclidean!();
}

impl EuclideanTransform for ShiftDynamicTransform {
    fn euclidean_ref(&self) -> &Euclidean {
        &self.euclidean
    }
}

/// A fixed translation.
#[derive(Clone, Debug, PartialEq)]
pub struct ShiftStaticTransform {
    euclidean: Euclidean,
}

impl ShiftStaticTransform {
    pub fn new(vec: Vec3) -> Self {
        let mut euclidean = Euclidean::default();
        euclidean.shift.set_vec(vec);
        Self { euclidean }
    }

    pub fn from_slice(vec: &[f64]) -> Result<Self> {
        Shift::from_slice(vec).map(|s| Self::new(*s.vec()))
    }

    pub fn shift(&self) -> &Shift {
        &self.euclidean.shift
    }
}

impl Transform for ShiftStaticTransform {
    forward_to_euclidean!();
}

impl EuclideanTransform for ShiftStaticTransform {
    fn euclidean_ref(&self) -> &Euclidean {
        &self.euclidean
    }
}

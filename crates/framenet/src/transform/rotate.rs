use super::{EuclideanTransform, Transform};
use crate::State;
use framenet_core::{Euclidean, EulerAngles, Result, UnitQuaternion, Vec3};
use serde::{Deserialize, Serialize};

/// Where a [`RotateDynamicTransform`] finds its rotation in the state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationKeys {
    /// A scalar angle in radians and a 3-vector axis.
    Axis { angle: String, axis: String },
    /// A raw `[re, i, j, k]` quaternion vector.
    Vector(String),
    /// Any subset of scalar Euler angles.
    Euler {
        yaw: Option<String>,
        pitch: Option<String>,
        roll: Option<String>,
    },
}

impl RotationKeys {
    pub fn axis(angle: impl Into<String>, axis: impl Into<String>) -> Self {
        Self::Axis {
            angle: angle.into(),
            axis: axis.into(),
        }
    }

    pub fn vector(key: impl Into<String>) -> Self {
        Self::Vector(key.into())
    }

    pub fn euler(yaw: Option<&str>, pitch: Option<&str>, roll: Option<&str>) -> Self {
        Self::Euler {
            yaw: yaw.map(str::to_owned),
            pitch: pitch.map(str::to_owned),
            roll: roll.map(str::to_owned),
        }
    }
}

fn optional_scalar(state: &State, key: Option<&String>) -> Result<Option<f64>> {
    match key {
        Some(key) => state.scalar(key),
        None => Ok(None),
    }
}

/// A rotation read from the state on every update.
///
/// Starts out as the identity. Components that are absent from a state keep
/// the value they had, so an angle-only update reuses the last axis and a
/// yaw-only update keeps the last pitch and roll.
#[derive(Clone, Debug, PartialEq)]
pub struct RotateDynamicTransform {
    keys: RotationKeys,
    angle: f64,
    axis: Vec3,
    angles: EulerAngles,
    euclidean: Euclidean,
}

impl RotateDynamicTransform {
    pub fn new(keys: RotationKeys) -> Self {
        Self {
            keys,
            angle: 0.0,
            axis: Vec3::z(),
            angles: EulerAngles::default(),
            euclidean: Euclidean::default(),
        }
    }

    pub fn keys(&self) -> &RotationKeys {
        &self.keys
    }

    pub fn quat(&self) -> &UnitQuaternion {
        &self.euclidean.quat
    }
}

impl Transform for RotateDynamicTransform {
    fn update(&mut self, state: &State) -> Result<()> {
        match &self.keys {
            RotationKeys::Axis { angle, axis } => {
                let new_angle = state.scalar(angle)?;
                let new_axis = state.vec3(axis)?;
                if new_angle.is_none() && new_axis.is_none() {
                    return Ok(());
                }
                let angle = new_angle.unwrap_or(self.angle);
                let axis = new_axis.unwrap_or(self.axis);
                self.euclidean.quat.set_axis(angle, axis)?;
                self.angle = angle;
                self.axis = axis;
            }
            RotationKeys::Vector(key) => {
                if let Some(qvec) = state.vec4(key)? {
                    self.euclidean.quat.set_vec(qvec)?;
                }
            }
            RotationKeys::Euler { yaw, pitch, roll } => {
                let yaw = optional_scalar(state, yaw.as_ref())?;
                let pitch = optional_scalar(state, pitch.as_ref())?;
                let roll = optional_scalar(state, roll.as_ref())?;
                if yaw.is_none() && pitch.is_none() && roll.is_none() {
                    return Ok(());
                }
                let angles = EulerAngles {
                    yaw: yaw.unwrap_or(self.angles.yaw),
                    pitch: pitch.unwrap_or(self.angles.pitch),
                    roll: roll.unwrap_or(self.angles.roll),
                };
                self.euclidean
                    .quat
                    .set_euler(angles.yaw, angles.pitch, angles.roll)?;
                self.angles = angles;
            }
        }
        Ok(())
    }

    forward_to_euclidean!();
}

impl EuclideanTransform for RotateDynamicTransform {
    fn euclidean_ref(&self) -> &Euclidean {
        &self.euclidean
    }
}

/// A fixed rotation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RotateStaticTransform {
    euclidean: Euclidean,
}

impl RotateStaticTransform {
    pub fn new(quat: UnitQuaternion) -> Self {
        let mut euclidean = Euclidean::default();
        euclidean.quat = quat;
        Self { euclidean }
    }

    pub fn from_axis(angle: f64, axis: Vec3) -> Result<Self> {
        UnitQuaternion::from_axis(angle, axis).map(Self::new)
    }

    pub fn from_vec(qvec: [f64; 4]) -> Result<Self> {
        UnitQuaternion::from_vec(qvec).map(Self::new)
    }

    pub fn from_euler(angles: EulerAngles) -> Result<Self> {
        UnitQuaternion::from_euler(angles).map(Self::new)
    }

    pub fn quat(&self) -> &UnitQuaternion {
        &self.euclidean.quat
    }
}

impl Transform for RotateStaticTransform {
    forward_to_euclidean!();
}

impl EuclideanTransform for RotateStaticTransform {
    fn euclidean_ref(&self) -> &Euclidean {
        &self.euclidean
    }
}

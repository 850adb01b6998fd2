//! Dynamic state pushed into transforms on every `update`.
//!
//! A [`State`] is a plain `name → value` mapping, typically deserialized from
//! JSON such as `{"atb": [1, 0, 0], "angle": 0.5, "Q": [[..], ..]}`. Lookups
//! distinguish an absent key (`Ok(None)`, i.e. "no new information") from a
//! present key of the wrong shape (`Err(InvalidDimension)`).

use std::collections::HashMap;

use framenet_core::{Error, Result, Vec3};
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

/// One entry of a [`State`]: a scalar, a vector or a row-major matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Scalar(f64),
    Vector(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

impl StateValue {
    /// Number of scalar components held by this value.
    pub fn len(&self) -> usize {
        match self {
            StateValue::Scalar(_) => 1,
            StateValue::Vector(v) => v.len(),
            StateValue::Matrix(rows) => rows.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn vector<const N: usize>(&self) -> Result<[f64; N]> {
        match self {
            StateValue::Vector(v) => v.as_slice().try_into().map_err(|_| Error::InvalidDimension {
                expected: N,
                found: v.len(),
            }),
            other => Err(Error::InvalidDimension {
                expected: N,
                found: other.len(),
            }),
        }
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        StateValue::Scalar(value)
    }
}

impl From<Vec<f64>> for StateValue {
    fn from(value: Vec<f64>) -> Self {
        StateValue::Vector(value)
    }
}

impl<const N: usize> From<[f64; N]> for StateValue {
    fn from(value: [f64; N]) -> Self {
        StateValue::Vector(value.to_vec())
    }
}

impl From<Vec3> for StateValue {
    fn from(value: Vec3) -> Self {
        StateValue::Vector(value.as_slice().to_vec())
    }
}

impl From<[[f64; 4]; 4]> for StateValue {
    fn from(rows: [[f64; 4]; 4]) -> Self {
        StateValue::Matrix(rows.iter().map(|r| r.to_vec()).collect())
    }
}

/// Mapping from data keys to dynamic values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    values: HashMap<String, StateValue>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of keyed values.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StateValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StateValue>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn scalar(&self, key: &str) -> Result<Option<f64>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(StateValue::Scalar(x)) => Ok(Some(*x)),
            Some(StateValue::Vector(v)) if v.len() == 1 => Ok(Some(v[0])),
            Some(other) => Err(Error::InvalidDimension {
                expected: 1,
                found: other.len(),
            }),
        }
    }

    pub fn vec3(&self, key: &str) -> Result<Option<Vec3>> {
        self.values
            .get(key)
            .map(|v| v.vector::<3>().map(Vec3::from))
            .transpose()
    }

    pub fn vec4(&self, key: &str) -> Result<Option<[f64; 4]>> {
        self.values.get(key).map(StateValue::vector::<4>).transpose()
    }

    /// A 4×4 matrix given as four rows of four values.
    pub fn matrix4(&self, key: &str) -> Result<Option<Matrix4<f64>>> {
        let Some(value) = self.values.get(key) else {
            return Ok(None);
        };
        let StateValue::Matrix(rows) = value else {
            return Err(Error::InvalidDimension {
                expected: 16,
                found: value.len(),
            });
        };
        if rows.len() != 4 {
            return Err(Error::InvalidDimension {
                expected: 4,
                found: rows.len(),
            });
        }
        if let Some(row) = rows.iter().find(|r| r.len() != 4) {
            return Err(Error::InvalidDimension {
                expected: 4,
                found: row.len(),
            });
        }
        Ok(Some(Matrix4::from_fn(|r, c| rows[r][c])))
    }
}

impl<K: Into<String>, V: Into<StateValue>> FromIterator<(K, V)> for State {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = State::new();
        for (k, v) in iter {
            state.insert(k, v);
        }
        state
    }
}

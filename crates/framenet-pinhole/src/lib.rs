//! Pinhole stereo camera formulas.
//!
//! A [`PinholeCameraPair`] maps world points to image coordinates plus
//! disparity and back, using the 4×4 reprojection matrix `Q` of a rectified
//! stereo pair. With focal length `f = Q[2][3]` and inverse baseline
//! `1/B = Q[3][2]`:
//!
//! ```text
//! image:   d = f / (z · Q[3][2]),  x' = x · f / d − Q[0][3],  y' = y · f / d − Q[1][3]
//! project: z = f / (d · Q[3][2]),  x = (x' + Q[0][3]) · z / f, y = (y' + Q[1][3]) · z / f
//! ```
//!
//! Points on the camera plane (`z = 0`) image to infinite disparity, following
//! IEEE semantics rather than failing.

use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// World point to `(x', y', disparity)`.
pub fn image(w: &Vector3<f64>, q: &Matrix4<f64>) -> Vector3<f64> {
    let f = q[(2, 3)];
    let d = f / (w[2] * q[(3, 2)]);
    Vector3::new(w[0] * f / d - q[(0, 3)], w[1] * f / d - q[(1, 3)], d)
}

pub fn image_ip(v: &mut Vector3<f64>, q: &Matrix4<f64>) {
    *v = image(v, q);
}

/// `(x', y', disparity)` back to the world point.
pub fn project(i: &Vector3<f64>, q: &Matrix4<f64>) -> Vector3<f64> {
    let f = q[(2, 3)];
    let z = f / (i[2] * q[(3, 2)]);
    Vector3::new((i[0] + q[(0, 3)]) * z / f, (i[1] + q[(1, 3)]) * z / f, z)
}

pub fn project_ip(v: &mut Vector3<f64>, q: &Matrix4<f64>) {
    *v = project(v, q);
}

/// A rectified stereo camera pair described by its reprojection matrix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinholeCameraPair {
    q: Matrix4<f64>,
}

impl Default for PinholeCameraPair {
    fn default() -> Self {
        Self {
            q: Matrix4::new(
                0.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, //
                0.0, 0.0, 1.0, 0.0,
            ),
        }
    }
}

impl PinholeCameraPair {
    pub fn new(q: Matrix4<f64>) -> Self {
        Self { q }
    }

    /// Build from row-major nested arrays.
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self::new(Matrix4::from_fn(|r, c| rows[r][c]))
    }

    pub fn q(&self) -> &Matrix4<f64> {
        &self.q
    }

    pub fn set_q(&mut self, q: Matrix4<f64>) -> &mut Self {
        self.q = q;
        self
    }

    pub fn image(&self, w: &Vector3<f64>) -> Vector3<f64> {
        image(w, &self.q)
    }

    pub fn image_ip(&self, v: &mut Vector3<f64>) {
        image_ip(v, &self.q);
    }

    pub fn project(&self, i: &Vector3<f64>) -> Vector3<f64> {
        project(i, &self.q)
    }

    pub fn project_ip(&self, v: &mut Vector3<f64>) {
        project_ip(v, &self.q);
    }
}

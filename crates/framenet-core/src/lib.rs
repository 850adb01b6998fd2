//! Core algebra for coordinate frame networks.
//!
//! This crate is intentionally small and purely geometric: unit quaternions
//! (double cover of SO(3)), shifts (T(3)) and their roto-translation pairing
//! in two conventions (double cover of SE(3)). Graph logic lives in `framenet`.

mod error;
mod euclidean;
mod logger;
mod quaternion;
mod shift;

pub use error::{Error, Result};
pub use euclidean::{homogeneous_rows, Affine, AffineRecord, Convention, Euclidean};
pub use quaternion::{
    quat_conj, quat_mult, quat_unwrap, quat_unwrap_ip, quat_wrap, quat_wrap_ip, EulerAngles,
    QuaternionRecord, UnitQuaternion, NORM_EPSILON,
};
pub use shift::{shift_vec, shift_vec_inv, shift_vec_ip, shift_vec_ip_inv, Shift};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_filter, init_with_level, LogFilter, LOG_ENV};

/// 3D vectors are plain nalgebra column vectors.
pub type Vec3 = nalgebra::Vector3<f64>;

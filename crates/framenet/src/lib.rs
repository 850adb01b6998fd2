//! Networks of named 3D coordinate frames.
//!
//! Frames are joined by [`Transform`] edges. After
//! [`compile`](CoordinateNetwork::compile) every pair of connected frames has
//! a cached shortest path. Positions, orientations and whole rigid motions can
//! then be carried between any two frames, while dynamic edges are refreshed
//! from a [`State`] mapping.
//!
//! ## Quickstart
//!
//! ```
//! use framenet::{CoordinateNetwork, ShiftDynamicTransform, ShiftStaticTransform, State, Vec3};
//!
//! # fn main() -> Result<(), framenet::Error> {
//! let mut net = CoordinateNetwork::new();
//! net.connect_systems("A", ShiftDynamicTransform::new("A_to_B"), "B")
//!     .connect_systems("B", ShiftStaticTransform::new(Vec3::new(1.0, 0.0, 0.0)), "C")
//!     .compile();
//!
//! net.update(&State::new().with("A_to_B", [-1.0, 0.0, 0.0]))?;
//! assert_eq!(net.transform_vec(&Vec3::zeros(), "A", "C")?, Vec3::zeros());
//!
//! net.update(&State::new().with("A_to_B", [1.0, 0.0, 0.0]))?;
//! assert_eq!(net.transform_vec(&Vec3::zeros(), "A", "C")?, Vec3::new(2.0, 0.0, 0.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `framenet::core`: quaternion, shift and Euclidean algebra.
//! - `framenet::pinhole`: stereo pinhole image/project formulas.
//! - [`CoordinateNetwork`]: graph assembly, compilation, updates and queries.
//! - [`Transform`] and its variants: the edge behaviors.
//! - [`State`]: keyed dynamic data consumed by `update`.

pub use framenet_core as core;
pub use framenet_pinhole as pinhole;

mod network;
mod state;
mod system;
pub mod transform;

pub use framenet_core::{
    init_with_filter, init_with_level, Affine, Convention, Error, Euclidean, EulerAngles,
    LogFilter, Result, Shift, UnitQuaternion, Vec3,
};
pub use network::CoordinateNetwork;
pub use state::{State, StateValue};
pub use system::{CoordinateSystem, EdgeTransform};
pub use transform::{
    CompositeTransform, EuclideanCompositeTransform, EuclideanStaticTransform,
    EuclideanTransform, IdentityTransform, InverseTransform, PinholeCameraTransform,
    RotateDynamicTransform, RotateStaticTransform, RotationKeys, ShiftDynamicTransform,
    ShiftStaticTransform, Transform,
};

/// Route `log` records into `tracing` and install a subscriber filtered by
/// `RUST_LOG`, or by `FRAMENET_LOG` module levels when that is unset.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    // a logger may already be installed when several entry points share a process
    let _ = tracing_log::LogTracer::init();
    framenet_core::init_tracing(json);
}

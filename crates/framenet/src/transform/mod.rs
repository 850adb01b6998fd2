//! Edge transforms of a coordinate network.
//!
//! Every edge of a [`CoordinateNetwork`](crate::CoordinateNetwork) owns one
//! [`Transform`]. The capability set is:
//! - `update`: pull dynamic parameters out of a [`State`],
//! - `transform_vec` / `untransform_vec`: positions,
//! - `transform_quat` / `untransform_quat`: orientation re-labeling
//!   (coordinate convention change),
//! - `orient` / `unorient`: orientation re-referencing,
//!
//! each with an in-place `_ip` variant. Only the `_ip` methods need to be
//! implemented; the value-returning ones are derived from them. All methods
//! default to the identity.
//!
//! The reverse direction of a two-way edge is an [`InverseTransform`], a
//! borrowed view that swaps every transform/untransform pair.

/// Forward every geometric method of [`Transform`] to `self.euclidean_ref()`.
///
/// Expands inside an `impl Transform for ...` block of a type that also
/// implements [`EuclideanTransform`]; `update` is left to the caller.
macro_rules! forward_to_euclidean {
    () => {
        fn transform_vec_ip(&self, v: &mut $crate::Vec3) {
            self.euclidean_ref().transform_vec_ip(v)
        }

        fn untransform_vec_ip(&self, v: &mut $crate::Vec3) {
            self.euclidean_ref().untransform_vec_ip(v)
        }

        fn transform_quat_ip(&self, q: &mut $crate::UnitQuaternion) {
            self.euclidean_ref().transform_quat_ip(q)
        }

        fn untransform_quat_ip(&self, q: &mut $crate::UnitQuaternion) {
            self.euclidean_ref().untransform_quat_ip(q)
        }

        fn orient_ip(&self, q: &mut $crate::UnitQuaternion) {
            self.euclidean_ref().orient_ip(q)
        }

        fn unorient_ip(&self, q: &mut $crate::UnitQuaternion) {
            self.euclidean_ref().unorient_ip(q)
        }

        fn euclidean(&self) -> Option<$crate::Euclidean> {
            Some(*self.euclidean_ref())
        }
    };
}

mod composite;
mod euclidean;
mod pinhole;
mod rotate;
mod shift;

pub use composite::CompositeTransform;
pub use euclidean::{EuclideanCompositeTransform, EuclideanStaticTransform};
pub use pinhole::PinholeCameraTransform;
pub use rotate::{RotateDynamicTransform, RotateStaticTransform, RotationKeys};
pub use shift::{ShiftDynamicTransform, ShiftStaticTransform};

use std::fmt;

use crate::State;
use framenet_core::{Euclidean, Result, UnitQuaternion, Vec3};

pub trait Transform: fmt::Debug + Send + Sync {
    /// Refresh dynamic parameters from `state`.
    ///
    /// Absent keys leave the current parameters untouched; a present key of
    /// the wrong shape is an error.
    fn update(&mut self, _state: &State) -> Result<()> {
        Ok(())
    }

    fn transform_vec_ip(&self, _v: &mut Vec3) {}

    fn untransform_vec_ip(&self, _v: &mut Vec3) {}

    fn transform_quat_ip(&self, _q: &mut UnitQuaternion) {}

    fn untransform_quat_ip(&self, _q: &mut UnitQuaternion) {}

    fn orient_ip(&self, _q: &mut UnitQuaternion) {}

    fn unorient_ip(&self, _q: &mut UnitQuaternion) {}

    fn transform_vec(&self, v: &Vec3) -> Vec3 {
        let mut out = *v;
        self.transform_vec_ip(&mut out);
        out
    }

    fn untransform_vec(&self, v: &Vec3) -> Vec3 {
        let mut out = *v;
        self.untransform_vec_ip(&mut out);
        out
    }

    fn transform_quat(&self, q: &UnitQuaternion) -> UnitQuaternion {
        let mut out = *q;
        self.transform_quat_ip(&mut out);
        out
    }

    fn untransform_quat(&self, q: &UnitQuaternion) -> UnitQuaternion {
        let mut out = *q;
        self.untransform_quat_ip(&mut out);
        out
    }

    fn orient(&self, q: &UnitQuaternion) -> UnitQuaternion {
        let mut out = *q;
        self.orient_ip(&mut out);
        out
    }

    fn unorient(&self, q: &UnitQuaternion) -> UnitQuaternion {
        let mut out = *q;
        self.unorient_ip(&mut out);
        out
    }

    /// The rigid motion equivalent to this transform, if it is one.
    ///
    /// Projective and other non-rigid transforms return `None`.
    fn euclidean(&self) -> Option<Euclidean> {
        None
    }

    fn is_euclidean(&self) -> bool {
        self.euclidean().is_some()
    }

    /// `true` for views derived by inverting a declared transform.
    fn is_inverse(&self) -> bool {
        false
    }

    fn inverse(&self) -> InverseTransform<'_>
    where
        Self: Sized,
    {
        InverseTransform::new(self)
    }
}

/// A [`Transform`] whose behavior is fully described by an owned [`Euclidean`].
///
/// Only these can be folded by [`EuclideanCompositeTransform`].
pub trait EuclideanTransform: Transform {
    fn euclidean_ref(&self) -> &Euclidean;
}

impl Transform for Box<dyn Transform> {
    fn update(&mut self, state: &State) -> Result<()> {
        (**self).update(state)
    }

    fn transform_vec_ip(&self, v: &mut Vec3) {
        (**self).transform_vec_ip(v)
    }

    fn untransform_vec_ip(&self, v: &mut Vec3) {
        (**self).untransform_vec_ip(v)
    }

    fn transform_quat_ip(&self, q: &mut UnitQuaternion) {
        (**self).transform_quat_ip(q)
    }

    fn untransform_quat_ip(&self, q: &mut UnitQuaternion) {
        (**self).untransform_quat_ip(q)
    }

    fn orient_ip(&self, q: &mut UnitQuaternion) {
        (**self).orient_ip(q)
    }

    fn unorient_ip(&self, q: &mut UnitQuaternion) {
        (**self).unorient_ip(q)
    }

    fn euclidean(&self) -> Option<Euclidean> {
        (**self).euclidean()
    }

    fn is_inverse(&self) -> bool {
        (**self).is_inverse()
    }
}

/// Borrowed inverse of a transform.
///
/// Both directions share the owner's parameters, so `update` is a no-op here:
/// only the declared direction consumes dynamic state.
#[derive(Clone, Copy, Debug)]
pub struct InverseTransform<'a> {
    inner: &'a dyn Transform,
}

impl<'a> InverseTransform<'a> {
    pub fn new(inner: &'a dyn Transform) -> Self {
        Self { inner }
    }

    /// The transform this view inverts.
    pub fn inner(&self) -> &'a dyn Transform {
        self.inner
    }
}

impl Transform for InverseTransform<'_> {
    fn transform_vec_ip(&self, v: &mut Vec3) {
        self.inner.untransform_vec_ip(v)
    }

    fn untransform_vec_ip(&self, v: &mut Vec3) {
        self.inner.transform_vec_ip(v)
    }

    fn transform_quat_ip(&self, q: &mut UnitQuaternion) {
        self.inner.untransform_quat_ip(q)
    }

    fn untransform_quat_ip(&self, q: &mut UnitQuaternion) {
        self.inner.transform_quat_ip(q)
    }

    fn orient_ip(&self, q: &mut UnitQuaternion) {
        self.inner.unorient_ip(q)
    }

    fn unorient_ip(&self, q: &mut UnitQuaternion) {
        self.inner.orient_ip(q)
    }

    fn euclidean(&self) -> Option<Euclidean> {
        self.inner.euclidean().map(|e| e.get_inv())
    }

    fn is_inverse(&self) -> bool {
        true
    }
}

/// The identity transform. Useful as a placeholder edge that only asserts
/// two frames coincide.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityTransform;

impl IdentityTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for IdentityTransform {
    fn euclidean(&self) -> Option<Euclidean> {
        Some(Euclidean::default())
    }
}

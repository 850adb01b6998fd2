use super::Transform;
use crate::State;
use framenet_core::{Convention, Euclidean, Result, UnitQuaternion, Vec3};

/// Generic chaining of two arbitrary transforms: `first`, then `second`.
///
/// Unlike [`EuclideanCompositeTransform`](super::EuclideanCompositeTransform)
/// nothing is precomputed; every call walks both children.
#[derive(Debug)]
pub struct CompositeTransform {
    first: Box<dyn Transform>,
    second: Box<dyn Transform>,
}

impl CompositeTransform {
    pub fn new(first: impl Transform + 'static, second: impl Transform + 'static) -> Self {
        Self::from_boxed(Box::new(first), Box::new(second))
    }

    pub fn from_boxed(first: Box<dyn Transform>, second: Box<dyn Transform>) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &dyn Transform {
        self.first.as_ref()
    }

    pub fn second(&self) -> &dyn Transform {
        self.second.as_ref()
    }
}

impl Transform for CompositeTransform {
    fn update(&mut self, state: &State) -> Result<()> {
        let first = self.first.update(state);
        let second = self.second.update(state);
        first.and(second)
    }

    fn transform_vec_ip(&self, v: &mut Vec3) {
        self.first.transform_vec_ip(v);
        self.second.transform_vec_ip(v);
    }

    fn untransform_vec_ip(&self, v: &mut Vec3) {
        self.second.untransform_vec_ip(v);
        self.first.untransform_vec_ip(v);
    }

    fn transform_quat_ip(&self, q: &mut UnitQuaternion) {
        self.first.transform_quat_ip(q);
        self.second.transform_quat_ip(q);
    }

    fn untransform_quat_ip(&self, q: &mut UnitQuaternion) {
        self.second.untransform_quat_ip(q);
        self.first.untransform_quat_ip(q);
    }

    fn orient_ip(&self, q: &mut UnitQuaternion) {
        self.first.orient_ip(q);
        self.second.orient_ip(q);
    }

    fn unorient_ip(&self, q: &mut UnitQuaternion) {
        self.second.unorient_ip(q);
        self.first.unorient_ip(q);
    }

    fn euclidean(&self) -> Option<Euclidean> {
        let first = self.first.euclidean()?;
        let second = self.second.euclidean()?;
        let mut out = Euclidean::new(Convention::Forward);
        out.set_as_composite(&first, &second);
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{
        PinholeCameraTransform, RotateStaticTransform, ShiftDynamicTransform, ShiftStaticTransform,
    };
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    fn sample() -> CompositeTransform {
        CompositeTransform::new(
            RotateStaticTransform::from_axis(FRAC_PI_2, Vec3::new(0.0, 1.0, 1.0)).unwrap(),
            ShiftStaticTransform::new(Vec3::new(1.0, -1.0, 0.5)),
        )
    }

    #[test]
    fn chains_then_unchains() {
        let c = sample();
        let v = Vec3::new(0.3, 2.0, -1.0);
        let expected = c.second().transform_vec(&c.first().transform_vec(&v));
        assert_abs_diff_eq!(c.transform_vec(&v), expected, epsilon = 1e-12);
        assert_abs_diff_eq!(c.untransform_vec(&expected), v, epsilon = 1e-12);

        let q = UnitQuaternion::from_vec([0.8, 0.1, 0.3, -0.2]).unwrap();
        assert!(c.untransform_quat(&c.transform_quat(&q)).same_rotation(&q, 1e-12));
        assert!(c.unorient(&c.orient(&q)).same_rotation(&q, 1e-12));
    }

    #[test]
    fn euclidean_matches_chain() {
        let c = sample();
        let e = c.euclidean().unwrap();
        let v = Vec3::new(-1.0, 0.0, 4.0);
        assert_abs_diff_eq!(e.transform_vec(&v), c.transform_vec(&v), epsilon = 1e-12);
    }

    #[test]
    fn projective_child_is_not_euclidean() {
        let c = CompositeTransform::new(
            ShiftStaticTransform::new(Vec3::new(0.0, 0.0, 1.0)),
            PinholeCameraTransform::new("Q"),
        );
        assert!(!c.is_euclidean());
    }

    #[test]
    fn update_reaches_both_children() {
        let mut c = CompositeTransform::new(
            ShiftDynamicTransform::new("a"),
            ShiftDynamicTransform::new("b"),
        );
        let state = State::new()
            .with("a", [1.0, 0.0, 0.0])
            .with("b", [0.0, 2.0, 0.0]);
        c.update(&state).unwrap();
        assert_eq!(c.transform_vec(&Vec3::zeros()), Vec3::new(1.0, 2.0, 0.0));
    }
}

use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use framenet::{
    CompositeTransform, Convention, CoordinateNetwork, EuclideanCompositeTransform,
    EuclideanStaticTransform, EulerAngles, RotateDynamicTransform, RotateStaticTransform,
    RotationKeys, ShiftDynamicTransform, ShiftStaticTransform, State, Transform, UnitQuaternion,
    Vec3,
};

#[test]
fn static_euclideans_transform() {
    let v = Vec3::new(0.0, 1.0, 0.0);
    let s = ShiftStaticTransform::new(Vec3::new(1.0, 0.0, 1.0));
    assert_abs_diff_eq!(s.transform_vec(&v), Vec3::new(1.0, 1.0, 1.0), epsilon = 1e-9);

    let r = RotateStaticTransform::from_vec([0.0, 1.0, 0.0, 0.0]).unwrap();
    assert_abs_diff_eq!(r.transform_vec(&v), Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-9);

    let e = EuclideanStaticTransform::new([0.0, 1.0, 0.0, 0.0], Vec3::new(1.0, 1.0, 1.0)).unwrap();
    assert_abs_diff_eq!(e.transform_vec(&v), Vec3::new(1.0, 0.0, 1.0), epsilon = 1e-9);
}

#[test]
fn static_reverse_translation() {
    let e =
        EuclideanStaticTransform::reverse([0.0, 1.0, 0.0, 0.0], Vec3::new(1.0, 0.0, 1.0)).unwrap();
    let euclidean = e.euclidean().unwrap();
    assert_eq!(euclidean.convention, Convention::Reverse);
    assert_eq!(euclidean.quat.qvec(), &[0.0, 1.0, 0.0, 0.0]);
    assert_eq!(euclidean.shift.vec(), &Vec3::new(1.0, 0.0, 1.0));
    assert_abs_diff_eq!(euclidean.translation(), Vec3::new(1.0, 0.0, -1.0), epsilon = 1e-12);
}

#[test]
fn static_rotations_agree_across_parameterizations() {
    let expected = UnitQuaternion::from_vec([0.0, 1.0, 0.0, 0.0]).unwrap();
    let by_axis = RotateStaticTransform::from_axis(PI, Vec3::x()).unwrap();
    let by_euler = RotateStaticTransform::from_euler(EulerAngles {
        pitch: PI,
        ..EulerAngles::default()
    })
    .unwrap();
    assert!(by_axis.quat().same_rotation(&expected, 1e-9));
    assert!(by_euler.quat().same_rotation(&expected, 1e-9));
}

#[test]
fn euclidean_composite_of_rotation_and_shift() {
    let mut c = EuclideanCompositeTransform::new(
        RotateStaticTransform::from_vec([0.0, 1.0, 0.0, 0.0]).unwrap(),
        ShiftStaticTransform::new(Vec3::new(1.0, 1.0, 1.0)),
    );
    c.update(&State::new()).unwrap();
    let e = c.euclidean().unwrap();
    assert!(e
        .quat
        .same_rotation(&UnitQuaternion::from_vec([0.0, 1.0, 0.0, 0.0]).unwrap(), 1e-9));
    assert_abs_diff_eq!(*e.shift.vec(), Vec3::new(1.0, 1.0, 1.0), epsilon = 1e-9);
}

#[test]
fn json_state_drives_mixed_network() {
    let mut n = CoordinateNetwork::new();
    n.connect_systems(
        "base",
        RotateDynamicTransform::new(RotationKeys::axis("joint", "joint_axis")),
        "link",
    )
    .connect_systems(
        "link",
        EuclideanCompositeTransform::new(
            RotateDynamicTransform::new(RotationKeys::euler(Some("wrist_yaw"), None, None)),
            ShiftDynamicTransform::new("tool"),
        ),
        "tool",
    )
    .compile();

    let state = State::from_json(
        r#"{
            "joint": 3.141592653589793,
            "joint_axis": [0, 0, 1],
            "wrist_yaw": 0.0,
            "tool": [0, 0, 0.25]
        }"#,
    )
    .unwrap();
    n.update(&state).unwrap();

    let tip = n.transform_vec(&Vec3::new(1.0, 0.0, 0.0), "base", "tool").unwrap();
    assert_abs_diff_eq!(tip, Vec3::new(-1.0, 0.0, 0.25), epsilon = 1e-9);

    let affine = n.get_affine("tool", "base").unwrap();
    assert_abs_diff_eq!(affine.apply(&tip), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-9);
}

#[test]
fn generic_composite_inverse_view() {
    let c = CompositeTransform::new(
        RotateStaticTransform::from_axis(0.4, Vec3::new(0.0, 1.0, 0.0)).unwrap(),
        ShiftStaticTransform::new(Vec3::new(0.0, 0.0, 2.0)),
    );
    let boxed: Box<dyn Transform> = Box::new(c);
    let inv = boxed.inverse();
    let v = Vec3::new(0.3, -0.2, 1.0);
    assert_abs_diff_eq!(inv.transform_vec(&boxed.transform_vec(&v)), v, epsilon = 1e-12);
    assert!(inv.is_inverse());

    let e = inv.euclidean().unwrap();
    assert_abs_diff_eq!(e.transform_vec(&v), boxed.untransform_vec(&v), epsilon = 1e-12);
}

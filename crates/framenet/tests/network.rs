use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2};

use approx::assert_abs_diff_eq;
use framenet::{
    CoordinateNetwork, Error, EuclideanStaticTransform, IdentityTransform,
    PinholeCameraTransform, RotateStaticTransform, ShiftDynamicTransform, ShiftStaticTransform,
    State, UnitQuaternion, Vec3,
};

fn topology() -> CoordinateNetwork {
    let mut n = CoordinateNetwork::new();
    n.connect_systems("a", IdentityTransform, "b")
        .connect_systems("b", IdentityTransform, "c")
        .connect_systems("b", IdentityTransform, "d")
        .connect_systems("d", IdentityTransform, "e")
        .connect_systems("e", IdentityTransform, "f")
        .connect_systems("f", IdentityTransform, "c")
        .connect_systems("y", IdentityTransform, "z")
        .compile();
    n
}

fn shifts() -> CoordinateNetwork {
    let mut n = CoordinateNetwork::new();
    n.connect_systems("a", ShiftStaticTransform::new(Vec3::new(1.0, 0.0, 0.0)), "b")
        .connect_systems("b", ShiftStaticTransform::new(Vec3::new(0.0, 1.0, 0.0)), "c")
        .connect_systems("b", ShiftStaticTransform::new(Vec3::new(0.0, 0.0, 1.0)), "d")
        .connect_systems("d", ShiftStaticTransform::new(Vec3::new(0.0, 0.0, 1.0)), "e")
        .connect_systems("e", ShiftStaticTransform::new(Vec3::new(0.0, 0.0, -2.0)), "f")
        .connect_systems("f", ShiftStaticTransform::new(Vec3::new(0.0, 1.0, 0.0)), "c")
        .connect_systems("y", ShiftStaticTransform::new(Vec3::new(1.0, 1.0, 1.0)), "z")
        .compile();
    n
}

#[test]
fn compile_finds_minimal_paths() {
    let n = topology();
    assert_eq!(n.path("a", "f").unwrap(), ["b", "c", "f"]);
    assert_eq!(n.path("a", "e").unwrap(), ["b", "d", "e"]);
    assert_eq!(n.path("f", "a").unwrap(), ["c", "b", "a"]);
    assert_eq!(n.path("z", "y").unwrap(), ["y"]);
    assert_eq!(n.path("a", "a").unwrap(), Vec::<&str>::new());
    assert!(n.path("a", "z").is_err());
}

#[test]
fn compile_is_idempotent() {
    let mut n = topology();
    n.compile();
    assert_eq!(n.path("a", "f").unwrap(), ["b", "c", "f"]);
    assert_eq!(n.path("e", "c").unwrap(), ["f", "c"]);
}

#[test]
fn systems_are_listed_in_creation_order() {
    let n = topology();
    assert_eq!(
        n.systems().collect::<Vec<_>>(),
        ["a", "b", "c", "d", "e", "f", "y", "z"]
    );
    assert!(n.contains("y"));
    assert!(!n.contains("q"));
    assert_eq!(n.system("b").map(|s| s.degree()), Some(3));
}

#[test]
fn lookup_errors_are_distinguished() {
    let n = shifts();
    assert_eq!(
        n.transform_vec(&Vec3::zeros(), "q", "b"),
        Err(Error::UnknownSystem("q".into()))
    );
    assert_eq!(
        n.transform_vec(&Vec3::zeros(), "a", "q"),
        Err(Error::UnknownSystem("q".into()))
    );
    assert_eq!(
        n.transform_vec(&Vec3::zeros(), "a", "z"),
        Err(Error::PathNotFound {
            from: "a".into(),
            to: "z".into()
        })
    );
}

#[test]
fn shifts_compose_along_paths() {
    let n = shifts();
    let origin = Vec3::zeros();
    assert_eq!(n.transform_vec(&origin, "a", "b").unwrap(), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(n.transform_vec(&origin, "a", "c").unwrap(), Vec3::new(1.0, 1.0, 0.0));
    assert_eq!(n.transform_vec(&origin, "a", "d").unwrap(), Vec3::new(1.0, 0.0, 1.0));
    // c -> f walks the f -> c edge backwards
    assert_eq!(n.transform_vec(&origin, "a", "f").unwrap(), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(n.transform_vec(&origin, "c", "a").unwrap(), Vec3::new(-1.0, -1.0, 0.0));

    let mut v = origin;
    n.transform_vec_ip(&mut v, "a", "c").unwrap();
    assert_eq!(v, Vec3::new(1.0, 1.0, 0.0));
}

#[test]
fn dynamic_updates_override() {
    let mut n = CoordinateNetwork::new();
    n.connect_systems("a", ShiftDynamicTransform::new("atb"), "b")
        .connect_systems("b", ShiftDynamicTransform::new("btc"), "c")
        .compile();

    n.update(
        &State::new()
            .with("atb", [1.0, 0.0, 0.0])
            .with("btc", [0.0, 1.0, 0.0]),
    )
    .unwrap();
    assert_eq!(n.transform_vec(&Vec3::zeros(), "a", "c").unwrap(), Vec3::new(1.0, 1.0, 0.0));

    n.update(
        &State::new()
            .with("atb", [2.0, 0.0, 0.0])
            .with("btc", [0.0, 2.0, 0.0]),
    )
    .unwrap();
    assert_eq!(n.transform_vec(&Vec3::zeros(), "a", "c").unwrap(), Vec3::new(2.0, 2.0, 0.0));

    // partial state only touches the named edge
    n.update(&State::new().with("atb", [0.0, 0.0, 0.0])).unwrap();
    assert_eq!(n.transform_vec(&Vec3::zeros(), "a", "c").unwrap(), Vec3::new(0.0, 2.0, 0.0));
}

#[test]
fn rejected_update_does_not_stop_the_rest() {
    let mut n = CoordinateNetwork::new();
    n.connect_systems("a", ShiftDynamicTransform::new("atb"), "b")
        .connect_systems("b", ShiftDynamicTransform::new("btc"), "c")
        .compile();
    let state = State::from_json(r#"{"atb": [1, 2], "btc": [0, 5, 0]}"#).unwrap();
    assert_eq!(
        n.update(&state),
        Err(Error::InvalidDimension {
            expected: 3,
            found: 2
        })
    );
    assert_eq!(n.transform_vec(&Vec3::zeros(), "a", "c").unwrap(), Vec3::new(0.0, 5.0, 0.0));
}

fn rotations() -> CoordinateNetwork {
    let mut n = CoordinateNetwork::new();
    n.connect_systems("a", IdentityTransform, "b")
        .connect_systems(
            "b",
            RotateStaticTransform::from_axis(-FRAC_PI_2, Vec3::x()).unwrap(),
            "c",
        )
        .connect_systems(
            "c",
            RotateStaticTransform::from_axis(FRAC_PI_2, Vec3::y()).unwrap(),
            "d",
        )
        .compile();
    n
}

#[test]
fn quaternions_change_coordinate_convention() {
    let n = rotations();
    let about_x = UnitQuaternion::from_axis(FRAC_PI_2, Vec3::x()).unwrap();
    let about_z = UnitQuaternion::from_vec([FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2]).unwrap();

    let out = n.transform_quat(&about_x, "a", "d").unwrap();
    assert!(out.same_rotation(&about_z, 1e-9), "{:?}", out.qvec());

    let back = n.transform_quat(&out, "d", "a").unwrap();
    assert!(back.same_rotation(&about_x, 1e-9));

    let mut q = about_x;
    n.transform_quat_ip(&mut q, "a", "d").unwrap();
    assert!(q.same_rotation(&about_z, 1e-9));
}

#[test]
fn orientations_re_reference() {
    let n = rotations();
    let q = UnitQuaternion::from_axis(FRAC_PI_2, Vec3::y()).unwrap();
    // undo the -90 degree x turn, then apply q: 120 degrees about (1, 1, 1)
    let out = n.orient(&q, "b", "c").unwrap();
    let expected = UnitQuaternion::from_vec([0.5, 0.5, 0.5, 0.5]).unwrap();
    assert!(out.same_rotation(&expected, 1e-9), "{:?}", out.qvec());

    let mut p = q;
    n.orient_ip(&mut p, "a", "d").unwrap();
    let back = n.orient(&p, "d", "a").unwrap();
    assert!(back.same_rotation(&q, 1e-9));
}

#[test]
fn affine_matches_walk() {
    let mut n = CoordinateNetwork::new();
    n.connect_systems(
        "a",
        EuclideanStaticTransform::new([0.9, 0.1, -0.3, 0.2], Vec3::new(1.0, -2.0, 0.5)).unwrap(),
        "b",
    )
    .connect_systems(
        "c",
        EuclideanStaticTransform::reverse([0.2, 0.7, 0.1, -0.4], Vec3::new(0.0, 3.0, -1.0))
            .unwrap(),
        "b",
    )
    .connect_systems(
        "c",
        RotateStaticTransform::from_axis(0.7, Vec3::new(1.0, 1.0, 0.0)).unwrap(),
        "d",
    )
    .compile();

    for (start, end) in [("a", "c"), ("c", "a"), ("a", "d"), ("d", "a"), ("b", "b")] {
        let affine = n.get_affine(start, end).unwrap();
        let h = n.get_homogeneous(start, end).unwrap();
        for v in [Vec3::zeros(), Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.5, 1.0)] {
            let walked = n.transform_vec(&v, start, end).unwrap();
            assert_abs_diff_eq!(affine.apply(&v), walked, epsilon = 1e-9);
            assert_abs_diff_eq!((h * v.push(1.0)).xyz(), walked, epsilon = 1e-9);
        }
    }
}

#[test]
fn euclidean_fold_round_trips() {
    let n = shifts();
    let there = n.get_euclidean("a", "f").unwrap();
    let back = n.get_euclidean("f", "a").unwrap();
    assert_abs_diff_eq!(*there.shift.vec(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    let v = Vec3::new(3.0, -1.0, 2.0);
    assert_abs_diff_eq!(back.transform_vec(&there.transform_vec(&v)), v, epsilon = 1e-12);
}

#[test]
fn projective_edges_block_affine_extraction() {
    let mut n = CoordinateNetwork::new();
    n.connect_systems("world", ShiftStaticTransform::new(Vec3::new(0.0, 0.0, 1.0)), "rig")
        .connect_systems("rig", PinholeCameraTransform::new("Q"), "image")
        .compile();
    n.update(&State::new().with(
        "Q",
        [
            [0.0, 0.0, 0.0, -1.0],
            [0.0, 0.0, 0.0, -1.0],
            [0.0, 0.0, 0.0, 3.0],
            [0.0, 0.0, 0.5, 0.0],
        ],
    ))
    .unwrap();

    let non_euclidean = Error::NonEuclideanTransform {
        from: "rig".into(),
        to: "image".into(),
    };
    assert_eq!(n.get_affine("rig", "image"), Err(non_euclidean.clone()));
    assert_eq!(n.get_affine("world", "image"), Err(non_euclidean.clone()));
    assert_eq!(n.get_homogeneous("world", "image"), Err(non_euclidean));
    assert!(matches!(
        n.get_affine("image", "world"),
        Err(Error::NonEuclideanTransform { .. })
    ));
    assert!(n.get_affine("world", "rig").is_ok());

    // walking still works through the projective edge
    let imaged = n.transform_vec(&Vec3::new(1.0, 1.0, 0.0), "world", "image").unwrap();
    assert_abs_diff_eq!(imaged, Vec3::new(1.5, 1.5, 6.0), epsilon = 1e-9);
}

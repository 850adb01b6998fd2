//! A two-joint arm with a stereo camera on a fixed mount.
//!
//! ```text
//! cargo run -p framenet --example arm [state.json]
//! ```
//!
//! The optional JSON file supplies the dynamic state, e.g.
//! `{"shoulder": 0.5, "elbow": [0, 0.3, 0.1], "Q": [[..], ..]}`.

use std::{env, fs};

use framenet::{
    CoordinateNetwork, EuclideanStaticTransform, PinholeCameraTransform, RotateDynamicTransform,
    RotationKeys, ShiftDynamicTransform, State, Vec3,
};
use log::info;

const DEFAULT_STATE: &str = r#"{
    "shoulder": 0.7853981633974483,
    "shoulder_axis": [0, 0, 1],
    "elbow": [0.4, 0.0, 0.1],
    "Q": [[0, 0, 0, -320], [0, 0, 0, -240], [0, 0, 0, 500], [0, 0, 10, 0]]
}"#;

fn build() -> Result<CoordinateNetwork, Box<dyn std::error::Error>> {
    let mut net = CoordinateNetwork::new();
    net.connect_systems(
        "base",
        RotateDynamicTransform::new(RotationKeys::axis("shoulder", "shoulder_axis")),
        "upper_arm",
    )
    .connect_systems("upper_arm", ShiftDynamicTransform::new("elbow"), "forearm")
    .connect_systems(
        "base",
        EuclideanStaticTransform::new([1.0, 0.0, 0.0, 0.0], Vec3::new(0.0, 0.0, -1.5))?,
        "camera",
    )
    .connect_systems_with("camera", PinholeCameraTransform::new("Q"), "image", true)
    .compile();
    Ok(net)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let raw = match env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?,
        None => DEFAULT_STATE.to_owned(),
    };
    let state = State::from_json(&raw)?;

    let mut net = build()?;
    net.update(&state)?;

    let tip = Vec3::new(0.1, 0.0, 0.0);
    for target in ["base", "camera", "image"] {
        let p = net.transform_vec(&tip, "forearm", target)?;
        info!("tip in {target}: [{:.4}, {:.4}, {:.4}]", p.x, p.y, p.z);
        println!("{target:>8}: {:?}", net.path("forearm", target)?);
    }

    let affine = net.get_affine("forearm", "camera")?;
    println!("forearm -> camera: {}", serde_json::to_string_pretty(&affine)?);

    if let Err(err) = net.get_affine("forearm", "image") {
        println!("forearm -> image: {err}");
    }
    Ok(())
}

fn init_logging() {
    #[cfg(feature = "tracing")]
    framenet::init_tracing(false);
    #[cfg(not(feature = "tracing"))]
    let _ = framenet::init_with_level(log::LevelFilter::Info);
}

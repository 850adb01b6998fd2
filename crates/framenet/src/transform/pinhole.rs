use super::Transform;
use crate::State;
use framenet_core::{Result, Vec3};
use framenet_pinhole::PinholeCameraPair;
use nalgebra::Matrix4;

/// World to `(x', y', disparity)` through a stereo pair whose reprojection
/// matrix is read from the state under `key`.
///
/// Projective, so it never folds into an affine map.
#[derive(Clone, Debug, PartialEq)]
pub struct PinholeCameraTransform {
    key: String,
    camera: PinholeCameraPair,
}

impl PinholeCameraTransform {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            camera: PinholeCameraPair::default(),
        }
    }

    pub fn with_q(key: impl Into<String>, q: Matrix4<f64>) -> Self {
        Self {
            key: key.into(),
            camera: PinholeCameraPair::new(q),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn camera(&self) -> &PinholeCameraPair {
        &self.camera
    }
}

impl Transform for PinholeCameraTransform {
    fn update(&mut self, state: &State) -> Result<()> {
        if let Some(q) = state.matrix4(&self.key)? {
            self.camera.set_q(q);
        }
        Ok(())
    }

    fn transform_vec_ip(&self, v: &mut Vec3) {
        self.camera.image_ip(v);
    }

    fn untransform_vec_ip(&self, v: &mut Vec3) {
        self.camera.project_ip(v);
    }
}

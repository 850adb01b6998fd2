/// Errors returned by frame network operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A quaternion or rotation axis was built from a (near) zero or
    /// non-finite vector.
    #[error("cannot normalize a vector of norm {norm:e}")]
    Normalization { norm: f64 },
    #[error("rotation angle must be finite, got {0}")]
    NonFiniteAngle(f64),
    #[error("coordinate network has no system named '{0}'")]
    UnknownSystem(String),
    #[error("coordinate system '{from}' cannot reach '{to}'")]
    PathNotFound { from: String, to: String },
    /// An affine/homogeneous fold crossed an edge that is not a rigid motion.
    #[error("transform from '{from}' to '{to}' is not euclidean")]
    NonEuclideanTransform { from: String, to: String },
    #[error("expected a value of dimension {expected}, got {found}")]
    InvalidDimension { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

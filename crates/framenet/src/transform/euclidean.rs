use super::{EuclideanTransform, Transform};
use crate::State;
use framenet_core::{Convention, Euclidean, Result, Vec3};

/// A fixed roto-translation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EuclideanStaticTransform {
    euclidean: Euclidean,
}

impl EuclideanStaticTransform {
    /// Rotate by `qvec`, then shift by `vec`.
    pub fn new(qvec: [f64; 4], vec: Vec3) -> Result<Self> {
        Euclidean::from_vecs(qvec, vec, Convention::Forward).map(Self::from_euclidean)
    }

    /// Shift by `vec`, then rotate by `qvec`.
    pub fn reverse(qvec: [f64; 4], vec: Vec3) -> Result<Self> {
        Euclidean::from_vecs(qvec, vec, Convention::Reverse).map(Self::from_euclidean)
    }

    pub fn from_euclidean(euclidean: Euclidean) -> Self {
        Self { euclidean }
    }
}

impl Transform for EuclideanStaticTransform {
    forward_to_euclidean!();
}

impl EuclideanTransform for EuclideanStaticTransform {
    fn euclidean_ref(&self) -> &Euclidean {
        &self.euclidean
    }
}

/// Two Euclidean-backed transforms folded into a single roto-translation.
///
/// The combined motion is recomputed at construction and after every update,
/// so queries never walk the children.
#[derive(Debug)]
pub struct EuclideanCompositeTransform {
    first: Box<dyn EuclideanTransform>,
    second: Box<dyn EuclideanTransform>,
    euclidean: Euclidean,
}

impl EuclideanCompositeTransform {
    /// `first`, followed by `second`, stored in forward convention.
    pub fn new(
        first: impl EuclideanTransform + 'static,
        second: impl EuclideanTransform + 'static,
    ) -> Self {
        Self::with_convention(first, second, Convention::Forward)
    }

    pub fn with_convention(
        first: impl EuclideanTransform + 'static,
        second: impl EuclideanTransform + 'static,
        convention: Convention,
    ) -> Self {
        let mut out = Self {
            first: Box::new(first),
            second: Box::new(second),
            euclidean: Euclidean::new(convention),
        };
        out.recompute();
        out
    }

    pub fn first(&self) -> &dyn EuclideanTransform {
        self.first.as_ref()
    }

    pub fn second(&self) -> &dyn EuclideanTransform {
        self.second.as_ref()
    }

    fn recompute(&mut self) {
        let (first, second) = (*self.first.euclidean_ref(), *self.second.euclidean_ref());
        self.euclidean.set_as_composite(&first, &second);
    }
}

impl Transform for EuclideanCompositeTransform {
    fn update(&mut self, state: &State) -> Result<()> {
        let first = self.first.update(state);
        let second = self.second.update(state);
        self.recompute();
        first.and(second)
    }

    forward_to_euclidean!();
}

impl EuclideanTransform for EuclideanCompositeTransform {
    fn euclidean_ref(&self) -> &Euclidean {
        &self.euclidean
    }
}

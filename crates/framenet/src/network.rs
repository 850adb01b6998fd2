//! The public graph of coordinate frames.
//!
//! The common workflow:
//! 1. create a [`CoordinateNetwork`],
//! 2. declare every edge with [`connect_systems`](CoordinateNetwork::connect_systems),
//! 3. [`compile`](CoordinateNetwork::compile) the shortest paths once,
//! 4. push dynamic data with [`update`](CoordinateNetwork::update),
//! 5. query vectors, orientations and affine maps; repeat 4 and 5 as needed.

use std::collections::HashMap;

use log::{debug, warn};
use nalgebra::Matrix4;

use crate::system::{CoordinateSystem, EdgeTransform};
use crate::transform::{InverseTransform, Transform};
use crate::State;
use framenet_core::{Affine, Error, Euclidean, Result, UnitQuaternion, Vec3};

/// Named coordinate systems joined by transforms.
///
/// Owns every node and every edge transform. A two-way edge stores its
/// transform once; the reverse direction walks it through
/// [`InverseTransform`](crate::InverseTransform).
#[derive(Debug, Default)]
pub struct CoordinateNetwork {
    systems: Vec<CoordinateSystem>,
    ids: HashMap<String, usize>,
    transforms: Vec<Box<dyn Transform>>,
}

impl CoordinateNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join `first` to `second` with `transform`, walkable both ways.
    ///
    /// Unknown names create new systems. Connecting the same pair again, in
    /// either order, replaces the transform of the existing edge.
    pub fn connect_systems(
        &mut self,
        first: &str,
        transform: impl Transform + 'static,
        second: &str,
    ) -> &mut Self {
        self.connect_systems_with(first, transform, second, false)
    }

    /// Like [`connect_systems`](Self::connect_systems); a `one_way` edge can
    /// only be walked from `first` to `second`.
    ///
    /// A one-way re-declaration keeps the reverse edge of an earlier two-way
    /// one, which then walks the new transform backwards.
    pub fn connect_systems_with(
        &mut self,
        first: &str,
        transform: impl Transform + 'static,
        second: &str,
        one_way: bool,
    ) -> &mut Self {
        let start = self.system_id_or_insert(first);
        let end = self.system_id_or_insert(second);
        if start == end {
            warn!("ignoring edge from '{first}' to itself");
            return self;
        }

        let existing = self.systems[start]
            .edge_to(end)
            .or_else(|| self.systems[end].edge_to(start))
            .map(|edge| edge.index());
        let index = match existing {
            Some(index) => {
                debug!("replacing transform {index} between '{first}' and '{second}'");
                self.transforms[index] = Box::new(transform);
                index
            }
            None => {
                self.transforms.push(Box::new(transform));
                self.transforms.len() - 1
            }
        };
        self.systems[start].attach_neighbor(end, EdgeTransform::forward(index));
        if !one_way {
            self.systems[end].attach_neighbor(start, EdgeTransform::inverse(index));
        }
        debug!(
            "attached transform {index}: '{first}' {} '{second}'",
            if one_way { "->" } else { "<->" }
        );
        self
    }

    fn system_id_or_insert(&mut self, name: &str) -> usize {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.systems.len();
        self.systems.push(CoordinateSystem::new(name, id));
        self.ids.insert(name.to_owned(), id);
        id
    }

    /// Discover the shortest path between every pair of systems.
    ///
    /// Run once after all edges are declared and before the first query.
    /// Running it again is harmless.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub fn compile(&mut self) -> &mut Self {
        let n = self.systems.len();
        for start in 0..n {
            for target in 0..n {
                CoordinateSystem::discover_downstream_for(&mut self.systems, start, target);
            }
        }
        debug!(
            "compiled network: {} systems, {} transforms",
            n,
            self.transforms.len()
        );
        self
    }

    /// Push dynamic data into every edge transform.
    ///
    /// A rejected value leaves its transform unchanged and does not stop the
    /// remaining transforms from updating. The first error is returned.
    pub fn update(&mut self, state: &State) -> Result<()> {
        let mut first_error = None;
        for (index, transform) in self.transforms.iter_mut().enumerate() {
            if let Err(err) = transform.update(state) {
                warn!("transform {index} rejected update: {err}");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    // ----------------
    // Introspection
    // ----------------

    /// System names in creation order.
    pub fn systems(&self) -> impl Iterator<Item = &str> + '_ {
        self.systems.iter().map(CoordinateSystem::name)
    }

    pub fn system(&self, name: &str) -> Option<&CoordinateSystem> {
        self.ids.get(name).map(|&id| &self.systems[id])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Systems visited from `start` to `end`, excluding `start`.
    pub fn path(&self, start: &str, end: &str) -> Result<Vec<&str>> {
        let (_, hops) = self.route(start, end)?;
        Ok(hops.iter().map(|&id| self.systems[id].name()).collect())
    }

    fn system_or_error(&self, name: &str) -> Result<usize> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownSystem(name.to_owned()))
    }

    fn path_not_found(start: &str, end: &str) -> Error {
        Error::PathNotFound {
            from: start.to_owned(),
            to: end.to_owned(),
        }
    }

    /// Resolve the cached hops from `start` to `end`.
    fn route(&self, start: &str, end: &str) -> Result<(usize, &[usize])> {
        let from = self.system_or_error(start)?;
        let to = self.system_or_error(end)?;
        let hops = self.systems[from]
            .downstream(to)
            .ok_or_else(|| Self::path_not_found(start, end))?;
        Ok((from, hops))
    }

    /// Call `visit(from, to, transform)` for every hop from `start` to `end`,
    /// with inverse edges already wrapped.
    fn walk<F>(&self, start: &str, end: &str, mut visit: F) -> Result<()>
    where
        F: FnMut(usize, usize, &dyn Transform) -> Result<()>,
    {
        let (mut current, hops) = self.route(start, end)?;
        for &next in hops {
            let edge = self.systems[current]
                .edge_to(next)
                .ok_or_else(|| Self::path_not_found(start, end))?;
            let transform = self.transforms[edge.index()].as_ref();
            if edge.is_inverse() {
                visit(current, next, &InverseTransform::new(transform))?;
            } else {
                visit(current, next, transform)?;
            }
            current = next;
        }
        Ok(())
    }

    // ----------------
    // Queries
    // ----------------

    /// Express the position `vec`, given in `start`, in `end`.
    pub fn transform_vec(&self, vec: &Vec3, start: &str, end: &str) -> Result<Vec3> {
        let mut out = *vec;
        self.transform_vec_ip(&mut out, start, end)?;
        Ok(out)
    }

    pub fn transform_vec_ip(&self, vec: &mut Vec3, start: &str, end: &str) -> Result<()> {
        self.walk(start, end, |_, _, t| {
            t.transform_vec_ip(vec);
            Ok(())
        })
    }

    /// Relabel the orientation `quat` from the axes of `start` to those of `end`.
    pub fn transform_quat(
        &self,
        quat: &UnitQuaternion,
        start: &str,
        end: &str,
    ) -> Result<UnitQuaternion> {
        let mut out = *quat;
        self.transform_quat_ip(&mut out, start, end)?;
        Ok(out)
    }

    pub fn transform_quat_ip(&self, quat: &mut UnitQuaternion, start: &str, end: &str) -> Result<()> {
        self.walk(start, end, |_, _, t| {
            t.transform_quat_ip(quat);
            Ok(())
        })
    }

    /// Re-reference the orientation `quat` from `start` to `end`.
    pub fn orient(&self, quat: &UnitQuaternion, start: &str, end: &str) -> Result<UnitQuaternion> {
        let mut out = *quat;
        self.orient_ip(&mut out, start, end)?;
        Ok(out)
    }

    pub fn orient_ip(&self, quat: &mut UnitQuaternion, start: &str, end: &str) -> Result<()> {
        self.walk(start, end, |_, _, t| {
            t.orient_ip(quat);
            Ok(())
        })
    }

    /// The single rigid motion equivalent to walking from `start` to `end`.
    ///
    /// Fails with [`Error::NonEuclideanTransform`] naming the first hop that
    /// cannot be expressed as a roto-translation.
    pub fn get_euclidean(&self, start: &str, end: &str) -> Result<Euclidean> {
        let mut euclidean = Euclidean::default();
        self.walk(start, end, |from, to, t| {
            let hop = t.euclidean().ok_or_else(|| Error::NonEuclideanTransform {
                from: self.systems[from].name().to_owned(),
                to: self.systems[to].name().to_owned(),
            })?;
            euclidean.set_as_before(&hop);
            Ok(())
        })?;
        Ok(euclidean)
    }

    /// `(A, b)` such that `A · v + b` maps `start` coordinates to `end`.
    pub fn get_affine(&self, start: &str, end: &str) -> Result<Affine> {
        self.get_euclidean(start, end).map(|e| e.affine())
    }

    /// 4×4 homogeneous form of [`get_affine`](Self::get_affine).
    pub fn get_homogeneous(&self, start: &str, end: &str) -> Result<Matrix4<f64>> {
        self.get_euclidean(start, end).map(|e| e.matrix())
    }
}

//! Metric field recomputation over the lattice
//!
//! Every node is visited for every object, so one pass costs
//! O(points × objects). Each object's single-body tensor is computed at its
//! own distance from the node and written over the previous one: the node
//! ends up holding the tensor of the last object in iteration order. This is
//! a deliberate simplification, not a superposition of curvature.

use common::constants::HORIZON_CLAMP;

use crate::error::{invalid, Result};
use crate::grid::SpacetimeGrid;
use crate::metric::MetricTensor;
use crate::object::MassiveObject;
use crate::point::SpacetimePoint;

/// Recomputes grid tensors from the current objects and constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSolver {
    pub g: f64,
    pub c: f64,
}

impl FieldSolver {
    pub fn new(g: f64, c: f64) -> Self {
        Self { g, c }
    }

    /// Reject objects whose clamped horizon radius would overflow with these
    /// constants. Nodes store r² with r ≥ 1.01·rs, so that square must be finite.
    pub fn check_objects(&self, objects: &[MassiveObject]) -> Result<()> {
        for object in objects {
            let floor = HORIZON_CLAMP * object.schwarzschild_radius(self.g, self.c);
            if !(floor * floor).is_finite() {
                return Err(invalid(format!(
                    "horizon radius of {} ({} kg) overflows with G = {}",
                    object.name,
                    object.mass(),
                    self.g
                )));
            }
        }
        Ok(())
    }

    /// Overwrite every tensor in `grid` from `objects`.
    ///
    /// The field is reset to flat first, so the result depends only on the
    /// arguments and an empty object list leaves every node Minkowski.
    pub fn recompute(&self, grid: &mut SpacetimeGrid, objects: &[MassiveObject]) {
        let (points, field) = grid.points_and_field_mut();
        field.reset();

        if objects.is_empty() {
            log::debug!("no objects; field left flat");
            return;
        }

        for (tensor, point) in field.tensors_mut().iter_mut().zip(points) {
            *tensor = self.tensor_at(point, objects);
        }

        log::debug!(
            "recomputed {} tensors from {} objects",
            points.len(),
            objects.len()
        );
    }

    /// Tensor a single node would receive: the last object's contribution
    pub fn tensor_at(&self, point: &SpacetimePoint, objects: &[MassiveObject]) -> MetricTensor {
        let mut tensor = MetricTensor::minkowski();
        for object in objects {
            let r = point.spatial_distance(&object.position);
            tensor = MetricTensor::schwarzschild(r, object.mass(), self.g, self.c);
        }
        tensor
    }
}

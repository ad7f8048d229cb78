//! Regular 3D lattice of spacetime points and its metric field

use glam::DVec3;

use crate::error::{invalid, require_positive, Result};
use crate::metric::MetricTensor;
use crate::point::{GridIndex, SpacetimePoint};

/// Evenly spaced lattice of points at t = 0, centred on the origin
#[derive(Debug, Clone)]
pub struct SpacetimeGrid {
    points: Vec<SpacetimePoint>,
    field: FieldMap,
    resolution: usize,
    size: f64,
    step: f64,
}

impl SpacetimeGrid {
    /// Build `resolution³` points with spacing `size / resolution`.
    ///
    /// Along each axis node `i` sits at `(i - resolution/2) * step`, using
    /// integer division for `resolution/2`. Every tensor starts flat.
    pub fn new(resolution: usize, size: f64) -> Result<Self> {
        if resolution == 0 {
            return Err(invalid("grid resolution must be positive"));
        }
        require_positive("grid size", size)?;
        let too_large = || invalid(format!("grid resolution {resolution} is too large"));
        // The field stores one tensor per point, the larger of the two buffers.
        let count = resolution
            .checked_pow(3)
            .filter(|&n| {
                n.checked_mul(std::mem::size_of::<MetricTensor>())
                    .is_some_and(|bytes| bytes <= isize::MAX as usize)
            })
            .ok_or_else(too_large)?;

        let step = size / resolution as f64;
        let half = (resolution / 2) as f64;
        let coord = |n: usize| (n as f64 - half) * step;

        let mut points = Vec::new();
        points.try_reserve_exact(count).map_err(|_| too_large())?;
        for i in 0..resolution {
            for j in 0..resolution {
                for k in 0..resolution {
                    points.push(SpacetimePoint::new(coord(i), coord(j), coord(k), 0.0));
                }
            }
        }

        log::debug!("built {count} grid points (resolution {resolution}, step {step})");

        Ok(Self {
            points,
            field: FieldMap::flat(resolution),
            resolution,
            size,
            step,
        })
    }

    pub fn points(&self) -> &[SpacetimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn field(&self) -> &FieldMap {
        &self.field
    }

    pub(crate) fn points_and_field_mut(&mut self) -> (&[SpacetimePoint], &mut FieldMap) {
        (&self.points, &mut self.field)
    }

    /// Flat storage offset of `index`, or `None` if it lies outside the lattice
    pub fn index_of(&self, index: GridIndex) -> Option<usize> {
        flat_offset(self.resolution, index)
    }

    pub fn grid_index(&self, offset: usize) -> Option<GridIndex> {
        if offset >= self.points.len() {
            return None;
        }
        let n = self.resolution;
        Some(GridIndex::new(offset / (n * n), (offset / n) % n, offset % n))
    }

    pub fn point(&self, index: GridIndex) -> Option<&SpacetimePoint> {
        self.index_of(index).map(|offset| &self.points[offset])
    }

    /// Nearest lattice node to an arbitrary position, clamped to the grid
    pub fn nearest_index(&self, position: DVec3) -> GridIndex {
        let half = (self.resolution / 2) as f64;
        let max = (self.resolution - 1) as f64;
        let axis = |c: f64| {
            let n = (c / self.step + half).round();
            if n.is_nan() {
                0
            } else {
                n.clamp(0.0, max) as usize
            }
        };
        GridIndex::new(axis(position.x), axis(position.y), axis(position.z))
    }

    /// Tensor at the node closest to `position`
    pub fn sample(&self, position: DVec3) -> &MetricTensor {
        let offset = flat_offset(self.resolution, self.nearest_index(position))
            .unwrap_or_default();
        &self.field.tensors[offset]
    }

    /// Nodes paired with their current tensors, in storage order
    pub fn iter(&self) -> impl Iterator<Item = (GridIndex, &SpacetimePoint, &MetricTensor)> + '_ {
        self.field
            .iter()
            .zip(&self.points)
            .map(|((index, tensor), point)| (index, point, tensor))
    }
}

/// Metric tensors keyed by lattice index
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMap {
    resolution: usize,
    tensors: Vec<MetricTensor>,
}

impl FieldMap {
    fn flat(resolution: usize) -> Self {
        Self {
            resolution,
            tensors: vec![MetricTensor::minkowski(); resolution.pow(3)],
        }
    }

    pub fn get(&self, index: GridIndex) -> Option<&MetricTensor> {
        flat_offset(self.resolution, index).map(|offset| &self.tensors[offset])
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    pub fn tensors(&self) -> &[MetricTensor] {
        &self.tensors
    }

    pub(crate) fn tensors_mut(&mut self) -> &mut [MetricTensor] {
        &mut self.tensors
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridIndex, &MetricTensor)> + '_ {
        let n = self.resolution;
        self.tensors
            .iter()
            .enumerate()
            .map(move |(offset, t)| (GridIndex::new(offset / (n * n), (offset / n) % n, offset % n), t))
    }

    pub(crate) fn reset(&mut self) {
        self.tensors.fill(MetricTensor::minkowski());
    }
}

fn flat_offset(resolution: usize, index: GridIndex) -> Option<usize> {
    let n = resolution;
    if index.i < n && index.j < n && index.k < n {
        Some((index.i * n + index.j) * n + index.k)
    } else {
        None
    }
}

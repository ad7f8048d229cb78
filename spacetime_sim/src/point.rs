//! Spacetime coordinates and lattice indices

use std::hash::{Hash, Hasher};

use glam::DVec3;

/// An event in spacetime: three spatial coordinates (m) and a time coordinate (s).
///
/// Points are plain values. Equality and hashing go through the coordinate
/// bits, with `-0.0` folded onto `0.0`, so two points built from the same
/// numbers are interchangeable as map keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacetimePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
}

impl SpacetimePoint {
    pub const ORIGIN: SpacetimePoint = SpacetimePoint {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        t: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
        Self { x, y, z, t }
    }

    /// Point at `position` with time coordinate `t`
    pub fn from_position(position: DVec3, t: f64) -> Self {
        Self::new(position.x, position.y, position.z, t)
    }

    /// Spatial part of the point
    pub fn position(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance between the spatial parts of two points
    pub fn spatial_distance(&self, other: &SpacetimePoint) -> f64 {
        self.position().distance(other.position())
    }

    pub fn distance_to(&self, position: DVec3) -> f64 {
        self.position().distance(position)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.t.is_finite()
    }

    fn key_bits(&self) -> [u64; 4] {
        [self.x, self.y, self.z, self.t].map(|c| (c + 0.0).to_bits())
    }
}

impl PartialEq for SpacetimePoint {
    fn eq(&self, other: &Self) -> bool {
        self.key_bits() == other.key_bits()
    }
}

impl Eq for SpacetimePoint {}

impl Hash for SpacetimePoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_bits().hash(state);
    }
}

/// Integer position of a node in the spacetime lattice.
///
/// The field mapping is keyed by these indices, never by floating-point
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridIndex {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl GridIndex {
    pub fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn equal_coordinates_share_a_map_slot() {
        let mut seen = HashMap::new();
        seen.insert(SpacetimePoint::new(1.0, 2.0, 3.0, 0.0), "first");
        seen.insert(SpacetimePoint::new(1.0, 2.0, 3.0, 0.0), "second");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[&SpacetimePoint::new(1.0, 2.0, 3.0, 0.0)], "second");
    }

    #[test]
    fn negative_zero_equals_zero() {
        let a = SpacetimePoint::new(-0.0, 0.0, -0.0, 0.0);
        assert_eq!(a, SpacetimePoint::ORIGIN);
    }

    #[test]
    fn time_coordinate_takes_part_in_equality() {
        let a = SpacetimePoint::new(1.0, 0.0, 0.0, 0.0);
        let b = SpacetimePoint::new(1.0, 0.0, 0.0, 1.0);
        assert_ne!(a, b);
        assert_eq!(a.spatial_distance(&b), 0.0);
    }

    #[test]
    fn spatial_distance_ignores_time() {
        let a = SpacetimePoint::new(0.0, 3.0, 4.0, 10.0);
        assert_eq!(a.distance_to(DVec3::ZERO), 5.0);
    }
}

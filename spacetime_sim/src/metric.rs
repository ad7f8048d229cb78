//! Weak-field metric tensor
//!
//! Each lattice node carries a diagonal approximation of the Schwarzschild
//! metric in the equatorial plane (θ = π/2, so sin²θ = 1):
//!
//! ```text
//! g00 = -(1 - rs/r)   g11 = 1/(1 - rs/r)   g22 = r²   g33 = r²
//! ```
//!
//! Off-diagonal terms are always zero, so frame dragging and the full tensor
//! structure are not represented.

use common::constants::HORIZON_CLAMP;
use nalgebra::{Matrix4, Vector4};

/// A 4×4 metric tensor g_{μν}, indexed (t, x, y, z)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricTensor {
    components: Matrix4<f64>,
}

impl MetricTensor {
    /// Flat spacetime, diag(-1, 1, 1, 1)
    pub fn minkowski() -> Self {
        Self::from_diagonal([-1.0, 1.0, 1.0, 1.0])
    }

    pub fn from_diagonal(diagonal: [f64; 4]) -> Self {
        Self {
            components: Matrix4::from_diagonal(&Vector4::from(diagonal)),
        }
    }

    /// Single-body Schwarzschild approximation at radial distance `r` from a
    /// mass `mass`, with gravitational constant `g` and speed of light `c`.
    ///
    /// `r` is raised to 1.01·rs when it falls below that, so the result is
    /// finite whenever (1.01·rs)² is. [`FieldSolver::check_objects`] rejects
    /// objects for which it is not.
    ///
    /// [`FieldSolver::check_objects`]: crate::FieldSolver::check_objects
    pub fn schwarzschild(r: f64, mass: f64, g: f64, c: f64) -> Self {
        let rs = 2.0 * g * mass / (c * c);
        let r = effective_radius(r, rs);

        // rs = 0 happens when G has been replaced by zero
        let factor = if rs > 0.0 { 1.0 - rs / r } else { 1.0 };

        Self::from_diagonal([-factor, 1.0 / factor, r * r, r * r])
    }

    /// Component g_{μν}. Panics if an index is outside 0..4.
    pub fn get(&self, mu: usize, nu: usize) -> f64 {
        self.components[(mu, nu)]
    }

    pub fn diagonal(&self) -> [f64; 4] {
        [
            self.components[(0, 0)],
            self.components[(1, 1)],
            self.components[(2, 2)],
            self.components[(3, 3)],
        ]
    }

    pub fn as_matrix(&self) -> &Matrix4<f64> {
        &self.components
    }

    pub fn is_minkowski(&self) -> bool {
        *self == Self::minkowski()
    }

    /// Rate of a static clock relative to one at infinity, √(-g00)
    pub fn time_dilation(&self) -> f64 {
        (-self.components[(0, 0)]).max(0.0).sqrt()
    }

    /// Squared line element ds² = g_{μν} dx^μ dx^ν for a coordinate displacement
    pub fn interval(&self, dx: Vector4<f64>) -> f64 {
        dx.dot(&(self.components * dx))
    }
}

impl Default for MetricTensor {
    fn default() -> Self {
        Self::minkowski()
    }
}

/// Radius actually used for a requested `r` around a body with Schwarzschild
/// radius `rs`: never less than 1.01·rs.
pub fn effective_radius(r: f64, rs: f64) -> f64 {
    let floor = HORIZON_CLAMP * rs;
    if r >= floor {
        r
    } else {
        log::trace!("clamping radius {r} to {floor} (rs = {rs})");
        floor
    }
}

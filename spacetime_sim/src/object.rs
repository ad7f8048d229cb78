//! Massive point objects that source the gravitational field

use glam::DVec3;

use crate::error::{invalid, require_positive, Result};
use crate::point::SpacetimePoint;

/// A point mass with a label, position and velocity
#[derive(Debug, Clone, PartialEq)]
pub struct MassiveObject {
    pub name: String,
    mass: f64,
    pub position: SpacetimePoint,
    pub velocity: DVec3,
}

impl MassiveObject {
    /// Create an object at rest. Fails if `mass` is not a positive finite number.
    pub fn new(name: &str, mass: f64, position: SpacetimePoint) -> Result<Self> {
        require_positive("mass", mass)?;
        if !position.is_finite() {
            return Err(invalid(format!("position of {name} must be finite")));
        }

        Ok(Self {
            name: name.to_string(),
            mass,
            position,
            velocity: DVec3::ZERO,
        })
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_time(mut self, t: f64) -> Self {
        self.position.t = t;
        self
    }

    /// Mass in kg, always > 0
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// rs = 2GM/c²
    pub fn schwarzschild_radius(&self, g: f64, c: f64) -> f64 {
        2.0 * g * self.mass / (c * c)
    }

    pub fn momentum(&self) -> DVec3 {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}

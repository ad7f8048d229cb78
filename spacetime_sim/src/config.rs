//! Simulation configuration

use common::constants::{C, G};

use crate::error::{invalid, require_positive, Result};
use crate::geodesic::IntegrationMethod;

/// Options recognised by [`SpacetimeSimulation`](crate::SpacetimeSimulation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub grid_resolution: usize,
    pub grid_size: f64,
    pub gravitational_constant: f64,
    pub speed_of_light: f64,
    pub integration_method: IntegrationMethod,
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self {
            grid_resolution: 10,
            grid_size: 20.0,
            gravitational_constant: G,
            speed_of_light: C,
            integration_method: IntegrationMethod::Euler,
        }
    }

    pub fn with_grid(mut self, resolution: usize, size: f64) -> Self {
        self.grid_resolution = resolution;
        self.grid_size = size;
        self
    }

    pub fn with_gravitational_constant(mut self, g: f64) -> Self {
        self.gravitational_constant = g;
        self
    }

    pub fn with_integration_method(mut self, method: IntegrationMethod) -> Self {
        self.integration_method = method;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_resolution == 0 {
            return Err(invalid("grid resolution must be positive"));
        }
        require_positive("grid size", self.grid_size)?;
        validate_gravitational_constant(self.gravitational_constant)?;
        require_positive("speed of light", self.speed_of_light)?;
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// G may be zero but never negative or non-finite
pub(crate) fn validate_gravitational_constant(g: f64) -> Result<f64> {
    if g.is_finite() && g >= 0.0 {
        Ok(g)
    } else {
        Err(invalid(format!(
            "gravitational constant must be a non-negative finite number, got {g}"
        )))
    }
}

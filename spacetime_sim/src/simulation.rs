//! Simulation session: objects, grid, constants and the tick loop
//!
//! The session owns all mutable state. Every mutation goes through `&mut self`
//! and ends with a full field recompute, so the field never lags behind the
//! objects or G.

use glam::DVec3;

use crate::config::{validate_gravitational_constant, SimulationConfig};
use crate::error::{invalid, require_positive, Result};
use crate::field::FieldSolver;
use crate::geodesic::{gravitational_acceleration, GeodesicIntegrator, IntegrationMethod, ParticleState};
use crate::gravity::{GravityUpdate, UpdateStatus};
use crate::grid::{FieldMap, SpacetimeGrid};
use crate::object::MassiveObject;
use crate::point::SpacetimePoint;

pub struct SpacetimeSimulation {
    grid: SpacetimeGrid,
    objects: Vec<MassiveObject>,
    g: f64,
    c: f64,
    integrator: GeodesicIntegrator,
    elapsed_time: f64,
}

impl SpacetimeSimulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let grid = SpacetimeGrid::new(config.grid_resolution, config.grid_size)?;

        Ok(Self {
            grid,
            objects: Vec::new(),
            g: config.gravitational_constant,
            c: config.speed_of_light,
            integrator: GeodesicIntegrator::new(config.integration_method),
            elapsed_time: 0.0,
        })
    }

    /// Replace the grid with a new lattice and recompute its field
    pub fn initialize_grid(&mut self, resolution: usize, size: f64) -> Result<()> {
        self.grid = SpacetimeGrid::new(resolution, size)?;
        self.recompute_field();
        Ok(())
    }

    /// Add an object and bring the field up to date
    pub fn add_object(&mut self, object: MassiveObject) -> Result<()> {
        if !object.velocity.is_finite() {
            return Err(invalid(format!("velocity of {} must be finite", object.name)));
        }
        FieldSolver::new(self.g, self.c).check_objects(std::slice::from_ref(&object))?;
        log::debug!("adding {} ({} kg)", object.name, object.mass());
        self.objects.push(object);
        self.recompute_field();
        Ok(())
    }

    pub fn recompute_field(&mut self) {
        FieldSolver::new(self.g, self.c).recompute(&mut self.grid, &self.objects);
    }

    /// Advance every object by `dt` seconds under the others' attraction,
    /// then recompute the field.
    pub fn step(&mut self, dt: f64) -> Result<()> {
        require_positive("time step", dt)?;

        let accelerations: Vec<DVec3> = self
            .objects
            .iter()
            .map(|object| gravitational_acceleration(object.position.position(), &self.objects, self.g))
            .collect();

        for (object, accel) in self.objects.iter_mut().zip(accelerations) {
            object.velocity += accel * dt;
            let position = object.position.position() + object.velocity * dt;
            object.position = SpacetimePoint::from_position(position, object.position.t + dt);
        }

        self.elapsed_time += dt;
        self.recompute_field();
        Ok(())
    }

    /// Path of a test particle through the current objects
    pub fn integrate_geodesic(
        &self,
        start: SpacetimePoint,
        initial_velocity: DVec3,
        proper_time_span: f64,
        step_count: usize,
    ) -> Result<Vec<SpacetimePoint>> {
        self.integrator.integrate(
            start,
            initial_velocity,
            proper_time_span,
            step_count,
            &self.objects,
            self.g,
        )
    }

    pub fn integrate_geodesic_states(
        &self,
        start: SpacetimePoint,
        initial_velocity: DVec3,
        proper_time_span: f64,
        step_count: usize,
    ) -> Result<Vec<ParticleState>> {
        self.integrator.integrate_states(
            start,
            initial_velocity,
            proper_time_span,
            step_count,
            &self.objects,
            self.g,
        )
    }

    /// Replace G. The field is recomputed with the new value; paths and
    /// snapshots returned earlier are left as they were.
    ///
    /// A value that would give any current object an infinite horizon is
    /// rejected and the previous G kept.
    pub fn set_gravitational_constant(&mut self, value: f64) -> Result<()> {
        validate_gravitational_constant(value)?;
        FieldSolver::new(value, self.c).check_objects(&self.objects)?;
        log::info!("gravitational constant {} -> {}", self.g, value);
        self.g = value;
        self.recompute_field();
        Ok(())
    }

    /// Apply a finished background provider call, if any.
    ///
    /// Failures are logged and leave G unchanged. An outcome is applied only
    /// on the first call that sees it finished.
    pub fn apply_gravity_update(&mut self, update: &mut GravityUpdate) -> UpdateStatus {
        let status = update.poll();
        if status == UpdateStatus::Pending || !update.mark_applied() {
            return status;
        }

        match &status {
            UpdateStatus::Ready(g) => {
                if let Err(err) = self.set_gravitational_constant(*g) {
                    log::warn!("ignoring provider value: {err}");
                }
            }
            UpdateStatus::Failed(err) => {
                log::warn!("gravity provider failed, keeping G = {}: {err}", self.g);
            }
            UpdateStatus::Pending => {}
        }
        status
    }

    pub fn set_integration_method(&mut self, method: IntegrationMethod) {
        self.integrator.method = method;
    }

    pub fn integration_method(&self) -> IntegrationMethod {
        self.integrator.method
    }

    pub fn grid(&self) -> &SpacetimeGrid {
        &self.grid
    }

    pub fn grid_points(&self) -> &[SpacetimePoint] {
        self.grid.points()
    }

    pub fn field(&self) -> &FieldMap {
        self.grid.field()
    }

    /// Owned copy of the current field
    pub fn field_snapshot(&self) -> FieldMap {
        self.grid.field().clone()
    }

    pub fn objects(&self) -> &[MassiveObject] {
        &self.objects
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.g
    }

    pub fn speed_of_light(&self) -> f64 {
        self.c
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    pub fn center_of_mass(&self) -> DVec3 {
        let mut total_mass = 0.0;
        let mut com = DVec3::ZERO;

        for object in &self.objects {
            com += object.position.position() * object.mass();
            total_mass += object.mass();
        }

        if total_mass > 0.0 {
            com / total_mass
        } else {
            DVec3::ZERO
        }
    }

    /// Kinetic plus pairwise Newtonian potential energy. Coincident pairs
    /// are left out of the potential, matching the force rule.
    pub fn total_energy(&self) -> f64 {
        let mut kinetic = 0.0;
        let mut potential = 0.0;

        for (i, a) in self.objects.iter().enumerate() {
            kinetic += a.kinetic_energy();

            for b in self.objects.iter().skip(i + 1) {
                let r = a.position.spatial_distance(&b.position);
                if r > 0.0 {
                    potential -= self.g * a.mass() * b.mass() / r;
                }
            }
        }

        kinetic + potential
    }
}

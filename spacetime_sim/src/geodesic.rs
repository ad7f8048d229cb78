//! Test-particle trajectories through the gravitational field
//!
//! Paths are integrated with Newtonian point-mass gravity, not the geodesic
//! equation of the curved metric. The default scheme is fixed-step forward
//! Euler (velocity first, then position with the new velocity), whose error
//! grows linearly with the step size. RK4 is offered as a more accurate
//! alternative and does not reproduce Euler's output.

use glam::DVec3;

use crate::error::{invalid, require_positive, Result};
use crate::object::MassiveObject;
use crate::point::SpacetimePoint;

/// Time-stepping scheme used by [`GeodesicIntegrator`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntegrationMethod {
    #[default]
    Euler,
    Rk4,
}

/// Particle position and velocity after a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState {
    pub point: SpacetimePoint,
    pub velocity: DVec3,
}

/// Newtonian acceleration at `position` from every object, summed.
///
/// An object sitting exactly on `position` contributes nothing.
pub fn gravitational_acceleration(position: DVec3, objects: &[MassiveObject], g: f64) -> DVec3 {
    objects.iter().fold(DVec3::ZERO, |acc, object| {
        let r_vec = object.position.position() - position;
        let r = r_vec.length();
        if r > 0.0 {
            acc + r_vec / r * (g * object.mass() / (r * r))
        } else {
            acc
        }
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeodesicIntegrator {
    pub method: IntegrationMethod,
}

impl GeodesicIntegrator {
    pub fn new(method: IntegrationMethod) -> Self {
        Self { method }
    }

    /// Integrate a path of `step_count + 1` points starting at `start`.
    ///
    /// `step_count == 0` yields just `[start]`. The returned vector is owned
    /// by the caller and unaffected by later calls.
    pub fn integrate(
        &self,
        start: SpacetimePoint,
        initial_velocity: DVec3,
        proper_time_span: f64,
        step_count: usize,
        objects: &[MassiveObject],
        g: f64,
    ) -> Result<Vec<SpacetimePoint>> {
        let states =
            self.integrate_states(start, initial_velocity, proper_time_span, step_count, objects, g)?;
        Ok(states.into_iter().map(|s| s.point).collect())
    }

    /// Same as [`integrate`](Self::integrate) but keeps the velocity at every step
    pub fn integrate_states(
        &self,
        start: SpacetimePoint,
        initial_velocity: DVec3,
        proper_time_span: f64,
        step_count: usize,
        objects: &[MassiveObject],
        g: f64,
    ) -> Result<Vec<ParticleState>> {
        require_positive("proper time span", proper_time_span)?;
        if !start.is_finite() || !initial_velocity.is_finite() {
            return Err(invalid("start point and initial velocity must be finite"));
        }
        if !(g.is_finite() && g >= 0.0) {
            return Err(invalid(format!("gravitational constant must be non-negative, got {g}")));
        }

        let mut state = ParticleState {
            point: start,
            velocity: initial_velocity,
        };
        let mut path = Vec::with_capacity(step_count + 1);
        path.push(state);

        if step_count == 0 {
            return Ok(path);
        }

        let dt = proper_time_span / step_count as f64;
        for _ in 0..step_count {
            state = match self.method {
                IntegrationMethod::Euler => euler_step(state, objects, g, dt),
                IntegrationMethod::Rk4 => rk4_step(state, objects, g, dt),
            };
            path.push(state);
        }

        log::trace!("integrated {step_count} steps with {:?}, dt = {dt}", self.method);
        Ok(path)
    }
}

fn euler_step(state: ParticleState, objects: &[MassiveObject], g: f64, dt: f64) -> ParticleState {
    let accel = gravitational_acceleration(state.point.position(), objects, g);
    let velocity = state.velocity + accel * dt;
    let position = state.point.position() + velocity * dt;

    ParticleState {
        point: SpacetimePoint::from_position(position, state.point.t + dt),
        velocity,
    }
}

fn rk4_step(state: ParticleState, objects: &[MassiveObject], g: f64, dt: f64) -> ParticleState {
    let pos = state.point.position();
    let vel = state.velocity;
    let accel = |p: DVec3| gravitational_acceleration(p, objects, g);

    let k1_v = accel(pos);
    let k1_x = vel;

    let k2_v = accel(pos + k1_x * dt * 0.5);
    let k2_x = vel + k1_v * dt * 0.5;

    let k3_v = accel(pos + k2_x * dt * 0.5);
    let k3_x = vel + k2_v * dt * 0.5;

    let k4_v = accel(pos + k3_x * dt);
    let k4_x = vel + k3_v * dt;

    let new_pos = pos + (k1_x + k2_x * 2.0 + k3_x * 2.0 + k4_x) * dt / 6.0;
    let new_vel = vel + (k1_v + k2_v * 2.0 + k3_v * 2.0 + k4_v) * dt / 6.0;

    ParticleState {
        point: SpacetimePoint::from_position(new_pos, state.point.t + dt),
        velocity: new_vel,
    }
}

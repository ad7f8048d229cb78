//! Headless spacetime simulation
//!
//! Runs a short simulation around an Earth-mass object:
//! - Builds the default 10³ lattice over 20 m
//! - Ticks the object set and keeps the metric field current
//! - Launches test particles and integrates their paths
//! - Swaps in an effective G from a background provider when it arrives
//!
//! Set `RUST_LOG=debug` to follow each recompute pass.

use std::time::Duration;

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use spacetime_sim::scenario::EARTH_MASS;
use spacetime_sim::{
    EntanglementCoupling, EntanglementGravity, GravityUpdate, MassiveObject, Result,
    SimulationConfig, SpacetimePoint, SpacetimeSimulation, UpdateStatus,
};

const TICKS: usize = 10;
const TICK_DT: f64 = 1.0;
const PARTICLES: usize = 4;
const PARTICLE_SPAN: f64 = 10.0;
const PARTICLE_STEPS: usize = 100;

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        log::error!("simulation failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = SimulationConfig::default();
    let mut sim = SpacetimeSimulation::new(config)?;
    sim.add_object(MassiveObject::new("Earth", EARTH_MASS, SpacetimePoint::ORIGIN)?)?;

    let mut density_rng = StdRng::from_entropy();
    let provider = EntanglementGravity::new(EntanglementCoupling::default(), move || {
        Ok(density_rng.gen_range(0.0..=1.0))
    });
    let mut update = Some(GravityUpdate::spawn(provider, Duration::from_secs(1)));

    let mut rng = rand::thread_rng();

    for tick in 0..TICKS {
        sim.step(TICK_DT)?;

        if let Some(pending) = update.as_mut() {
            if sim.apply_gravity_update(pending) != UpdateStatus::Pending {
                update = None;
            }
        }

        let centre = sim.grid().sample(DVec3::ZERO);
        log::info!(
            "tick {tick}: t = {:.1} s, G = {:e}, clock rate at centre = {:.6}",
            sim.elapsed_time(),
            sim.gravitational_constant(),
            centre.time_dilation()
        );
    }

    for n in 0..PARTICLES {
        let angle = rng.gen::<f64>() * std::f64::consts::TAU;
        let start = SpacetimePoint::new(1000.0 * angle.cos(), 0.0, 1000.0 * angle.sin(), 0.0);
        let velocity = DVec3::new(-angle.sin(), 0.0, angle.cos()) * rng.gen_range(0.0..20_000.0);

        let path = sim.integrate_geodesic(start, velocity, PARTICLE_SPAN, PARTICLE_STEPS)?;
        if let Some(end) = path.last() {
            log::info!(
                "particle {n}: {} points, ends at ({:.1}, {:.1}, {:.1}) after {:.1} s",
                path.len(),
                end.x,
                end.y,
                end.z,
                end.t
            );
        }
    }

    log::info!(
        "finished: {} objects, total energy {:e} J",
        sim.objects().len(),
        sim.total_energy()
    );
    Ok(())
}

//! End-to-end behaviour of the simulation session

use std::time::Duration;

use glam::DVec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use spacetime_sim::scenario::{self, EARTH_MASS};
use spacetime_sim::{
    EntanglementCoupling, EntanglementGravity, FixedGravity, GravityError, GravityUpdate,
    IntegrationMethod, MassiveObject, MetricTensor, SimulationConfig, SimulationError,
    SpacetimePoint, SpacetimeSimulation, UpdateStatus,
};

const G: f64 = 6.67430e-11;

fn simulation() -> SpacetimeSimulation {
    SpacetimeSimulation::new(SimulationConfig::default()).unwrap()
}

fn object_at(name: &str, mass: f64, position: DVec3) -> MassiveObject {
    MassiveObject::new(name, mass, SpacetimePoint::from_position(position, 0.0)).unwrap()
}

fn wait_for(update: &mut GravityUpdate, sim: &mut SpacetimeSimulation) -> UpdateStatus {
    loop {
        match sim.apply_gravity_update(update) {
            UpdateStatus::Pending => std::thread::sleep(Duration::from_millis(1)),
            done => return done,
        }
    }
}

#[test]
fn initialize_grid_builds_flat_cube() {
    let mut sim = simulation();
    sim.initialize_grid(6, 12.0).unwrap();
    assert_eq!(sim.grid_points().len(), 216);
    assert!(sim.field().tensors().iter().all(MetricTensor::is_minkowski));
}

#[test]
fn invalid_grid_is_an_invalid_configuration() {
    let mut sim = simulation();
    let err = sim.initialize_grid(5, 0.0).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidConfiguration(_)));
}

#[test]
fn recompute_without_objects_is_flat() {
    let mut sim = simulation();
    sim.recompute_field();
    assert!(sim.field().tensors().iter().all(MetricTensor::is_minkowski));
}

#[test]
fn zero_step_geodesic_is_just_the_start() {
    let mut sim = simulation();
    sim.add_object(object_at("earth", EARTH_MASS, DVec3::ZERO)).unwrap();
    let start = SpacetimePoint::new(1000.0, 0.0, 0.0, 0.0);
    let path = sim.integrate_geodesic(start, DVec3::ZERO, 10.0, 0).unwrap();
    assert_eq!(path, vec![start]);
}

#[test]
fn euler_first_step_velocity() {
    let mut sim = simulation();
    sim.add_object(object_at("earth", 5.972e24, DVec3::ZERO)).unwrap();

    let start = SpacetimePoint::new(1000.0, 0.0, 0.0, 0.0);
    let states = sim
        .integrate_geodesic_states(start, DVec3::ZERO, 10.0, 10)
        .unwrap();

    let dt = 10.0 / 10.0;
    let expected = -G * 5.972e24 / (1000.0f64 * 1000.0) * dt;
    let vx = states[1].velocity.x;
    assert!(((vx - expected) / expected).abs() < 1e-9, "vx = {vx}, expected {expected}");
    assert_eq!(states.len(), 11);
}

#[test]
fn symmetric_masses_cancel_along_the_axis() {
    let mut sim = simulation();
    sim.add_object(object_at("left", EARTH_MASS, DVec3::new(-500.0, 0.0, 0.0))).unwrap();
    sim.add_object(object_at("right", EARTH_MASS, DVec3::new(500.0, 0.0, 0.0))).unwrap();

    let states = sim
        .integrate_geodesic_states(SpacetimePoint::ORIGIN, DVec3::ZERO, 1.0, 1)
        .unwrap();
    let single = G * EARTH_MASS / (500.0 * 500.0);
    assert!(states[1].velocity.x.abs() <= single * 1e-12);
    assert_eq!(states[1].velocity.y, 0.0);
    assert_eq!(states[1].velocity.z, 0.0);
}

#[test]
fn replacing_g_leaves_earlier_results_untouched() {
    let mut sim = simulation();
    sim.add_object(object_at("earth", EARTH_MASS, DVec3::ZERO)).unwrap();

    let start = SpacetimePoint::new(1000.0, 0.0, 0.0, 0.0);
    let path_before = sim.integrate_geodesic(start, DVec3::ZERO, 10.0, 10).unwrap();
    let field_before = sim.field_snapshot();
    let kept_path = path_before.clone();
    let kept_field = field_before.clone();

    sim.set_gravitational_constant(2.0 * G).unwrap();

    let path_after = sim.integrate_geodesic(start, DVec3::ZERO, 10.0, 10).unwrap();
    assert_ne!(path_after, path_before);
    assert_ne!(sim.field(), &field_before);

    assert_eq!(path_before, kept_path);
    assert_eq!(field_before, kept_field);
}

#[test]
fn ticks_keep_the_field_in_step_with_objects() {
    let mut sim = SpacetimeSimulation::new(SimulationConfig::default().with_gravitational_constant(1.0))
        .unwrap();
    for object in scenario::binary_pair(1.0e3, 8.0, 1.0).unwrap() {
        sim.add_object(object).unwrap();
    }

    for _ in 0..5 {
        sim.step(0.01).unwrap();
    }

    let mut expected = sim.grid().clone();
    spacetime_sim::FieldSolver::new(1.0, sim.speed_of_light()).recompute(&mut expected, sim.objects());
    assert_eq!(sim.field(), expected.field());
}

#[test]
fn binary_energy_drifts_slowly() {
    let mut sim = SpacetimeSimulation::new(SimulationConfig::default().with_gravitational_constant(1.0))
        .unwrap();
    for object in scenario::binary_pair(1.0, 1.0, 1.0).unwrap() {
        sim.add_object(object).unwrap();
    }
    let start = sim.total_energy();
    for _ in 0..1000 {
        sim.step(1.0e-3).unwrap();
    }
    let drift = ((sim.total_energy() - start) / start).abs();
    assert!(drift < 1e-2, "relative energy drift {drift}");
}

#[test]
fn rk4_and_euler_agree_for_small_steps() {
    let mut sim = simulation();
    sim.add_object(object_at("earth", EARTH_MASS, DVec3::ZERO)).unwrap();
    let start = SpacetimePoint::new(1.0e7, 0.0, 0.0, 0.0);
    let velocity = DVec3::new(0.0, 0.0, 6000.0);

    let euler = sim.integrate_geodesic(start, velocity, 60.0, 600).unwrap();
    sim.set_integration_method(IntegrationMethod::Rk4);
    let rk4 = sim.integrate_geodesic(start, velocity, 60.0, 600).unwrap();

    // Euler position error is about a·dt·t/2, roughly 12 m over 360 km travelled.
    let (a, b) = (euler.last().unwrap(), rk4.last().unwrap());
    assert!(a.spatial_distance(b) < 25.0);
    assert_eq!(a.t, b.t);
}

#[test]
fn provider_value_replaces_g() {
    let mut sim = simulation();
    let coupling = EntanglementCoupling::new(G, 1.0e10);
    let expected = coupling.effective_g(0.5).unwrap();

    let mut update = GravityUpdate::spawn(EntanglementGravity::new(coupling, || Ok(0.5)), Duration::from_secs(5));
    assert_eq!(wait_for(&mut update, &mut sim), UpdateStatus::Ready(expected));
    assert_eq!(sim.gravitational_constant(), expected);
}

#[test]
fn provider_failure_keeps_previous_g() {
    let mut sim = simulation();
    sim.add_object(object_at("earth", EARTH_MASS, DVec3::ZERO)).unwrap();
    let field_before = sim.field_snapshot();

    let failing = EntanglementGravity::new(EntanglementCoupling::default(), || {
        Err(GravityError::Provider("no entanglement data".into()))
    });
    let mut update = GravityUpdate::spawn(failing, Duration::from_secs(5));
    let status = wait_for(&mut update, &mut sim);

    assert!(matches!(status, UpdateStatus::Failed(GravityError::Provider(_))));
    assert_eq!(sim.gravitational_constant(), G);
    assert_eq!(sim.field(), &field_before);

    let mut negative = GravityUpdate::spawn(FixedGravity(-3.0), Duration::from_secs(5));
    assert_eq!(
        wait_for(&mut negative, &mut sim),
        UpdateStatus::Failed(GravityError::InvalidValue(-3.0))
    );
    assert_eq!(sim.gravitational_constant(), G);
}

#[test]
fn random_cluster_field_never_goes_non_finite() {
    let mut sim = simulation();
    let mut rng = StdRng::seed_from_u64(42);
    for object in scenario::random_cluster(&mut rng, 16, 10.0, 1.0e26, 1.0e28).unwrap() {
        sim.add_object(object).unwrap();
    }
    sim.step(1.0e-6).unwrap();
    assert!(sim
        .field()
        .tensors()
        .iter()
        .all(|t| t.diagonal().iter().all(|v| v.is_finite())));
}

#[test]
fn finished_update_is_applied_once() {
    let mut sim = simulation();
    let mut update = GravityUpdate::spawn(FixedGravity(1.0e-10), Duration::from_secs(5));
    assert_eq!(wait_for(&mut update, &mut sim), UpdateStatus::Ready(1.0e-10));

    sim.set_gravitational_constant(G).unwrap();
    assert_eq!(sim.apply_gravity_update(&mut update), UpdateStatus::Ready(1.0e-10));
    assert_eq!(sim.gravitational_constant(), G);
}

#[test]
fn late_provider_result_keeps_previous_g() {
    let mut sim = simulation();
    sim.add_object(object_at("earth", EARTH_MASS, DVec3::ZERO)).unwrap();
    let field_before = sim.field_snapshot();

    let slow = EntanglementGravity::new(EntanglementCoupling::new(G, 1.0e10), || {
        std::thread::sleep(Duration::from_millis(50));
        Ok(0.5)
    });
    let deadline = Duration::from_millis(10);
    let mut update = GravityUpdate::spawn(slow, deadline);
    std::thread::sleep(Duration::from_millis(200));

    assert_eq!(
        sim.apply_gravity_update(&mut update),
        UpdateStatus::Failed(GravityError::Timeout(deadline))
    );
    assert_eq!(sim.gravitational_constant(), G);
    assert_eq!(sim.field(), &field_before);
}

#[test]
fn blocking_wait_reports_provider_failures_as_simulation_errors() {
    let update = GravityUpdate::spawn(FixedGravity(f64::NAN), Duration::from_secs(5));
    let err = update.wait().unwrap_err();
    assert!(matches!(
        err,
        SimulationError::ExternalComputationFailure(GravityError::InvalidValue(v)) if v.is_nan()
    ));

    let mut sim = simulation();
    let g = GravityUpdate::spawn(FixedGravity(2.0 * G), Duration::from_secs(5))
        .wait()
        .unwrap();
    sim.set_gravitational_constant(g).unwrap();
    assert_eq!(sim.gravitational_constant(), 2.0 * G);
}

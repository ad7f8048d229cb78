//! Spacetime curvature and geodesic simulation
//!
//! This crate is the numerical core behind a spacetime visualization:
//!
//! - **Metric field**: a lattice of points, each carrying a diagonal
//!   weak-field Schwarzschild metric computed from the massive objects
//! - **Geodesics**: test-particle paths integrated through the Newtonian
//!   field of the same objects
//! - **Effective gravity**: an optional external provider that replaces G
//!   without blocking the simulation
//!
//! All computation is synchronous and deterministic. The session type,
//! [`SpacetimeSimulation`], owns the objects and keeps the field in step
//! with them.

pub mod config;
pub mod error;
pub mod field;
pub mod geodesic;
pub mod gravity;
pub mod grid;
pub mod metric;
pub mod object;
pub mod point;
pub mod scenario;
pub mod simulation;

pub use config::SimulationConfig;
pub use error::{GravityError, Result, SimulationError};
pub use field::FieldSolver;
pub use geodesic::{GeodesicIntegrator, IntegrationMethod, ParticleState};
pub use gravity::{
    EffectiveGravityProvider, EntanglementCoupling, EntanglementGravity, FixedGravity,
    GravityUpdate, UpdateStatus,
};
pub use grid::{FieldMap, SpacetimeGrid};
pub use metric::MetricTensor;
pub use object::MassiveObject;
pub use point::{GridIndex, SpacetimePoint};
pub use simulation::SpacetimeSimulation;

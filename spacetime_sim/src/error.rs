//! Error types for the spacetime simulation

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced to callers of the simulation API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A parameter is out of its valid range (grid shape, mass, time span, G).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The effective gravity provider failed. The simulation keeps its
    /// previous G when this happens.
    #[error("external computation failed: {0}")]
    ExternalComputationFailure(#[from] GravityError),
}

/// Failures reported by an effective gravity provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GravityError {
    /// The provider's own computation failed.
    #[error("provider error: {0}")]
    Provider(String),

    /// Entanglement density was outside [0, 1] or not finite.
    #[error("entanglement density {0} is outside [0, 1]")]
    DensityOutOfRange(f64),

    /// The provider produced a value that cannot be used as G.
    #[error("provider returned unusable gravitational constant {0}")]
    InvalidValue(f64),

    /// No result arrived before the deadline.
    #[error("provider exceeded its {0:?} deadline")]
    Timeout(Duration),

    /// The provider thread ended without sending a result.
    #[error("provider thread disconnected")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, SimulationError>;

/// Build an `InvalidConfiguration` error.
pub(crate) fn invalid(msg: impl Into<String>) -> SimulationError {
    SimulationError::InvalidConfiguration(msg.into())
}

/// Require a finite value strictly greater than zero.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(invalid(format!("{name} must be a positive finite number, got {value}")))
    }
}

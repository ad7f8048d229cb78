//! Effective gravitational constant supplied from outside the core
//!
//! A provider may replace G with
//!
//! ```text
//! G_eff = G0 / (1 + 8π·G0·κ·ρ_ent)
//! ```
//!
//! where ρ_ent ∈ [0, 1] is an entanglement density produced elsewhere.
//! Providers run on their own thread so a slow computation never stalls a
//! simulation tick. Any failure or timeout leaves the current G in place.

use std::thread;
use std::time::{Duration, Instant};

use common::constants::{EIGHT_PI, G, KAPPA};
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};

use crate::error::{GravityError, Result};

pub type GravityResult = std::result::Result<f64, GravityError>;

/// Source of a replacement gravitational constant
pub trait EffectiveGravityProvider: Send {
    fn gravitational_constant(&mut self) -> GravityResult;
}

/// Coupling between entanglement density and G
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntanglementCoupling {
    pub g0: f64,
    pub kappa: f64,
}

impl EntanglementCoupling {
    pub fn new(g0: f64, kappa: f64) -> Self {
        Self { g0, kappa }
    }

    pub fn effective_g(&self, rho: f64) -> GravityResult {
        if !(0.0..=1.0).contains(&rho) {
            return Err(GravityError::DensityOutOfRange(rho));
        }
        Ok(self.g0 / (1.0 + EIGHT_PI * self.g0 * self.kappa * rho))
    }
}

impl Default for EntanglementCoupling {
    fn default() -> Self {
        Self::new(G, KAPPA)
    }
}

/// Provider that turns an external entanglement density into G
pub struct EntanglementGravity<F> {
    pub coupling: EntanglementCoupling,
    density: F,
}

impl<F> EntanglementGravity<F>
where
    F: FnMut() -> GravityResult + Send,
{
    pub fn new(coupling: EntanglementCoupling, density: F) -> Self {
        Self { coupling, density }
    }
}

impl<F> EffectiveGravityProvider for EntanglementGravity<F>
where
    F: FnMut() -> GravityResult + Send,
{
    fn gravitational_constant(&mut self) -> GravityResult {
        let rho = (self.density)()?;
        self.coupling.effective_g(rho)
    }
}

/// Provider that always returns the same value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedGravity(pub f64);

impl EffectiveGravityProvider for FixedGravity {
    fn gravitational_constant(&mut self) -> GravityResult {
        Ok(self.0)
    }
}

/// Progress of a background provider call
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateStatus {
    Pending,
    Ready(f64),
    Failed(GravityError),
}

/// A provider call running on a background thread
pub struct GravityUpdate {
    receiver: Receiver<(Instant, GravityResult)>,
    started: Instant,
    timeout: Duration,
    outcome: Option<UpdateStatus>,
    applied: bool,
}

impl GravityUpdate {
    /// Start `provider` on its own thread. A result stamped later than
    /// `timeout` after the start is reported as a timeout, even if it is
    /// collected afterwards.
    pub fn spawn<P>(mut provider: P, timeout: Duration) -> Self
    where
        P: EffectiveGravityProvider + 'static,
    {
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let started = Instant::now();
        let spawned = thread::Builder::new()
            .name("gravity-provider".to_string())
            .spawn(move || {
                let result = provider.gravitational_constant();
                // The receiver may already be gone if the update was dropped.
                let _ = sender.send((Instant::now(), result));
            });

        if let Err(err) = spawned {
            return Self::failed(GravityError::Provider(err.to_string()));
        }

        Self {
            receiver,
            started,
            timeout,
            outcome: None,
            applied: false,
        }
    }

    /// An update that has already failed, e.g. because its thread could not start
    pub fn failed(err: GravityError) -> Self {
        let (_, receiver) = crossbeam_channel::bounded(1);
        Self {
            receiver,
            started: Instant::now(),
            timeout: Duration::ZERO,
            outcome: Some(UpdateStatus::Failed(err)),
            applied: false,
        }
    }

    /// Check for a result without blocking. Once the update has finished,
    /// every later call returns the same outcome.
    pub fn poll(&mut self) -> UpdateStatus {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let status = match self.receiver.try_recv() {
            Ok((arrived, result)) => self.settle(arrived, result),
            Err(TryRecvError::Empty) if self.started.elapsed() >= self.timeout => {
                UpdateStatus::Failed(GravityError::Timeout(self.timeout))
            }
            Err(TryRecvError::Empty) => return UpdateStatus::Pending,
            Err(TryRecvError::Disconnected) => UpdateStatus::Failed(GravityError::Disconnected),
        };

        self.outcome = Some(status.clone());
        status
    }

    /// Block until the provider answers or the deadline passes
    pub fn wait(mut self) -> Result<f64> {
        if self.outcome.is_none() {
            let remaining = self.timeout.saturating_sub(self.started.elapsed());
            let status = match self.receiver.recv_timeout(remaining) {
                Ok((arrived, result)) => self.settle(arrived, result),
                Err(RecvTimeoutError::Timeout) => {
                    UpdateStatus::Failed(GravityError::Timeout(self.timeout))
                }
                Err(RecvTimeoutError::Disconnected) => {
                    UpdateStatus::Failed(GravityError::Disconnected)
                }
            };
            self.outcome = Some(status);
        }

        match self.outcome {
            Some(UpdateStatus::Ready(g)) => Ok(g),
            Some(UpdateStatus::Failed(err)) => Err(err.into()),
            _ => Err(GravityError::Disconnected.into()),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Record that the finished outcome has been acted on. Returns `false`
    /// if it already had been.
    pub(crate) fn mark_applied(&mut self) -> bool {
        !std::mem::replace(&mut self.applied, true)
    }

    fn settle(&self, arrived: Instant, result: GravityResult) -> UpdateStatus {
        if arrived.saturating_duration_since(self.started) > self.timeout {
            log::debug!("discarding provider result that missed its {:?} deadline", self.timeout);
            return UpdateStatus::Failed(GravityError::Timeout(self.timeout));
        }
        finish(result)
    }
}

fn finish(result: GravityResult) -> UpdateStatus {
    match result {
        Ok(g) if g.is_finite() && g >= 0.0 => UpdateStatus::Ready(g),
        Ok(g) => UpdateStatus::Failed(GravityError::InvalidValue(g)),
        Err(err) => UpdateStatus::Failed(err),
    }
}

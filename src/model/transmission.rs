use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// R0 used both at day 0 and, without interventions, for the whole run.
pub const UNMITIGATED_R0: f64 = 6.0;
/// Inflection day when at least one intervention is in place.
pub const INTERVENTION_DAY: f64 = 30.0;
/// Inflection day of the "do nothing" schedule.
pub const UNMITIGATED_INFLECTION_DAY: f64 = 70.0;
pub const DEFAULT_STEEPNESS: f64 = 1.0;

/// Logistic decay of the reproduction number from `r_start` to `r_end`,
/// centred on day `x0` with steepness `k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScheduleFields")]
pub struct ReproductionSchedule {
    pub r_start: f64,
    pub k: f64,
    pub x0: f64,
    r_end: f64,
}

impl ReproductionSchedule {
    /// Builds a schedule; a negative `r_end` is clamped to zero. NaN is kept
    /// so that `check` rejects it.
    pub fn new(r_start: f64, k: f64, x0: f64, r_end: f64) -> Self {
        let r_end = if r_end < 0.0 { 0.0 } else { r_end };
        Self { r_start, k, x0, r_end }
    }

    /// Schedule used when no intervention is selected.
    pub fn unmitigated() -> Self {
        Self::new(UNMITIGATED_R0, DEFAULT_STEEPNESS, UNMITIGATED_INFLECTION_DAY, UNMITIGATED_R0)
    }

    /// Starting point for policy resolution: interventions kick in around
    /// `INTERVENTION_DAY`, but nothing has been subtracted from `r_end` yet.
    pub fn intervention_baseline() -> Self {
        Self::new(UNMITIGATED_R0, DEFAULT_STEEPNESS, INTERVENTION_DAY, UNMITIGATED_R0)
    }

    pub fn r_end(&self) -> f64 {
        self.r_end
    }

    pub fn with_r_end(self, r_end: f64) -> Self {
        Self::new(self.r_start, self.k, self.x0, r_end)
    }

    pub fn check(&self) -> Result<()> {
        if !(self.r_start.is_finite() && self.r_start >= 0.0) {
            return Err(SimulationError::invalid("r_start", self.r_start, "a finite value >= 0"));
        }
        if !self.k.is_finite() {
            return Err(SimulationError::invalid("k", self.k, "a finite value"));
        }
        if !self.x0.is_finite() {
            return Err(SimulationError::invalid("x0", self.x0, "a finite value"));
        }
        if !self.r_end.is_finite() {
            return Err(SimulationError::invalid("r_end", self.r_end, "a finite value >= 0"));
        }
        Ok(())
    }

    /// `R(t) = (r_start - r_end) / (1 + exp(-k (x0 - t))) + r_end`
    pub fn reproduction_number(&self, t: f64) -> f64 {
        (self.r_start - self.r_end) / (1.0 + (-self.k * (self.x0 - t)).exp()) + self.r_end
    }

    /// Transmission coefficient beta(t) = R(t) * gamma, with gamma the recovery
    /// rate (1 / contagious period).
    pub fn transmission_rate(&self, t: f64, gamma: f64) -> f64 {
        self.reproduction_number(t) * gamma
    }
}

#[derive(Deserialize)]
struct ScheduleFields {
    r_start: f64,
    k: f64,
    x0: f64,
    r_end: f64,
}

impl From<ScheduleFields> for ReproductionSchedule {
    fn from(f: ScheduleFields) -> Self {
        Self::new(f.r_start, f.k, f.x0, f.r_end)
    }
}

impl Default for ReproductionSchedule {
    fn default() -> Self {
        Self::unmitigated()
    }
}

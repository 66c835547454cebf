use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_positive, Result, SimulationError};
use crate::math::ode::Tolerances;
use crate::model::policy::{resolve_schedule, PolicySet};
use crate::model::seird::{EpidemiologicalParameters, SeirdModel};
use crate::model::trajectory::Trajectory;
use crate::model::transmission::ReproductionSchedule;

/// Upper bound on output grid points; larger grids are rejected before any
/// buffer is allocated.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// `points` evenly spaced times from `start` to `end` inclusive, in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeGrid {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self { start: 0.0, end: 99.0, points: 100 }
    }
}

impl TimeGrid {
    pub fn check(&self) -> Result<()> {
        if self.points == 0 {
            return Err(SimulationError::invalid("grid.points", 0.0, "at least one point"));
        }
        if self.points > MAX_GRID_POINTS {
            return Err(SimulationError::invalid(
                "grid.points",
                self.points as f64,
                "at most 1000000 points",
            ));
        }
        if !self.start.is_finite() {
            return Err(SimulationError::invalid("grid.start", self.start, "a finite value"));
        }
        if !(self.end.is_finite() && self.end >= self.start) {
            return Err(SimulationError::invalid("grid.end", self.end, "a finite value >= grid.start"));
        }
        Ok(())
    }

    pub fn values(&self) -> Vec<f64> {
        if self.points == 1 {
            return vec![self.start];
        }
        let step = (self.end - self.start) / (self.points - 1) as f64;
        (0..self.points)
            .map(|i| if i + 1 == self.points { self.end } else { self.start + step * i as f64 })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: TimeGrid,
    pub tolerances: Tolerances,
}

impl SimulationConfig {
    pub fn check(&self) -> Result<()> {
        self.grid.check()?;
        ensure_positive("tolerances.rtol", self.tolerances.rtol)?;
        ensure_positive("tolerances.atol", self.tolerances.atol)?;
        ensure_positive("tolerances.min_step", self.tolerances.min_step)?;
        if self.tolerances.max_steps == 0 {
            return Err(SimulationError::invalid("tolerances.max_steps", 0.0, "at least one step"));
        }
        Ok(())
    }
}

/// Resolves the schedule for `policies` and integrates once over the default
/// 100-day grid.
pub fn run_simulation(params: &EpidemiologicalParameters, policies: &PolicySet) -> Result<Trajectory> {
    run_simulation_with(params, policies, &SimulationConfig::default())
}

pub fn run_simulation_with(
    params: &EpidemiologicalParameters,
    policies: &PolicySet,
    config: &SimulationConfig,
) -> Result<Trajectory> {
    let schedule = resolve_schedule(policies);
    debug!(
        policies = policies.len(),
        r_start = schedule.r_start,
        k = schedule.k,
        x0 = schedule.x0,
        r_end = schedule.r_end(),
        "resolved reproduction schedule"
    );
    run_schedule(params, schedule, config)
}

/// Integrates with an explicit schedule, bypassing policy resolution.
pub fn run_schedule(
    params: &EpidemiologicalParameters,
    schedule: ReproductionSchedule,
    config: &SimulationConfig,
) -> Result<Trajectory> {
    config.check()?;
    let model = SeirdModel::new(*params, schedule)?;
    let (traj, stats) = model.simulate(&config.grid.values(), &config.tolerances)?;
    debug!(
        points = traj.len(),
        accepted = stats.accepted,
        rejected = stats.rejected,
        evaluations = stats.evaluations,
        "integration complete"
    );
    Ok(traj)
}

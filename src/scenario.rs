use serde::Serialize;

use crate::error::Result;
use crate::model::policy::{resolve_schedule, Policy, PolicySet};
use crate::model::seird::EpidemiologicalParameters;
use crate::model::trajectory::Trajectory;
use crate::model::transmission::ReproductionSchedule;
use crate::simulation::{run_schedule, SimulationConfig};

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub policies: PolicySet,
}

impl Scenario {
    pub fn new(name: impl Into<String>, policies: PolicySet) -> Self {
        Self { name: name.into(), policies }
    }
}

/// The no-policy baseline, each policy on its own, then all of them together.
pub fn standard_scenarios() -> Vec<Scenario> {
    let mut out = vec![Scenario::new("no_policy", PolicySet::none())];
    for p in Policy::ALL {
        out.push(Scenario::new(p.key(), PolicySet::none().with(p)));
    }
    out.push(Scenario::new("all_policies", PolicySet::all()));
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub schedule: ReproductionSchedule,
    pub peak_infectious_day: f64,
    pub peak_infectious: f64,
    pub total_deaths: f64,
    pub total_recovered: f64,
}

impl ScenarioSummary {
    pub fn from_trajectory(name: &str, schedule: ReproductionSchedule, traj: &Trajectory) -> Self {
        let (peak_infectious_day, peak_infectious) = traj.peak_infectious().unwrap_or((0.0, 0.0));
        let last = traj.final_state().unwrap_or_default();
        Self {
            name: name.to_string(),
            schedule,
            peak_infectious_day,
            peak_infectious,
            total_deaths: last.d,
            total_recovered: last.r,
        }
    }
}

/// Runs every scenario against the same parameters. The first failure aborts
/// the comparison.
pub fn compare(
    params: &EpidemiologicalParameters,
    scenarios: &[Scenario],
    config: &SimulationConfig,
) -> Result<Vec<ScenarioSummary>> {
    scenarios
        .iter()
        .map(|sc| -> Result<ScenarioSummary> {
            let schedule = resolve_schedule(&sc.policies);
            let traj = run_schedule(params, schedule, config)?;
            Ok(ScenarioSummary::from_trajectory(&sc.name, schedule, &traj))
        })
        .collect()
}

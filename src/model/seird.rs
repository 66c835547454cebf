use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Result, SimulationError};
use crate::math::ode::{solve_on_grid, StepStats, Tolerances};
use crate::model::trajectory::Trajectory;
use crate::model::transmission::ReproductionSchedule;

/// Scalar inputs of a run. Periods are in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpidemiologicalParameters {
    pub population: f64,
    /// Fraction of infectious individuals who die, alpha.
    pub fatality_rate: f64,
    pub contagious_period: f64,
    pub incubation_period: f64,
    pub infection_to_death_period: f64,
}

impl Default for EpidemiologicalParameters {
    fn default() -> Self {
        Self {
            population: 1_000_000.0,
            fatality_rate: 0.3,
            contagious_period: 4.0,
            incubation_period: 5.0,
            infection_to_death_period: 9.0,
        }
    }
}

impl EpidemiologicalParameters {
    pub fn check(&self) -> Result<()> {
        ensure_positive("population", self.population)?;
        if !(0.0..=1.0).contains(&self.fatality_rate) {
            return Err(SimulationError::invalid("fatality_rate", self.fatality_rate, "a value in [0, 1]"));
        }
        ensure_positive("contagious_period", self.contagious_period)?;
        ensure_positive("incubation_period", self.incubation_period)?;
        ensure_positive("infection_to_death_period", self.infection_to_death_period)?;
        Ok(())
    }

    pub fn rates(&self) -> Result<Rates> {
        self.check()?;
        Ok(Rates {
            n: self.population,
            alpha: self.fatality_rate,
            gamma: 1.0 / self.contagious_period,
            delta: 1.0 / self.incubation_period,
            rho: 1.0 / self.infection_to_death_period,
        })
    }
}

/// Per-day rate constants derived from validated parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    pub n: f64,
    pub alpha: f64,
    /// Recovery rate, 1 / contagious period.
    pub gamma: f64,
    /// Progression E -> I, 1 / incubation period.
    pub delta: f64,
    /// Death rate, 1 / infection-to-death period.
    pub rho: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compartment {
    Susceptible,
    Exposed,
    Infectious,
    Recovered,
    Dead,
}

impl Compartment {
    pub const ALL: [Compartment; 5] = [
        Compartment::Susceptible,
        Compartment::Exposed,
        Compartment::Infectious,
        Compartment::Recovered,
        Compartment::Dead,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompartmentState {
    pub s: f64,
    pub e: f64,
    pub i: f64,
    pub r: f64,
    pub d: f64,
}

impl CompartmentState {
    /// Everyone susceptible except a single exposed individual (or the whole
    /// population if it is smaller than one).
    pub fn single_exposure(n: f64) -> Self {
        let e = n.min(1.0);
        Self { s: n - e, e, ..Self::default() }
    }

    pub fn from_slice(y: &[f64]) -> Self {
        Self { s: y[0], e: y[1], i: y[2], r: y[3], d: y[4] }
    }

    pub fn to_array(&self) -> [f64; 5] {
        [self.s, self.e, self.i, self.r, self.d]
    }

    pub fn get(&self, c: Compartment) -> f64 {
        self.to_array()[c.index()]
    }

    pub fn total(&self) -> f64 {
        self.s + self.e + self.i + self.r + self.d
    }
}

/// SEIRD system for one set of parameters and one reproduction schedule.
pub struct SeirdModel {
    pub params: EpidemiologicalParameters,
    pub rates: Rates,
    pub schedule: ReproductionSchedule,
}

impl SeirdModel {
    pub fn new(params: EpidemiologicalParameters, schedule: ReproductionSchedule) -> Result<Self> {
        let rates = params.rates()?;
        schedule.check()?;
        Ok(Self { params, rates, schedule })
    }

    pub fn initial_state(&self) -> CompartmentState {
        CompartmentState::single_exposure(self.rates.n)
    }

    /// Right-hand side over `y = [S, E, I, R, D]`.
    pub fn deriv(&self, t: f64, y: &[f64], dy: &mut [f64]) {
        let Rates { n, alpha, gamma, delta, rho } = self.rates;
        let (s, e, i) = (y[0], y[1], y[2]);

        let beta = self.schedule.transmission_rate(t, gamma);
        let infections = beta * s * i / n;
        let recoveries = (1.0 - alpha) * gamma * i;
        let deaths = alpha * rho * i;

        dy[0] = -infections;
        dy[1] = infections - delta * e;
        dy[2] = delta * e - recoveries - deaths;
        dy[3] = recoveries;
        dy[4] = deaths;
    }

    /// Integrates from `initial_state()` at `grid[0]` and samples every grid
    /// point. Either the full trajectory is returned or nothing.
    pub fn simulate(&self, grid: &[f64], tol: &Tolerances) -> Result<(Trajectory, StepStats)> {
        let y0 = self.initial_state().to_array();
        let (points, stats) = solve_on_grid(&y0, grid, tol, |t, y, dy| self.deriv(t, y, dy))?;

        let mut traj = Trajectory::with_capacity(points.len());
        for (t, y) in &points {
            traj.push(*t, CompartmentState::from_slice(y), self.schedule.reproduction_number(*t));
        }
        Ok((traj, stats))
    }
}

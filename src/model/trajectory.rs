use serde::{Deserialize, Serialize};

use crate::model::seird::{Compartment, CompartmentState};

/// Compartment counts and realized R(t) sampled on the output grid, stored
/// column-wise so each series can be handed to a plot as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub time: Vec<f64>,
    pub susceptible: Vec<f64>,
    pub exposed: Vec<f64>,
    pub infectious: Vec<f64>,
    pub recovered: Vec<f64>,
    pub dead: Vec<f64>,
    pub reproduction_number: Vec<f64>,
}

impl Trajectory {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            time: Vec::with_capacity(n),
            susceptible: Vec::with_capacity(n),
            exposed: Vec::with_capacity(n),
            infectious: Vec::with_capacity(n),
            recovered: Vec::with_capacity(n),
            dead: Vec::with_capacity(n),
            reproduction_number: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, t: f64, state: CompartmentState, r: f64) {
        self.time.push(t);
        self.susceptible.push(state.s);
        self.exposed.push(state.e);
        self.infectious.push(state.i);
        self.recovered.push(state.r);
        self.dead.push(state.d);
        self.reproduction_number.push(r);
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn series(&self, c: Compartment) -> &[f64] {
        match c {
            Compartment::Susceptible => &self.susceptible,
            Compartment::Exposed => &self.exposed,
            Compartment::Infectious => &self.infectious,
            Compartment::Recovered => &self.recovered,
            Compartment::Dead => &self.dead,
        }
    }

    pub fn state_at(&self, idx: usize) -> Option<CompartmentState> {
        if idx >= self.len() {
            return None;
        }
        Some(CompartmentState {
            s: self.susceptible[idx],
            e: self.exposed[idx],
            i: self.infectious[idx],
            r: self.recovered[idx],
            d: self.dead[idx],
        })
    }

    /// `(t, state)` pairs in time order.
    pub fn points(&self) -> impl Iterator<Item = (f64, CompartmentState)> + '_ {
        (0..self.len()).filter_map(move |idx| self.state_at(idx).map(|s| (self.time[idx], s)))
    }

    pub fn final_state(&self) -> Option<CompartmentState> {
        self.len().checked_sub(1).and_then(|idx| self.state_at(idx))
    }

    /// S+E+I+R+D at every grid point; stays at N while the integration holds.
    pub fn totals(&self) -> Vec<f64> {
        self.points().map(|(_, s)| s.total()).collect()
    }

    /// Day and size of the largest infectious count. The first maximum wins on ties.
    pub fn peak_infectious(&self) -> Option<(f64, f64)> {
        let mut best: Option<(f64, f64)> = None;
        for (t, i) in self.time.iter().zip(&self.infectious) {
            if best.map_or(true, |(_, v)| *i > v) {
                best = Some((*t, *i));
            }
        }
        best
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Dormand-Prince 5(4) tableau.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights; also the last stage row (FSAL).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Difference between the 5th- and 4th-order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OdeError {
    #[error("step budget of {max_steps} steps exhausted at t={t}")]
    StepBudgetExhausted { t: f64, max_steps: usize },

    #[error("step size {h:e} fell below the minimum at t={t}")]
    StepSizeUnderflow { t: f64, h: f64 },

    #[error("state or derivative became non-finite at t={t}")]
    NonFinite { t: f64 },
}

/// Error control and budget for the adaptive integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub rtol: f64,
    pub atol: f64,
    /// Accepted plus rejected steps allowed over the whole solve.
    pub max_steps: usize,
    pub min_step: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            rtol: 1e-8,
            atol: 1e-6,
            max_steps: 100_000,
            min_step: 1e-10,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepStats {
    pub accepted: usize,
    pub rejected: usize,
    pub evaluations: usize,
}

impl StepStats {
    pub fn attempted(&self) -> usize {
        self.accepted + self.rejected
    }
}

/// Stage buffers for allocation-free Dormand-Prince steps.
pub struct DopriWorkspace {
    pub k1: Vec<f64>,
    pub k2: Vec<f64>,
    pub k3: Vec<f64>,
    pub k4: Vec<f64>,
    pub k5: Vec<f64>,
    pub k6: Vec<f64>,
    pub k7: Vec<f64>,
    pub ytmp: Vec<f64>,
    pub ynew: Vec<f64>,
}

impl DopriWorkspace {
    pub fn new(n: usize) -> Self {
        Self {
            k1: vec![0.0; n],
            k2: vec![0.0; n],
            k3: vec![0.0; n],
            k4: vec![0.0; n],
            k5: vec![0.0; n],
            k6: vec![0.0; n],
            k7: vec![0.0; n],
            ytmp: vec![0.0; n],
            ynew: vec![0.0; n],
        }
    }

    pub fn resize(&mut self, n: usize) {
        if self.k1.len() != n {
            for buf in [
                &mut self.k1,
                &mut self.k2,
                &mut self.k3,
                &mut self.k4,
                &mut self.k5,
                &mut self.k6,
                &mut self.k7,
                &mut self.ytmp,
                &mut self.ynew,
            ] {
                buf.resize(n, 0.0);
            }
        }
    }
}

fn scaled_rms(v: &[f64], y: &[f64], tol: &Tolerances) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v
        .iter()
        .zip(y)
        .map(|(vi, yi)| {
            let sc = tol.atol + tol.rtol * yi.abs();
            (vi / sc) * (vi / sc)
        })
        .sum();
    (sum / v.len() as f64).sqrt()
}

/// Starting step from the scale of the state and its derivative.
fn initial_step(y: &[f64], dy: &[f64], tol: &Tolerances) -> f64 {
    let d0 = scaled_rms(y, y, tol);
    let d1 = scaled_rms(dy, y, tol);
    if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    }
}

/// One trial step of size `dt` from `(t, y)`. Expects `ws.k1 = f(t, y)`.
/// Leaves the 5th-order solution in `ws.ynew`, its derivative in `ws.k7`,
/// and returns the scaled RMS norm of the local error estimate.
fn dopri_trial<F>(y: &[f64], t: f64, dt: f64, tol: &Tolerances, ws: &mut DopriWorkspace, f: &mut F) -> f64
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    let n = y.len();
    let DopriWorkspace { k1, k2, k3, k4, k5, k6, k7, ytmp, ynew } = ws;

    for i in 0..n {
        ytmp[i] = y[i] + dt * A21 * k1[i];
    }
    f(t + C2 * dt, ytmp, k2);

    for i in 0..n {
        ytmp[i] = y[i] + dt * (A31 * k1[i] + A32 * k2[i]);
    }
    f(t + C3 * dt, ytmp, k3);

    for i in 0..n {
        ytmp[i] = y[i] + dt * (A41 * k1[i] + A42 * k2[i] + A43 * k3[i]);
    }
    f(t + C4 * dt, ytmp, k4);

    for i in 0..n {
        ytmp[i] = y[i] + dt * (A51 * k1[i] + A52 * k2[i] + A53 * k3[i] + A54 * k4[i]);
    }
    f(t + C5 * dt, ytmp, k5);

    for i in 0..n {
        ytmp[i] = y[i] + dt * (A61 * k1[i] + A62 * k2[i] + A63 * k3[i] + A64 * k4[i] + A65 * k5[i]);
    }
    f(t + dt, ytmp, k6);

    for i in 0..n {
        ynew[i] = y[i] + dt * (B1 * k1[i] + B3 * k3[i] + B4 * k4[i] + B5 * k5[i] + B6 * k6[i]);
    }
    f(t + dt, ynew, k7);

    if n == 0 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let err = dt * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i] + E6 * k6[i] + E7 * k7[i]);
        let sc = tol.atol + tol.rtol * y[i].abs().max(ynew[i].abs());
        acc += (err / sc) * (err / sc);
    }
    (acc / n as f64).sqrt()
}

/// Advances `(t, y)` to exactly `t_end` with adaptive steps, carrying the step
/// size `h` across calls. Expects `ws.k1 = f(t, y)` on entry and keeps it so on
/// return.
#[allow(clippy::too_many_arguments)]
pub fn integrate_to<F>(
    y: &mut [f64],
    t: &mut f64,
    t_end: f64,
    h: &mut f64,
    tol: &Tolerances,
    ws: &mut DopriWorkspace,
    stats: &mut StepStats,
    f: &mut F,
) -> Result<(), OdeError>
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    ws.resize(y.len());

    while *t < t_end {
        if *h < tol.min_step {
            return Err(OdeError::StepSizeUnderflow { t: *t, h: *h });
        }
        if stats.attempted() >= tol.max_steps {
            return Err(OdeError::StepBudgetExhausted { t: *t, max_steps: tol.max_steps });
        }

        let remaining = t_end - *t;
        let clipped = *h >= remaining;
        let dt = if clipped { remaining } else { *h };

        let err = dopri_trial(y, *t, dt, tol, ws, f);
        stats.evaluations += 6;

        if !err.is_finite() {
            stats.rejected += 1;
            *h = dt * MIN_FACTOR;
            continue;
        }

        let factor = if err == 0.0 {
            MAX_FACTOR
        } else {
            (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
        };

        if err <= 1.0 {
            stats.accepted += 1;
            *t = if clipped { t_end } else { *t + dt };
            y.copy_from_slice(&ws.ynew);
            std::mem::swap(&mut ws.k1, &mut ws.k7);
            let proposed = dt * factor;
            // a step shortened to hit t_end says nothing about the natural step
            *h = if clipped { proposed.max(*h) } else { proposed };
        } else {
            stats.rejected += 1;
            *h = dt * factor.min(1.0);
        }
    }

    Ok(())
}

/// Integrates `dy/dt = f(t, y)` from `y0` at `grid[0]` and reports the state at
/// every grid time. The grid must be non-decreasing.
pub fn solve_on_grid<F>(
    y0: &[f64],
    grid: &[f64],
    tol: &Tolerances,
    mut f: F,
) -> Result<(Vec<(f64, Vec<f64>)>, StepStats), OdeError>
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    let mut stats = StepStats::default();
    let mut out = Vec::with_capacity(grid.len());
    let Some(&t0) = grid.first() else {
        return Ok((out, stats));
    };

    let mut y = y0.to_vec();
    let mut ws = DopriWorkspace::new(y.len());
    f(t0, &y, &mut ws.k1);
    stats.evaluations += 1;
    if y.iter().chain(ws.k1.iter()).any(|v| !v.is_finite()) {
        return Err(OdeError::NonFinite { t: t0 });
    }

    let mut t = t0;
    let mut h = initial_step(&y, &ws.k1, tol);
    out.push((t, y.clone()));

    for &t_next in &grid[1..] {
        integrate_to(&mut y, &mut t, t_next, &mut h, tol, &mut ws, &mut stats, &mut f)?;
        if y.iter().any(|v| !v.is_finite()) {
            return Err(OdeError::NonFinite { t });
        }
        out.push((t, y.clone()));
    }

    Ok((out, stats))
}

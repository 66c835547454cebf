use seird::math::ode::{solve_on_grid, OdeError, Tolerances};

#[test]
fn exponential_decay_matches_analytic_solution() {
    let grid: Vec<f64> = (0..=10).map(|i| i as f64 * 0.5).collect();
    let tol = Tolerances { rtol: 1e-10, atol: 1e-12, ..Tolerances::default() };

    let (out, stats) = solve_on_grid(&[1.0], &grid, &tol, |_t, y, dy| dy[0] = -y[0]).expect("solve");

    assert_eq!(out.len(), grid.len());
    for ((t, y), g) in out.iter().zip(&grid) {
        assert_eq!(t, g, "output time must land exactly on the grid");
        assert!((y[0] - (-t).exp()).abs() < 1e-8, "t={} y={} expected={}", t, y[0], (-t).exp());
    }
    assert!(stats.accepted > 0);
}

#[test]
fn time_dependent_forcing_is_evaluated_between_grid_points() {
    // y' = cos(t), y(0) = 0  =>  y = sin(t)
    let grid = [0.0, 1.0, 2.0, 3.0, 4.0];
    let (out, _) = solve_on_grid(&[0.0], &grid, &Tolerances::default(), |t, _y, dy| dy[0] = t.cos()).expect("solve");

    for (t, y) in &out {
        assert!((y[0] - t.sin()).abs() < 1e-6, "t={} y={}", t, y[0]);
    }
}

#[test]
fn linear_invariant_is_preserved() {
    // mass moves between two compartments, the sum must not drift
    let grid: Vec<f64> = (0..50).map(|i| i as f64).collect();
    let (out, _) = solve_on_grid(&[1000.0, 0.0], &grid, &Tolerances::default(), |t, y, dy| {
        let flow = (1.0 + t.sin()) * 0.1 * y[0];
        dy[0] = -flow;
        dy[1] = flow;
    })
    .expect("solve");

    for (_, y) in &out {
        assert!((y[0] + y[1] - 1000.0).abs() < 1e-9);
    }
}

#[test]
fn single_point_grid_returns_initial_state() {
    let (out, stats) = solve_on_grid(&[3.0, 4.0], &[7.0], &Tolerances::default(), |_t, _y, dy| {
        dy.fill(1.0);
    })
    .expect("solve");

    assert_eq!(out, vec![(7.0, vec![3.0, 4.0])]);
    assert_eq!(stats.accepted, 0);
}

#[test]
fn empty_grid_returns_nothing() {
    let (out, _) = solve_on_grid(&[1.0], &[], &Tolerances::default(), |_t, _y, _dy| {}).expect("solve");
    assert!(out.is_empty());
}

#[test]
fn exhausted_step_budget_is_an_error() {
    let tol = Tolerances { max_steps: 1, ..Tolerances::default() };
    let err = solve_on_grid(&[1.0], &[0.0, 100.0], &tol, |_t, y, dy| dy[0] = -y[0]).unwrap_err();
    assert!(matches!(err, OdeError::StepBudgetExhausted { max_steps: 1, .. }), "{err:?}");
}

#[test]
fn step_below_minimum_is_an_error() {
    let tol = Tolerances { min_step: 0.5, ..Tolerances::default() };
    let err = solve_on_grid(&[1.0], &[0.0, 10.0], &tol, |_t, y, dy| dy[0] = -y[0]).unwrap_err();
    assert!(matches!(err, OdeError::StepSizeUnderflow { .. }), "{err:?}");
}

#[test]
fn non_finite_initial_state_is_an_error() {
    let err = solve_on_grid(&[f64::NAN], &[0.0, 1.0], &Tolerances::default(), |_t, y, dy| dy[0] = y[0]).unwrap_err();
    assert_eq!(err, OdeError::NonFinite { t: 0.0 });
}

use seird::scenario::{compare, standard_scenarios, Scenario};
use seird::{EpidemiologicalParameters, Policy, PolicySet, SimulationConfig, SimulationError};

#[test]
fn standard_scenarios_cover_baseline_each_policy_and_all() {
    let names: Vec<String> = standard_scenarios().into_iter().map(|s| s.name).collect();
    assert_eq!(
        names,
        [
            "no_policy",
            "business_closures",
            "school_closures",
            "stay_at_home",
            "expanded_testing",
            "travel_restrictions",
            "all_policies",
        ]
    );
}

#[test]
fn comparison_ranks_interventions() {
    let params = EpidemiologicalParameters::default();
    let summaries = compare(&params, &standard_scenarios(), &SimulationConfig::default()).expect("compare");
    assert_eq!(summaries.len(), 7);

    let baseline = &summaries[0];
    let all = &summaries[6];
    assert_eq!(baseline.schedule.x0, 70.0);
    assert_eq!(all.schedule.x0, 30.0);
    assert!((all.schedule.r_end() - 4.3).abs() < 1e-12);

    for single in &summaries[1..6] {
        assert!(single.peak_infectious < baseline.peak_infectious, "{}", single.name);
        assert!(all.peak_infectious <= single.peak_infectious, "{}", single.name);
        assert!(single.total_deaths > 0.0);
    }
}

#[test]
fn summary_totals_match_the_final_state() {
    let params = EpidemiologicalParameters::default();
    let scenarios = [Scenario::new("stay", PolicySet::none().with(Policy::StayAtHome))];
    let summary = compare(&params, &scenarios, &SimulationConfig::default()).expect("compare").remove(0);

    let traj = seird::run_simulation(&params, &scenarios[0].policies).expect("simulation");
    let last = traj.final_state().expect("final");
    assert_eq!(summary.name, "stay");
    assert_eq!(summary.total_deaths, last.d);
    assert_eq!(summary.total_recovered, last.r);
    assert_eq!(Some((summary.peak_infectious_day, summary.peak_infectious)), traj.peak_infectious());
}

#[test]
fn invalid_parameters_abort_the_comparison() {
    let params = EpidemiologicalParameters { contagious_period: 0.0, ..Default::default() };
    let err = compare(&params, &standard_scenarios(), &SimulationConfig::default()).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidParameter { name: "contagious_period", .. }));
}

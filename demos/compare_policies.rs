use seird::config::LogFormat;
use seird::io::report::write_trajectory_csv;
use seird::logging::init_logger;
use seird::scenario::{compare, standard_scenarios};
use seird::{run_simulation, EpidemiologicalParameters, Policy, PolicySet, SimulationConfig};

fn main() -> anyhow::Result<()> {
    init_logger(LogFormat::Compact);

    // Defaults of the input form: 1M people, 30% fatality, 4/5/9 day periods.
    let params = EpidemiologicalParameters::default();

    println!("scenario,r_end,x0,peak_day,peak_infectious,total_deaths");
    for s in compare(&params, &standard_scenarios(), &SimulationConfig::default())? {
        println!(
            "{},{:.2},{:.0},{:.0},{:.0},{:.0}",
            s.name,
            s.schedule.r_end(),
            s.schedule.x0,
            s.peak_infectious_day,
            s.peak_infectious,
            s.total_deaths
        );
    }

    // Full series for one scenario, ready for an external plotting tool.
    println!();
    let policies = PolicySet::none().with(Policy::StayAtHome).with(Policy::ExpandedTesting);
    let traj = run_simulation(&params, &policies)?;
    write_trajectory_csv(std::io::stdout().lock(), &traj)?;

    Ok(())
}

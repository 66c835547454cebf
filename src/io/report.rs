use anyhow::Context;

use crate::model::trajectory::Trajectory;

pub const HEADER: [&str; 8] = [
    "day",
    "susceptible",
    "exposed",
    "infectious",
    "recovered",
    "dead",
    "total",
    "reproduction_number",
];

/// Writes one CSV row per grid point: day, the five compartments, their sum
/// and R(t). Counts are rounded to whole people, R(t) to 4 decimals.
pub fn write_trajectory_csv<W: std::io::Write>(out: W, traj: &Trajectory) -> anyhow::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    wtr.write_record(HEADER).context("write csv header failed")?;

    for (idx, (t, state)) in traj.points().enumerate() {
        let r = traj.reproduction_number.get(idx).copied().unwrap_or(f64::NAN);
        wtr.write_record([
            format!("{:.0}", t),
            format!("{:.0}", state.s),
            format!("{:.0}", state.e),
            format!("{:.0}", state.i),
            format!("{:.0}", state.r),
            format!("{:.0}", state.d),
            format!("{:.0}", state.total()),
            format!("{:.4}", r),
        ])
        .with_context(|| format!("write csv row failed at t={}", t))?;
    }

    wtr.flush().context("flush csv writer failed")?;
    Ok(())
}

pub fn trajectory_csv_string(traj: &Trajectory) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    write_trajectory_csv(&mut buf, traj)?;
    String::from_utf8(buf).context("csv output was not utf-8")
}

use seird::io::report::{trajectory_csv_string, write_trajectory_csv, HEADER};
use seird::model::seird::CompartmentState;
use seird::{run_simulation, EpidemiologicalParameters, PolicySet, Trajectory};

fn small_trajectory() -> Trajectory {
    let mut traj = Trajectory::with_capacity(3);
    traj.push(0.0, CompartmentState { s: 999_999.0, e: 1.0, i: 0.0, r: 0.0, d: 0.0 }, 6.0);
    traj.push(1.0, CompartmentState { s: 999_998.4, e: 1.3, i: 0.2, r: 0.05, d: 0.05 }, 5.5);
    traj.push(
        2.0,
        CompartmentState { s: 400_000.0, e: 100_000.0, i: 250_000.0, r: 175_000.0, d: 75_000.0 },
        4.3,
    );
    traj
}

#[test]
fn trajectory_csv_snapshot_small() {
    let csv = trajectory_csv_string(&small_trajectory()).expect("render csv");
    insta::assert_snapshot!(csv.trim_end(), @r"
    day,susceptible,exposed,infectious,recovered,dead,total,reproduction_number
    0,999999,1,0,0,0,1000000,6.0000
    1,999998,1,0,0,0,1000000,5.5000
    2,400000,100000,250000,175000,75000,1000000,4.3000
    ");
}

#[test]
fn simulated_run_renders_one_row_per_grid_point() {
    let traj = run_simulation(&EpidemiologicalParameters::default(), &PolicySet::none()).expect("simulation");

    let mut buf = Vec::new();
    write_trajectory_csv(&mut buf, &traj).expect("write csv");
    let text = String::from_utf8(buf).expect("utf-8");

    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(HEADER.join(",").as_str()));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 100);
    assert!(rows[0].starts_with("0,999999,1,0,0,0,1000000,"));
    for row in &rows {
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), HEADER.len());
        assert_eq!(fields[6], "1000000", "total column drifted: {}", row);
    }
}

pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod model;
pub mod scenario;
pub mod simulation;

pub use error::{Result, SimulationError};
pub use model::policy::{resolve_schedule, Policy, PolicySet, PolicyToggles};
pub use model::seird::{CompartmentState, EpidemiologicalParameters, SeirdModel};
pub use model::trajectory::Trajectory;
pub use model::transmission::ReproductionSchedule;
pub use simulation::{run_simulation, run_simulation_with, SimulationConfig, TimeGrid};

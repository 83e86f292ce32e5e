pub mod simulation;
pub mod analysis;
pub mod configuration;
pub mod output;
pub mod benchmark;

pub use simulation::states::{State, TrajectoryPoint, AngleChannel, NVec2};
pub use simulation::params::{SystemParameters, Parameters, G};
pub use simulation::physics::{angular_accel1, angular_accel2, to_cartesian};
pub use simulation::integrator::{rk4_step, step_count, simulate_full, simulate_angle, simulate_angle_into};
pub use simulation::scenario::Scenario;

pub use analysis::flip::{first_flip_time, flip_time_or_sentinel, FLIP_SENTINEL};
pub use analysis::grid::{sweep, FlipGrid, GridSpec};

pub use configuration::config::{ScenarioConfig, ConfigError};

pub use output::writer::{write_trajectory_csv, write_flip_grid_csv, write_flip_grid, grid_filename, OutputError, TRAJECTORY_FILE};

pub use benchmark::benchmark::{bench_rk4, bench_grid};

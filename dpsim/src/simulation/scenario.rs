//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! `Scenario` containing:
//! - pendulum parameters (`SystemParameters`)
//! - initial angular state (`State`)
//! - horizon and step (`Parameters`)
//! - optional sweep range (`GridSpec`)
//! - directory the output tables go to

use std::path::PathBuf;

use crate::analysis::flip::first_flip_time;
use crate::analysis::grid::{sweep, FlipGrid, GridSpec};
use crate::configuration::config::{ConfigError, ScenarioConfig};
use crate::simulation::integrator::{simulate_angle, simulate_full};
use crate::simulation::params::{Parameters, SystemParameters};
use crate::simulation::states::{AngleChannel, State, TrajectoryPoint};

pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone)]
pub struct Scenario {
    pub system: SystemParameters,
    pub initial: State,
    pub parameters: Parameters,
    pub grid: Option<GridSpec>,
    pub output_dir: PathBuf,
}

impl Scenario {
    /// Validate `cfg` and map it to runtime types
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let p = cfg.pendulum;
        let system = SystemParameters::new(p.l1, p.l2, p.m1, p.m2);

        let i = cfg.initial;
        let initial = State::new(i.phi1, i.phi2, i.omega1, i.omega2);

        let parameters = Parameters {
            t_end: cfg.parameters.t_end,
            h0: cfg.parameters.h0,
        };

        let grid = cfg.grid.map(|g| GridSpec {
            min_phi: g.min_phi,
            max_phi: g.max_phi,
            resolution: g.resolution,
        });

        Ok(Self {
            system,
            initial,
            parameters,
            grid,
            output_dir: cfg.output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        })
    }

    /// Full trajectory of the configured run
    pub fn trajectory(&self) -> Vec<TrajectoryPoint> {
        simulate_full(&self.system, self.initial, self.parameters.t_end, self.parameters.h0)
    }

    /// First flip of one arm for the configured run
    pub fn flip_time(&self, channel: AngleChannel) -> Option<f64> {
        let phi = simulate_angle(&self.system, self.initial, self.parameters.t_end, self.parameters.h0, channel);
        first_flip_time(&phi, self.parameters.h0)
    }

    /// Sweep the configured grid; the initial angles of the scenario are
    /// replaced by the grid, its initial velocities are kept
    pub fn flip_grid(&self) -> Result<FlipGrid, ConfigError> {
        let spec = self.grid.ok_or(ConfigError::MissingGrid)?;
        Ok(sweep(&self.system, self.initial.omega1, self.initial.omega2, &self.parameters, spec))
    }
}

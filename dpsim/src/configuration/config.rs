//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! double pendulum run. A scenario consists of:
//!
//! - [`PendulumConfig`]   – arm lengths and bob masses
//! - [`InitialConfig`]    – initial angles and angular velocities
//! - [`ParametersConfig`] – horizon and fixed step size
//! - [`GridConfig`]       – optional angle sweep for flip-time maps
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario matching these types:
//!
//! ```yaml
//! pendulum:
//!   l1: 1.0          # upper arm length
//!   l2: 1.0          # lower arm length
//!   m1: 1.0          # upper bob mass
//!   m2: 1.0          # lower bob mass
//!
//! initial:
//!   phi1: 3.0        # radians, unwrapped
//!   phi2: 3.0
//!   omega1: 0.0      # radians per time unit
//!   omega2: 0.0
//!
//! parameters:
//!   t_end: 10.0      # total simulation time
//!   h0: 0.01         # fixed step size
//!
//! grid:              # only needed for flip-grid
//!   min_phi: -3.14
//!   max_phi: 3.14
//!   resolution: 200
//!
//! output_dir: "output"
//! ```
//!
//! The simulation core never validates its inputs, so [`ScenarioConfig::validate`]
//! is the single place where non-physical values are rejected.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or checking a scenario
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to open scenario file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{name} must be finite and > 0, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("grid resolution must be > 0")]
    EmptyGrid,

    #[error("grid range is empty: min_phi ({min}) must be < max_phi ({max})")]
    EmptyRange { min: f64, max: f64 },

    #[error("scenario has no grid section")]
    MissingGrid,
}

/// Physical parameters of the pendulum
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct PendulumConfig {
    pub l1: f64,
    pub l2: f64,
    pub m1: f64,
    pub m2: f64,
}

/// Initial angular state; velocities default to rest
#[derive(Deserialize, Debug, Clone, Copy, Default)]
pub struct InitialConfig {
    #[serde(default)]
    pub phi1: f64,
    #[serde(default)]
    pub phi2: f64,
    #[serde(default)]
    pub omega1: f64,
    #[serde(default)]
    pub omega2: f64,
}

/// Horizon and step of a run
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct ParametersConfig {
    pub t_end: f64, // time end
    pub h0: f64, // time step size
}

/// Square sweep over initial angles (phi1_0, phi2_0)
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct GridConfig {
    pub min_phi: f64,
    pub max_phi: f64,
    pub resolution: usize,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub pendulum: PendulumConfig,
    #[serde(default)]
    pub initial: InitialConfig,
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub grid: Option<GridConfig>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl ScenarioConfig {
    /// Read and parse a YAML scenario (no validation)
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Reject values the simulation core would silently turn into NaN:
    /// lengths, masses and step must be finite and positive, the horizon and
    /// initial state finite, and the grid (if present) non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.pendulum;
        positive("l1", p.l1)?;
        positive("l2", p.l2)?;
        positive("m1", p.m1)?;
        positive("m2", p.m2)?;

        positive("h0", self.parameters.h0)?;
        finite("t_end", self.parameters.t_end)?;

        let i = &self.initial;
        finite("phi1", i.phi1)?;
        finite("phi2", i.phi2)?;
        finite("omega1", i.omega1)?;
        finite("omega2", i.omega2)?;

        if let Some(grid) = &self.grid {
            grid.validate()?;
        }
        Ok(())
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("min_phi", self.min_phi)?;
        finite("max_phi", self.max_phi)?;
        if self.resolution == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.min_phi >= self.max_phi {
            return Err(ConfigError::EmptyRange { min: self.min_phi, max: self.max_phi });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}

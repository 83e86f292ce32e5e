//! CSV tables produced from simulation results
//!
//! - trajectory table: `time,x1,y1,x2,y2,v1,v2,phi1,phi2,omega1,omega2`
//! - flip grid table:  `phi1,phi2,flip_time`, phi1 outer, phi2 inner
//!
//! Parent directories are created as needed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::analysis::grid::{FlipGrid, GridSpec};
use crate::simulation::params::{Parameters, SystemParameters};
use crate::simulation::states::{AngleChannel, TrajectoryPoint};

pub const TRAJECTORY_FILE: &str = "simulation_output.csv";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create output directory {path}: {source}")]
    Dir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to flush {path}: {source}")]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Serialize)]
struct GridRow {
    phi1: f64,
    phi2: f64,
    flip_time: f64,
}

/// Write one row per trajectory point
pub fn write_trajectory_csv(path: &Path, points: &[TrajectoryPoint]) -> Result<(), OutputError> {
    let mut writer = open_writer(path)?;
    for pt in points {
        writer.serialize(pt).map_err(|source| csv_error(path, source))?;
    }
    writer.flush().map_err(|source| OutputError::Flush { path: path.to_path_buf(), source })
}

/// Write one `resolution x resolution` flip table.
///
/// The angle columns are rebuilt from the table size and the grid range, so
/// they match the initial conditions the sweep used.
pub fn write_flip_grid_csv(path: &Path, table: &[Vec<f64>], spec: &GridSpec) -> Result<(), OutputError> {
    let mut writer = open_writer(path)?;
    for (i, row) in table.iter().enumerate() {
        let phi1 = spec.angle_at(i);
        for (j, &flip_time) in row.iter().enumerate() {
            let record = GridRow { phi1, phi2: spec.angle_at(j), flip_time };
            writer.serialize(record).map_err(|source| csv_error(path, source))?;
        }
    }
    writer.flush().map_err(|source| OutputError::Flush { path: path.to_path_buf(), source })
}

/// Write both channels of a sweep into `dir`, named by [`grid_filename`].
/// Returns the two paths (phi1 table, phi2 table).
pub fn write_flip_grid(
    dir: &Path,
    grid: &FlipGrid,
    system: &SystemParameters,
    omega1: f64,
    omega2: f64,
    params: &Parameters,
) -> Result<(PathBuf, PathBuf), OutputError> {
    let write_channel = |channel: AngleChannel| -> Result<PathBuf, OutputError> {
        let prefix = format!("{}_flip", channel.name());
        let path = dir.join(grid_filename(&prefix, system, omega1, omega2, params, &grid.spec));
        write_flip_grid_csv(&path, grid.table(channel), &grid.spec)?;
        log::info!("saved CSV: {}", path.display());
        Ok(path)
    };

    Ok((write_channel(AngleChannel::Phi1)?, write_channel(AngleChannel::Phi2)?))
}

/// File name encoding every parameter of a sweep
pub fn grid_filename(
    prefix: &str,
    system: &SystemParameters,
    omega1: f64,
    omega2: f64,
    params: &Parameters,
    spec: &GridSpec,
) -> String {
    format!(
        "{prefix}_l1_{}_l2_{}_m1_{}_m2_{}_o1_{}_o2_{}_T_{}_h_{}_phi_{}_to_{}_res_{}.csv",
        system.l1,
        system.l2,
        system.m1,
        system.m2,
        omega1,
        omega2,
        params.t_end,
        params.h0,
        spec.min_phi,
        spec.max_phi,
        spec.resolution,
    )
}

fn open_writer(path: &Path) -> Result<csv::Writer<fs::File>, OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::Dir { path: parent.to_path_buf(), source })?;
    }
    csv::Writer::from_path(path).map_err(|source| csv_error(path, source))
}

fn csv_error(path: &Path, source: csv::Error) -> OutputError {
    OutputError::Csv { path: path.to_path_buf(), source }
}

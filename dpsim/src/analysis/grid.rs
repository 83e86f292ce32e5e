//! Flip-time sweep over a square grid of initial angles
//!
//! Every cell `(i, j)` starts the pendulum at
//! `phi1_0 = min_phi + step * i`, `phi2_0 = min_phi + step * j` with the shared
//! initial angular velocities, then records the first flip time of each arm.
//! Cells are independent, so rows are handed to rayon workers; each worker
//! owns its angle buffer and nothing is shared mutably.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::analysis::flip::{first_flip_time, flip_time_or_sentinel};
use crate::simulation::integrator::simulate_angle_into;
use crate::simulation::params::{Parameters, SystemParameters};
use crate::simulation::states::{AngleChannel, State};

/// Angle range and resolution of a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub min_phi: f64,
    pub max_phi: f64,
    pub resolution: usize,
}

impl GridSpec {
    /// Spacing between neighbouring initial angles.
    /// A 1-wide grid uses the whole range as its (unused) step.
    pub fn step(&self) -> f64 {
        let divisions = if self.resolution > 1 { self.resolution - 1 } else { 1 };
        (self.max_phi - self.min_phi) / divisions as f64
    }

    /// Initial angle of row/column `idx`
    pub fn angle_at(&self, idx: usize) -> f64 {
        self.min_phi + self.step() * idx as f64
    }
}

/// Result of a sweep: two `resolution x resolution` tables indexed `[i][j]`,
/// `i` along phi1_0 and `j` along phi2_0. Missing flips hold `-1.0`.
#[derive(Debug, Clone)]
pub struct FlipGrid {
    pub spec: GridSpec,
    pub phi1: Vec<Vec<f64>>,
    pub phi2: Vec<Vec<f64>>,
}

impl FlipGrid {
    pub fn table(&self, channel: AngleChannel) -> &Vec<Vec<f64>> {
        match channel {
            AngleChannel::Phi1 => &self.phi1,
            AngleChannel::Phi2 => &self.phi2,
        }
    }

    /// Number of cells in `channel` that flipped within the horizon
    pub fn flipped_cells(&self, channel: AngleChannel) -> usize {
        self.table(channel)
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&t| t >= 0.0)
            .count()
    }
}

/// Flip time of one channel for one set of initial conditions.
/// `buf` is scratch space reused between calls.
pub fn flip_time_for(
    system: &SystemParameters,
    initial: State,
    params: &Parameters,
    channel: AngleChannel,
    buf: &mut Vec<f64>,
) -> Option<f64> {
    simulate_angle_into(system, initial, params.t_end, params.h0, channel, buf);
    first_flip_time(buf, params.h0)
}

/// Run the sweep. Both channels are simulated separately per cell, matching
/// the single-run flip analysis exactly.
pub fn sweep(
    system: &SystemParameters,
    omega1: f64,
    omega2: f64,
    params: &Parameters,
    spec: GridSpec,
) -> FlipGrid {
    let n = spec.resolution;
    let done = AtomicUsize::new(0);

    let rows: Vec<(Vec<f64>, Vec<f64>)> = (0..n)
        .into_par_iter()
        .map_init(Vec::new, |buf, i| {
            let phi1_0 = spec.angle_at(i);
            let mut row1 = Vec::with_capacity(n);
            let mut row2 = Vec::with_capacity(n);

            for j in 0..n {
                let initial = State::new(phi1_0, spec.angle_at(j), omega1, omega2);
                row1.push(flip_time_or_sentinel(flip_time_for(system, initial, params, AngleChannel::Phi1, buf)));
                row2.push(flip_time_or_sentinel(flip_time_for(system, initial, params, AngleChannel::Phi2, buf)));
            }

            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("grid progress: {}% ({}/{} rows)", finished * 100 / n, finished, n);

            (row1, row2)
        })
        .collect();

    let (phi1, phi2) = rows.into_iter().unzip();
    FlipGrid { spec, phi1, phi2 }
}

use std::time::Instant;

use crate::analysis::flip::first_flip_time;
use crate::analysis::grid::{sweep, GridSpec};
use crate::simulation::integrator::{simulate_angle, simulate_full};
use crate::simulation::params::{Parameters, SystemParameters};
use crate::simulation::states::{AngleChannel, State};

fn make_system() -> SystemParameters {
    SystemParameters::new(1.0, 1.0, 1.0, 1.0)
}

/// Time a single run for shrinking step sizes
pub fn bench_rk4() {
    let system = make_system();
    let initial = State::new(3.0, 3.0, 0.0, 0.0);
    let t_end = 10.0;
    let hs = [0.01, 0.005, 0.001, 0.0005, 0.0001];

    for h in hs {
        // Warm up
        let _ = simulate_angle(&system, initial, 1.0, h, AngleChannel::Phi1);

        let t0 = Instant::now();
        let phi = simulate_angle(&system, initial, t_end, h, AngleChannel::Phi1);
        let dt_angle = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        let flip = first_flip_time(&phi, h);
        let dt_flip = t1.elapsed().as_secs_f64();

        let t2 = Instant::now();
        let full = simulate_full(&system, initial, t_end, h);
        let dt_full = t2.elapsed().as_secs_f64();

        println!(
            "h = {h:8.5}, samples = {:8}, angle = {:8.6} s, flip = {:8.6} s, full = {:8.6} s, flip at {:?}",
            full.len(),
            dt_angle,
            dt_flip,
            dt_full,
            flip
        );
    }
}

/// Time the flip-grid sweep for growing resolutions
/// Paste output directly into a spreadsheet to graph
pub fn bench_grid() {
    let system = make_system();
    let params = Parameters { t_end: 10.0, h0: 0.01 };

    println!("resolution,cells,ms,threads");

    for resolution in [8, 16, 32, 64, 128] {
        let spec = GridSpec { min_phi: -3.0, max_phi: 3.0, resolution };

        let t0 = Instant::now();
        let grid = sweep(&system, 0.0, 0.0, &params, spec);
        let ms = t0.elapsed().as_secs_f64() * 1000.0;

        println!("{},{},{:.3},{}", resolution, grid.phi1.len() * resolution, ms, rayon::current_num_threads());
    }
}

use std::path::PathBuf;

use approx::assert_abs_diff_eq;

use dpsim::simulation::params::SystemParameters;
use dpsim::simulation::states::{AngleChannel, State};
use dpsim::configuration::config::ConfigError;
use dpsim::{first_flip_time, simulate_angle, simulate_full, to_cartesian, Scenario, ScenarioConfig};

/// Equal arms and masses, the usual reference pendulum
pub fn unit_pendulum() -> SystemParameters {
    SystemParameters::new(1.0, 1.0, 1.0, 1.0)
}

/// Both arms released from rest at the given angles
pub fn at_rest(phi1: f64, phi2: f64) -> State {
    State::new(phi1, phi2, 0.0, 0.0)
}

/// Load a scenario shipped with the crate
pub fn load_scenario(name: &str) -> Scenario {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name);
    let cfg = ScenarioConfig::from_yaml_file(&path).expect("scenario file should parse");
    Scenario::build_scenario(cfg).expect("scenario should be valid")
}

/// Largest relative deviation of total energy from its initial value
pub fn max_energy_drift(params: &SystemParameters, initial: State, t_end: f64, h: f64) -> f64 {
    let traj = simulate_full(params, initial, t_end, h);
    let e0 = params.total_energy(&traj[0]);
    traj.iter()
        .map(|p| ((params.total_energy(p) - e0) / e0).abs())
        .fold(0.0, f64::max)
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn sample_count_is_floor_t_over_h_plus_one() {
    let params = unit_pendulum();
    let initial = at_rest(0.4, 0.1);

    for (t_end, h, expected) in [(10.0, 0.01, 1001), (1.0, 0.1, 11), (0.35, 0.1, 4), (0.0, 0.1, 1), (0.05, 0.1, 1)] {
        assert_eq!(simulate_full(&params, initial, t_end, h).len(), expected, "T = {t_end}, h = {h}");
        assert_eq!(simulate_angle(&params, initial, t_end, h, AngleChannel::Phi2).len(), expected);
    }
}

#[test]
fn negative_horizon_yields_initial_state_only() {
    let initial = State::new(1.0, 2.0, 0.5, -0.5);
    let traj = simulate_full(&unit_pendulum(), initial, -5.0, 0.01);
    assert_eq!(traj.len(), 1);
    assert_eq!(traj[0].state(), initial);

    let phi = simulate_angle(&unit_pendulum(), initial, -5.0, 0.01, AngleChannel::Phi1);
    assert_eq!(phi, vec![1.0]);
}

#[test]
fn first_point_is_the_initial_condition() {
    let params = SystemParameters::new(1.3, 0.7, 2.0, 0.5);
    let initial = State::new(0.8, -1.9, 0.25, 1.5);
    let traj = simulate_full(&params, initial, 1.0, 0.01);

    let expected = to_cartesian(1.3, 0.7, 0.8, -1.9, 0.25, 1.5);
    assert_eq!(traj[0], expected);
    assert_eq!(traj[0].time, 0.0);
    assert_eq!(traj[0].state(), initial);
}

#[test]
fn time_is_stamped_per_step() {
    let traj = simulate_full(&unit_pendulum(), at_rest(1.0, 1.0), 1.0, 0.25);
    let times: Vec<f64> = traj.iter().map(|p| p.time).collect();
    assert_eq!(times, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
}

#[test]
fn energy_drift_stays_small() {
    let cases = [
        (unit_pendulum(), at_rest(0.5, 0.3)),
        (unit_pendulum(), at_rest(1.0, -0.5)),
        (unit_pendulum(), at_rest(2.0, 2.0)),
        (SystemParameters::new(1.5, 0.7, 2.0, 0.5), State::new(1.2, 0.4, 0.3, -0.2)),
    ];
    for (params, initial) in cases {
        let drift = max_energy_drift(&params, initial, 1.0, 0.001);
        assert!(drift < 0.01, "energy drifted by {:.4}% for {:?}", drift * 100.0, initial);
    }
}

#[test]
fn positions_keep_arm_lengths() {
    let params = SystemParameters::new(1.5, 0.5, 1.0, 3.0);
    for p in simulate_full(&params, State::new(2.5, -1.0, 1.0, 0.0), 2.0, 0.01) {
        assert_abs_diff_eq!(p.bob1().norm(), 1.5, epsilon = 1e-9);
        assert_abs_diff_eq!((p.bob2() - p.bob1()).norm(), 0.5, epsilon = 1e-9);
    }
}

// ==================================================================================
// Flip detector tests
// ==================================================================================

#[test]
fn flip_time_matches_hand_interpolation() {
    let scenario = load_scenario("near_inverted.yaml");
    let h = scenario.parameters.h0;
    let phi: Vec<f64> = scenario.trajectory().iter().map(|p| p.phi2).collect();

    // locate the first bracket of +-pi by hand
    let pi = std::f64::consts::PI;
    let (i, target) = phi
        .windows(2)
        .enumerate()
        .find_map(|(i, w)| {
            [pi, -pi]
                .into_iter()
                .find(|&t| (w[0] < t && t < w[1]) || (w[1] < t && t < w[0]))
                .map(|t| (i + 1, t))
        })
        .expect("phi2 should pass through the inverted position");

    let expected = h * ((i - 1) as f64 + (target - phi[i - 1]) / (phi[i] - phi[i - 1]));
    assert_abs_diff_eq!(first_flip_time(&phi, h).unwrap(), expected, epsilon = 1e-12);
}

#[test]
fn small_oscillations_never_flip() {
    let scenario = load_scenario("small_oscillation.yaml");
    assert_eq!(scenario.flip_time(AngleChannel::Phi1), None);
    assert_eq!(scenario.flip_time(AngleChannel::Phi2), None);

    let phi = simulate_angle(&scenario.system, scenario.initial, 20.0, 0.01, AngleChannel::Phi2);
    assert!(phi.iter().all(|p| p.abs() < std::f64::consts::PI));
}

#[test]
fn near_inverted_release_flips_quickly() {
    let scenario = load_scenario("near_inverted.yaml");
    let t_end = scenario.parameters.t_end;

    let t1 = scenario.flip_time(AngleChannel::Phi1).expect("phi1 should flip");
    let t2 = scenario.flip_time(AngleChannel::Phi2).expect("phi2 should flip");

    assert!(t1 > 0.0 && t1 < t_end, "phi1 flip at {t1}");
    assert!(t2 > 0.0 && t2 < t_end, "phi2 flip at {t2}");
    // the lower arm goes over first
    assert!(t2 < t1);
    assert_abs_diff_eq!(t1, 2.5466, epsilon = 1e-2);
    assert_abs_diff_eq!(t2, 0.5524, epsilon = 1e-2);
}

#[test]
fn channel_selection_matches_full_trajectory() {
    let params = unit_pendulum();
    let initial = at_rest(2.8, -2.9);
    let full = simulate_full(&params, initial, 10.0, 0.01);

    for channel in [AngleChannel::Phi1, AngleChannel::Phi2] {
        let from_full: Vec<f64> = full.iter().map(|p| p.state().angle(channel)).collect();
        let traced = simulate_angle(&params, initial, 10.0, 0.01, channel);
        assert_eq!(traced, from_full);
        assert_eq!(first_flip_time(&traced, 0.01), first_flip_time(&from_full, 0.01));
    }
}

#[test]
fn symmetric_equilibrium_gives_identical_channels() {
    // identical arms hanging at rest: both channels stay put, neither flips
    let params = unit_pendulum();
    let initial = at_rest(0.0, 0.0);
    let phi1 = simulate_angle(&params, initial, 10.0, 0.01, AngleChannel::Phi1);
    let phi2 = simulate_angle(&params, initial, 10.0, 0.01, AngleChannel::Phi2);

    assert_eq!(phi1, phi2);
    assert_eq!(first_flip_time(&phi1, 0.01), first_flip_time(&phi2, 0.01));
    assert_eq!(first_flip_time(&phi1, 0.01), None);
}

// ==================================================================================
// Scenario tests
// ==================================================================================

#[test]
fn scenario_grid_runs_from_file() {
    let mut scenario = load_scenario("near_inverted.yaml");
    let mut spec = scenario.grid.expect("grid section");
    spec.resolution = 3;
    scenario.grid = Some(spec);
    scenario.parameters.t_end = 2.0;

    let grid = scenario.flip_grid().unwrap();
    assert_eq!(grid.phi1.len(), 3);
    assert_eq!(grid.phi2[2].len(), 3);
    // centre cell hangs straight down and cannot flip
    assert_eq!(grid.phi1[1][1], -1.0);
    assert_eq!(grid.phi2[1][1], -1.0);
}

#[test]
fn invalid_scenario_is_rejected() {
    let cfg = ScenarioConfig::from_yaml_str(
        "pendulum: { l1: 1.0, l2: -1.0, m1: 1.0, m2: 1.0 }\nparameters: { t_end: 1.0, h0: 0.1 }\n",
    )
    .unwrap();
    assert!(Scenario::build_scenario(cfg).is_err());
}

#[test]
fn grid_sweep_without_grid_section_is_an_error() {
    let cfg = ScenarioConfig::from_yaml_str(
        "pendulum: { l1: 1.0, l2: 1.0, m1: 1.0, m2: 1.0 }\nparameters: { t_end: 1.0, h0: 0.1 }\n",
    )
    .unwrap();
    let scenario = Scenario::build_scenario(cfg).unwrap();
    assert!(matches!(scenario.flip_grid(), Err(ConfigError::MissingGrid)));
}

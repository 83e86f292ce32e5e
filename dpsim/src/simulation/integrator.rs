//! Fixed-step time integrator for the double pendulum
//!
//! One RK4 variant drives both entry points: `simulate_full` keeps a
//! `TrajectoryPoint` per step, `simulate_angle` keeps only one angle.
//!
//! The four RK4 stages are taken on the angular velocities only. After the
//! velocities are updated with the weighted stage average, the angles are
//! advanced by `h` times the *new* velocities. This is not textbook 4-variable
//! RK4; it changes trajectories and flip times, and reference outputs depend
//! on this exact order of operations.

use super::params::SystemParameters;
use super::states::{AngleChannel, State, TrajectoryPoint};

/// Number of steps for horizon `t_end` at step `h`: `floor(t_end / h)`,
/// clamped to zero. A run produces `step_count + 1` samples (time 0 included).
pub fn step_count(t_end: f64, h: f64) -> usize {
    let steps = (t_end / h) as i64; // truncates, NaN -> 0
    steps.max(0) as usize
}

/// Advance `state` by one step of size `h`, in place
pub fn rk4_step(params: &SystemParameters, state: &mut State, h: f64) {
    let State { phi1: p1, phi2: p2, omega1: o1, omega2: o2 } = *state;

    // angles at the midpoint and the end of the step, from the current velocities
    let p1_mid = p1 + h * o1 / 2.0;
    let p2_mid = p2 + h * o2 / 2.0;
    let p1_end = p1 + h * o1;
    let p2_end = p2 + h * o2;

    // k1 at the start of the step
    let (k1_o1, k1_o2) = params.accelerations(state);

    // k2, k3 at the midpoint, k4 at the end
    let (k2_o1, k2_o2) = params.accelerations(&State::new(
        p1_mid,
        p2_mid,
        o1 + h * k1_o1 / 2.0,
        o2 + h * k1_o2 / 2.0,
    ));
    let (k3_o1, k3_o2) = params.accelerations(&State::new(
        p1_mid,
        p2_mid,
        o1 + h * k2_o1 / 2.0,
        o2 + h * k2_o2 / 2.0,
    ));
    let (k4_o1, k4_o2) = params.accelerations(&State::new(
        p1_end,
        p2_end,
        o1 + h * k3_o1,
        o2 + h * k3_o2,
    ));

    // velocities first...
    state.omega1 += h * (k1_o1 + 2.0 * k2_o1 + 2.0 * k3_o1 + k4_o1) / 6.0;
    state.omega2 += h * (k1_o2 + 2.0 * k2_o2 + 2.0 * k3_o2 + k4_o2) / 6.0;

    // ...then angles with the updated velocities
    state.phi1 += h * state.omega1;
    state.phi2 += h * state.omega2;
}

/// Run from `initial` to `t_end` and keep a full snapshot of every step.
///
/// Returns `step_count(t_end, h) + 1` points, the first being the initial
/// state at time 0. Requires `h > 0`; no bounds, NaN or Inf checks are made.
pub fn simulate_full(params: &SystemParameters, initial: State, t_end: f64, h: f64) -> Vec<TrajectoryPoint> {
    let steps = step_count(t_end, h);
    let mut state = initial;
    let mut values = Vec::with_capacity(steps + 1);

    for i in 0..=steps {
        let mut current = params.to_cartesian(&state);
        current.time = i as f64 * h;
        values.push(current);

        rk4_step(params, &mut state, h);
    }

    values
}

/// Same run as [`simulate_full`], keeping only the angle picked by `channel`
pub fn simulate_angle(
    params: &SystemParameters,
    initial: State,
    t_end: f64,
    h: f64,
    channel: AngleChannel,
) -> Vec<f64> {
    let mut out = Vec::new();
    simulate_angle_into(params, initial, t_end, h, channel, &mut out);
    out
}

/// [`simulate_angle`] writing into a caller-owned buffer, so a sweep can
/// reuse one allocation per worker. `out` is cleared first.
pub fn simulate_angle_into(
    params: &SystemParameters,
    initial: State,
    t_end: f64,
    h: f64,
    channel: AngleChannel,
    out: &mut Vec<f64>,
) {
    let steps = step_count(t_end, h);
    let mut state = initial;

    out.clear();
    out.reserve(steps + 1);

    for _ in 0..=steps {
        out.push(state.angle(channel));
        rk4_step(params, &mut state, h);
    }
}

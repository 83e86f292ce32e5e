//! Flip detection on sampled angle trajectories
//!
//! A flip is an arm passing through its inverted position, i.e. the
//! (unwrapped) angle crossing an odd multiple of pi. The crossing time is
//! located to sub-step resolution by linear interpolation between the two
//! bracketing samples.

use std::f64::consts::PI;

/// Value used in tables and plots for "no flip within the horizon"
pub const FLIP_SENTINEL: f64 = -1.0;

/// Time of the first crossing of any `(2k + 1) * pi` in `phi`, sampled every `h`.
///
/// For each consecutive pair `(prev, curr)` the candidate `k` range is
/// `ceil((min/pi - 1) / 2) ..= floor((max/pi - 1) / 2)`, scanned in ascending
/// order. A target only counts if it lies strictly between the two samples, so
/// landing exactly on an odd multiple of pi is not a flip. Returns `None` for
/// sequences with fewer than two samples or without any crossing.
pub fn first_flip_time(phi: &[f64], h: f64) -> Option<f64> {
    phi.windows(2).enumerate().find_map(|(i, pair)| {
        let (prev, curr) = (pair[0], pair[1]);
        crossing_in(prev, curr).map(|target| {
            let ratio = (target - prev) / (curr - prev);
            h * (i as f64 + ratio)
        })
    })
}

/// First odd multiple of pi strictly between `prev` and `curr`, if any.
///
/// Pairs with a NaN or infinite sample never bracket anything. `k` stays in
/// f64 so huge angles cannot overflow. Targets grow with `k` and only an
/// endpoint can fail the strict test, so the smallest qualifying `k` is among
/// the first few of the range (one extra covers rounding in `k_start`).
fn crossing_in(prev: f64, curr: f64) -> Option<f64> {
    if !prev.is_finite() || !curr.is_finite() {
        return None;
    }
    let lower = prev.min(curr);
    let upper = prev.max(curr);

    let k_start = ((lower / PI - 1.0) / 2.0).ceil();
    let k_end = ((upper / PI - 1.0) / 2.0).floor();

    (0..3)
        .map(|offset| k_start + offset as f64)
        .take_while(|&k| k <= k_end)
        .map(|k| (2.0 * k + 1.0) * PI)
        .find(|&target| (prev < target && target < curr) || (curr < target && target < prev))
}

/// Collapse a flip result to the numeric table value (`-1.0` when absent)
pub fn flip_time_or_sentinel(flip: Option<f64>) -> f64 {
    flip.unwrap_or(FLIP_SENTINEL)
}

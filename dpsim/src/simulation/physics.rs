//! Equations of motion for the two-mass double pendulum
//!
//! Closed-form angular accelerations from the Lagrangian of two point masses
//! on massless rigid links, plus the conversion from angular state to bob
//! positions and speeds.
//!
//! All functions are pure. The shared denominator
//! `2*m1 + m2 - m2*cos(2*p1 - 2*p2)` only approaches zero for degenerate
//! masses; nothing is guarded and IEEE infinities/NaN propagate as-is.

use super::params::{SystemParameters, G};
use super::states::{State, TrajectoryPoint};

/// d(omega1)/dt
#[allow(clippy::too_many_arguments)]
pub fn angular_accel1(l1: f64, l2: f64, m1: f64, m2: f64, p1: f64, p2: f64, o1: f64, o2: f64) -> f64 {
    (-G * (2.0 * m1 + m2) * p1.sin()
        - m2 * G * (p1 - 2.0 * p2).sin()
        - 2.0 * (p1 - p2).sin() * m2 * (o2 * o2 * l2 + o1 * o1 * l1 * (p1 - p2).cos()))
        / (l1 * (2.0 * m1 + m2 - m2 * (2.0 * p1 - 2.0 * p2).cos()))
}

/// d(omega2)/dt
#[allow(clippy::too_many_arguments)]
pub fn angular_accel2(l1: f64, l2: f64, m1: f64, m2: f64, p1: f64, p2: f64, o1: f64, o2: f64) -> f64 {
    (2.0 * (p1 - p2).sin()
        * (o1 * o1 * l1 * (m1 + m2)
            + G * (m1 + m2) * p1.cos()
            + o2 * o2 * l2 * m2 * (p1 - p2).cos()))
        / (l2 * (2.0 * m1 + m2 - m2 * (2.0 * p1 - 2.0 * p2).cos()))
}

/// Map an angular state to bob positions and speeds.
///
/// The pivot sits at the origin with y pointing up, so a hanging pendulum has
/// negative y. `v2` combines both link velocities with the law of cosines.
/// The returned point has `time = 0.0`; the caller stamps it.
pub fn to_cartesian(l1: f64, l2: f64, p1: f64, p2: f64, o1: f64, o2: f64) -> TrajectoryPoint {
    let x1 = l1 * p1.sin();
    let y1 = -l1 * p1.cos();
    let x2 = x1 + l2 * p2.sin();
    let y2 = y1 - l2 * p2.cos();

    let v1 = (o1 * l1).abs();
    let v2 = ((l1 * o1).powi(2) + (l2 * o2).powi(2) + 2.0 * l1 * l2 * o1 * o2 * (p1 - p2).cos()).sqrt();

    TrajectoryPoint {
        time: 0.0,
        x1,
        y1,
        x2,
        y2,
        v1,
        v2,
        phi1: p1,
        phi2: p2,
        omega1: o1,
        omega2: o2,
    }
}

impl SystemParameters {
    /// (d(omega1)/dt, d(omega2)/dt) at the given state
    pub fn accelerations(&self, s: &State) -> (f64, f64) {
        let Self { l1, l2, m1, m2 } = *self;
        (
            angular_accel1(l1, l2, m1, m2, s.phi1, s.phi2, s.omega1, s.omega2),
            angular_accel2(l1, l2, m1, m2, s.phi1, s.phi2, s.omega1, s.omega2),
        )
    }

    /// Snapshot of `s` in Cartesian form (time unset)
    pub fn to_cartesian(&self, s: &State) -> TrajectoryPoint {
        to_cartesian(self.l1, self.l2, s.phi1, s.phi2, s.omega1, s.omega2)
    }

    /// Total mechanical energy (kinetic + potential) of a snapshot.
    ///
    /// Potential is measured from the pivot height, so it is negative for a
    /// hanging pendulum. Fixed-step RK4 does not conserve this exactly; it is
    /// a drift diagnostic, not an invariant.
    pub fn total_energy(&self, p: &TrajectoryPoint) -> f64 {
        let kinetic = 0.5 * self.m1 * p.v1 * p.v1 + 0.5 * self.m2 * p.v2 * p.v2;
        let potential = G * (self.m1 * p.bob1().y + self.m2 * p.bob2().y);
        kinetic + potential
    }
}

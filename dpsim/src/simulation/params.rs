//! Numerical and physical parameters for the simulation
//!
//! `SystemParameters` holds the pendulum itself:
//! - arm lengths and point masses,
//! - the gravitational constant is the fixed [`G`]
//!
//! `Parameters` holds runtime settings:
//! - end time of the run,
//! - fixed integration step size

/// Gravitational acceleration used by the equations of motion
pub const G: f64 = 9.81;

/// Physical description of one double pendulum.
///
/// Lengths and masses must be strictly positive for the model to make sense.
/// Nothing in the simulation core checks this; see
/// [`crate::configuration::config::ScenarioConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemParameters {
    pub l1: f64, // upper arm length
    pub l2: f64, // lower arm length
    pub m1: f64, // upper bob mass
    pub m2: f64, // lower bob mass
}

impl SystemParameters {
    pub fn new(l1: f64, l2: f64, m1: f64, m2: f64) -> Self {
        Self { l1, l2, m1, m2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub t_end: f64, // time end
    pub h0: f64, // step size
}

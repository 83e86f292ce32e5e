//! Core state types for the double pendulum simulation.
//!
//! Defines:
//! - `State`           the 4-variable angular state advanced by the integrator
//! - `TrajectoryPoint` a read-only snapshot (Cartesian + angular) per step
//! - `AngleChannel`    which angle a flip analysis traces
//!
//! Angles are in radians and never wrapped, so a full rotation shows up as
//! the angle growing past an odd multiple of pi.

use nalgebra::Vector2;
use serde::Serialize;

pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub phi1: f64, // angle of the upper arm
    pub phi2: f64, // angle of the lower arm
    pub omega1: f64, // angular velocity of the upper arm
    pub omega2: f64, // angular velocity of the lower arm
}

impl State {
    pub fn new(phi1: f64, phi2: f64, omega1: f64, omega2: f64) -> Self {
        Self { phi1, phi2, omega1, omega2 }
    }

    /// Read the selected angle
    pub fn angle(&self, channel: AngleChannel) -> f64 {
        match channel {
            AngleChannel::Phi1 => self.phi1,
            AngleChannel::Phi2 => self.phi2,
        }
    }
}

/// Snapshot of one integration step.
///
/// Field order matches the trajectory table columns
/// `time,x1,y1,x2,y2,v1,v2,phi1,phi2,omega1,omega2`, so the struct can be
/// handed to a `csv::Writer` directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub time: f64,
    pub x1: f64, // upper bob position
    pub y1: f64,
    pub x2: f64, // lower bob position
    pub y2: f64,
    pub v1: f64, // upper bob speed
    pub v2: f64, // lower bob speed
    pub phi1: f64,
    pub phi2: f64,
    pub omega1: f64,
    pub omega2: f64,
}

impl TrajectoryPoint {
    pub fn bob1(&self) -> NVec2 {
        NVec2::new(self.x1, self.y1)
    }

    pub fn bob2(&self) -> NVec2 {
        NVec2::new(self.x2, self.y2)
    }

    /// Angular part of the snapshot
    pub fn state(&self) -> State {
        State::new(self.phi1, self.phi2, self.omega1, self.omega2)
    }

    /// false if any recorded value is NaN or infinite
    pub fn is_finite(&self) -> bool {
        [
            self.time, self.x1, self.y1, self.x2, self.y2, self.v1, self.v2,
            self.phi1, self.phi2, self.omega1, self.omega2,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Which of the two angles is traced when only one is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleChannel {
    Phi1,
    Phi2,
}

impl AngleChannel {
    pub fn from_use_phi1(use_phi1: bool) -> Self {
        if use_phi1 { AngleChannel::Phi1 } else { AngleChannel::Phi2 }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AngleChannel::Phi1 => "phi1",
            AngleChannel::Phi2 => "phi2",
        }
    }
}

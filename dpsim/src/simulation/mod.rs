pub mod states;
pub mod params;
pub mod physics;
pub mod integrator;
pub mod scenario;

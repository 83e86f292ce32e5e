pub mod flip;
pub mod grid;

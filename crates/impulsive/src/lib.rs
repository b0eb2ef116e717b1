//! Impulsive transfer utilities: Lambert arcs connecting two positions in a given time.

pub mod lambert;

pub use lambert::{LambertSolverError, solve as lambert_solve, solve_prograde};

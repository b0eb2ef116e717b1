//! Multi-leg transfer trajectory planning.
//!
//! Umbrella library over the workspace crates so front-ends (CLI, tests,
//! notebooks) depend on a single library.

pub use mga_config as config;
pub use mga_core::{constants, state, time, vector};
pub use mga_ephemeris as ephemeris;
pub use mga_export as export;
pub use mga_impulsive as impulsive;
pub use mga_orbits as orbits;
pub use mga_transfer as transfer;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

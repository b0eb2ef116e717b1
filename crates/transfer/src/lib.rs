//! Transfer trajectory crate: multi-leg assembly, evaluation and sampling, plus
//! the bridge from configuration records.

pub mod trajectory;

pub use facade::*;
pub use trajectory::parameters::{
    ElementIndex, ParameterDefinition, format_parameter_definitions, parameter_definitions,
    print_parameter_definitions,
};
pub use trajectory::settings::{
    DEFAULT_MINIMUM_PERICENTERS, LegSettings, NodeSettings, OrbitConstraint, capture_node,
    departure_node, dsm_position_based_leg, dsm_velocity_based_leg, mga_settings_dsm_position_based_legs,
    mga_settings_dsm_velocity_based_legs, mga_settings_unpowered_unperturbed_legs,
    mga_transfer_settings, swingby_node, unpowered_leg,
};
pub use trajectory::{Evaluation, TransferError, TransferTrajectory, create_transfer_trajectory};

pub use mga_impulsive as impulsive;
pub use mga_orbits as orbits;

mod facade;

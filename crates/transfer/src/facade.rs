//! Bridges configuration records to runtime bodies, settings and trajectories.

use log::debug;
use mga_config::{
    BodyConfig, LegTypeConfig, NodeConfig, OrbitConstraintConfig, SequenceConfig, TrajectoryConfig,
};
use mga_core::time::days_to_seconds;
use mga_ephemeris::{Body, KeplerEphemeris, SystemOfBodies};
use mga_orbits::KeplerianElements;

use crate::trajectory::settings::{
    LegSettings, NodeSettings, OrbitConstraint, capture_node, departure_node,
    mga_transfer_settings, swingby_node,
};
use crate::trajectory::{TransferError, TransferTrajectory, create_transfer_trajectory};

impl From<LegTypeConfig> for LegSettings {
    fn from(config: LegTypeConfig) -> Self {
        match config {
            LegTypeConfig::Unpowered => LegSettings::UnpoweredUnperturbed,
            LegTypeConfig::DsmPositionBased => LegSettings::DsmPositionBased,
            LegTypeConfig::DsmVelocityBased => LegSettings::DsmVelocityBased,
        }
    }
}

impl From<OrbitConstraintConfig> for OrbitConstraint {
    fn from(config: OrbitConstraintConfig) -> Self {
        OrbitConstraint::new(config.semi_major_axis_km, config.eccentricity)
    }
}

impl From<&NodeConfig> for NodeSettings {
    fn from(config: &NodeConfig) -> Self {
        match config {
            NodeConfig::Departure { orbit } => departure_node(orbit.map(Into::into)),
            NodeConfig::Swingby {
                minimum_periapsis_km,
            } => swingby_node(*minimum_periapsis_km),
            NodeConfig::Capture { orbit } => capture_node(orbit.map(Into::into)),
        }
    }
}

/// Build a system of bodies from catalog entries.
///
/// Bodies with an `orbit` block get a two-body ephemeris about their parent,
/// which must itself be listed with a gravitational parameter.
pub fn bodies_from_config(configs: &[BodyConfig]) -> Result<SystemOfBodies, TransferError> {
    let mut bodies = SystemOfBodies::new();
    for config in configs {
        let mut body = Body::new(config.name.clone());
        if let Some(mu) = config.mu_km3_s2 {
            body = body.with_gravitational_parameter(mu);
        }
        if let Some(radius) = config.radius_km {
            body = body.with_radius(radius);
        }
        if let Some(orbit) = &config.orbit {
            let parent_mu = configs
                .iter()
                .find(|candidate| candidate.name.eq_ignore_ascii_case(&orbit.central_body))
                .and_then(|parent| parent.mu_km3_s2)
                .ok_or_else(|| TransferError::MissingEnvironmentData {
                    body: orbit.central_body.clone(),
                    detail: format!(
                        "needed as the parent of `{}` but not listed with a gravitational parameter",
                        config.name
                    ),
                })?;
            let elements = KeplerianElements {
                semi_major_axis_km: orbit.semi_major_axis_km,
                eccentricity: orbit.eccentricity,
                inclination: orbit.inclination_deg.to_radians(),
                raan: orbit.raan_deg.to_radians(),
                argument_of_periapsis: orbit.argument_of_periapsis_deg.to_radians(),
                true_anomaly: orbit.true_anomaly_deg.to_radians(),
            };
            let ephemeris = KeplerEphemeris::from_elements(
                days_to_seconds(orbit.reference_epoch_days),
                &elements,
                parent_mu,
            )
            .map_err(|err| {
                TransferError::Configuration(format!("orbit of `{}`: {err}", config.name))
            })?;
            body = body.with_ephemeris(ephemeris);
        }
        bodies.add(body);
    }
    debug!("built system of {} bodies", bodies.len());
    Ok(bodies)
}

/// Leg and node settings declared by a trajectory description.
pub fn settings_from_config(config: &TrajectoryConfig) -> (Vec<LegSettings>, Vec<NodeSettings>) {
    match &config.sequence {
        SequenceConfig::Mga {
            leg_type,
            departure_orbit,
            arrival_orbit,
            minimum_pericenters_km,
        } => mga_transfer_settings(
            config.body_order.as_slice(),
            (*leg_type).into(),
            departure_orbit.map(Into::into),
            arrival_orbit.map(Into::into),
            minimum_pericenters_km,
        ),
        SequenceConfig::Explicit { legs, nodes } => (
            legs.iter().copied().map(Into::into).collect(),
            nodes.iter().map(Into::into).collect(),
        ),
    }
}

/// Assemble the trajectory a description declares.
pub fn trajectory_from_config(
    bodies: &SystemOfBodies,
    config: &TrajectoryConfig,
) -> Result<TransferTrajectory, TransferError> {
    let (legs, nodes) = settings_from_config(config);
    create_transfer_trajectory(
        bodies,
        &legs,
        &nodes,
        config.body_order.as_slice(),
        &config.central_body,
    )
}

/// Evaluate `trajectory` with the epochs (days) and parameters of a description.
pub fn evaluate_from_config(
    trajectory: &mut TransferTrajectory,
    config: &TrajectoryConfig,
) -> Result<(), TransferError> {
    let node_times: Vec<f64> = config
        .node_times_days
        .iter()
        .copied()
        .map(days_to_seconds)
        .collect();
    trajectory.evaluate(
        &node_times,
        &config.leg_parameters_or_empty(),
        &config.node_parameters_or_empty(),
    )
}

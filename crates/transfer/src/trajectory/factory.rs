//! Turns leg and node settings into evaluable models bound to the body catalog.

use log::{debug, warn};
use mga_ephemeris::{Body, EphemerisError, SystemOfBodies};
use mga_orbits::validate_bound_orbit;

use super::TransferError;
use super::legs::TransferLeg;
use super::nodes::{NodeVariant, ParkingOrbit, SwingbyBody, TransferNode};
use super::settings::{LegSettings, NodeSettings, OrbitConstraint, default_minimum_pericenter};

/// Node variant implied by the node's position in the sequence and the
/// kinematics of its outgoing leg.
pub fn node_variant(
    index: usize,
    node_count: usize,
    settings: &NodeSettings,
    outgoing_leg: Option<LegSettings>,
) -> Result<NodeVariant, TransferError> {
    let last = node_count.saturating_sub(1);
    let free_outgoing = outgoing_leg.is_some_and(|leg| leg.needs_node_velocity());
    match settings {
        NodeSettings::EscapeAndDeparture { .. } if index == 0 && index != last => {
            Ok(if free_outgoing {
                NodeVariant::DepartureWithFreeOutgoingVelocity
            } else {
                NodeVariant::DepartureWithFixedOutgoingVelocity
            })
        }
        NodeSettings::Swingby { .. } if index > 0 && index < last => Ok(if free_outgoing {
            NodeVariant::SwingbyWithFreeOutgoingVelocity
        } else {
            NodeVariant::SwingbyWithFixedOutgoingVelocity
        }),
        NodeSettings::CaptureAndInsertion { .. } if index == last && index != 0 => {
            Ok(NodeVariant::CaptureAndInsertion)
        }
        other => Err(TransferError::Configuration(format!(
            "{other} node cannot be placed at position {index} of {node_count}"
        ))),
    }
}

fn lookup<'a>(bodies: &'a SystemOfBodies, name: &str) -> Result<&'a Body, TransferError> {
    bodies.get(name).map_err(|err| environment_error(name, err))
}

fn environment_error(body: &str, err: EphemerisError) -> TransferError {
    let detail = match err {
        EphemerisError::UnknownBody(_) => "body is not registered".to_string(),
        EphemerisError::MissingEphemeris(_) => "body has no ephemeris".to_string(),
        other => other.to_string(),
    };
    TransferError::MissingEnvironmentData {
        body: body.to_string(),
        detail,
    }
}

fn gravitational_parameter(body: &Body) -> Result<f64, TransferError> {
    body.gravitational_parameter_km3_s2
        .ok_or_else(|| TransferError::MissingEnvironmentData {
            body: body.name.clone(),
            detail: "gravitational parameter is not set".to_string(),
        })
}

fn parking_orbit(
    body: &Body,
    constraint: Option<OrbitConstraint>,
) -> Result<Option<ParkingOrbit>, TransferError> {
    constraint
        .map(|constraint| {
            validate_bound_orbit(constraint.semi_major_axis_km, constraint.eccentricity).map_err(
                |err| {
                    TransferError::Configuration(format!("parking orbit at `{}`: {err}", body.name))
                },
            )?;
            Ok(ParkingOrbit {
                constraint,
                mu_km3_s2: gravitational_parameter(body)?,
            })
        })
        .transpose()
}

/// Minimum swingby periapsis: explicit override, then the default table, then
/// the body's physical radius.
pub fn resolve_minimum_periapsis(
    body: &Body,
    explicit_km: Option<f64>,
) -> Result<f64, TransferError> {
    if let Some(radius) = explicit_km {
        if !(radius >= 0.0) || !radius.is_finite() {
            return Err(TransferError::Configuration(format!(
                "minimum periapsis for `{}` must be finite and non-negative, got {radius}",
                body.name
            )));
        }
        return Ok(radius);
    }
    if let Some(radius) = default_minimum_pericenter(&body.name) {
        debug!(
            "using default minimum periapsis {radius} km for `{}`",
            body.name
        );
        return Ok(radius);
    }
    if let Some(radius) = body.radius_km {
        warn!(
            "no minimum periapsis for `{}`; falling back to its radius {radius} km",
            body.name
        );
        return Ok(radius);
    }
    Err(TransferError::MissingEnvironmentData {
        body: body.name.clone(),
        detail: "no minimum periapsis, default entry or physical radius".to_string(),
    })
}

/// Build one leg between `departure` and `arrival` about `central_body`.
pub fn create_leg(
    bodies: &SystemOfBodies,
    settings: LegSettings,
    departure: &str,
    arrival: &str,
    central_body: &str,
) -> Result<TransferLeg, TransferError> {
    let central_mu = gravitational_parameter(lookup(bodies, central_body)?)?;
    let departure_body = lookup(bodies, departure)?;
    let arrival_body = lookup(bodies, arrival)?;
    Ok(TransferLeg::new(
        settings,
        departure_body.name.clone(),
        arrival_body.name.clone(),
        departure_body
            .ephemeris()
            .map_err(|err| environment_error(departure, err))?,
        arrival_body
            .ephemeris()
            .map_err(|err| environment_error(arrival, err))?,
        central_mu,
    ))
}

/// Build the node at `index`, choosing its variant from its outgoing leg.
pub fn create_node(
    bodies: &SystemOfBodies,
    index: usize,
    node_count: usize,
    settings: &NodeSettings,
    body_name: &str,
    outgoing_leg: Option<LegSettings>,
) -> Result<TransferNode, TransferError> {
    let variant = node_variant(index, node_count, settings, outgoing_leg)?;
    let body = lookup(bodies, body_name)?;
    let ephemeris = body
        .ephemeris()
        .map_err(|err| environment_error(body_name, err))?;
    let free_outgoing = variant.has_free_outgoing_velocity();

    let node = match *settings {
        NodeSettings::EscapeAndDeparture { departure_orbit } => TransferNode::departure(
            body.name.clone(),
            ephemeris,
            parking_orbit(body, departure_orbit)?,
            free_outgoing,
        ),
        NodeSettings::Swingby {
            minimum_periapsis_km,
        } => TransferNode::swingby(
            body.name.clone(),
            ephemeris,
            SwingbyBody {
                mu_km3_s2: gravitational_parameter(body)?,
                minimum_periapsis_km: resolve_minimum_periapsis(body, minimum_periapsis_km)?,
            },
            free_outgoing,
        ),
        NodeSettings::CaptureAndInsertion { capture_orbit } => TransferNode::capture(
            body.name.clone(),
            ephemeris,
            parking_orbit(body, capture_orbit)?,
        ),
    };
    debug!("node {index} at `{}`: {}", node.body(), node.variant());
    Ok(node)
}

/// Build every leg and node of a transfer.
pub fn create_legs_and_nodes(
    bodies: &SystemOfBodies,
    body_order: &[String],
    central_body: &str,
    leg_settings: &[LegSettings],
    node_settings: &[NodeSettings],
) -> Result<(Vec<TransferLeg>, Vec<TransferNode>), TransferError> {
    let legs = leg_settings
        .iter()
        .enumerate()
        .map(|(index, settings)| {
            create_leg(
                bodies,
                *settings,
                &body_order[index],
                &body_order[index + 1],
                central_body,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let nodes = node_settings
        .iter()
        .enumerate()
        .map(|(index, settings)| {
            create_node(
                bodies,
                index,
                node_settings.len(),
                settings,
                &body_order[index],
                leg_settings.get(index).copied(),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((legs, nodes))
}

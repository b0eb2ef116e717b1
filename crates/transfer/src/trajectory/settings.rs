//! Declarative leg and node settings.
//!
//! Settings carry no state and perform no computation; the factory turns them
//! into evaluable models once the bodies are known.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum swingby periapsis radii (km) used when a node gives no override.
pub const DEFAULT_MINIMUM_PERICENTERS: [(&str, f64); 8] = [
    ("Mercury", 2_639.7),
    ("Venus", 6_251.8),
    ("Earth", 6_578.1),
    ("Mars", 3_596.2),
    ("Jupiter", 72_000.0),
    ("Saturn", 61_000.0),
    ("Uranus", 26_000.0),
    ("Neptune", 25_000.0),
];

/// Default minimum periapsis for `body`, matched case-insensitively.
pub fn default_minimum_pericenter(body: &str) -> Option<f64> {
    DEFAULT_MINIMUM_PERICENTERS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(body))
        .map(|(_, radius)| *radius)
}

/// Kinematics model of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegSettings {
    /// Ballistic two-body arc from a Lambert solution.
    UnpoweredUnperturbed,
    /// Two Lambert arcs joined by a manoeuvre at a parameterised position.
    DsmPositionBased,
    /// Propagated departure arc and a Lambert arc joined by a manoeuvre.
    DsmVelocityBased,
}

impl LegSettings {
    /// Whether the departure velocity of this leg is supplied by the departure node.
    pub fn needs_node_velocity(&self) -> bool {
        matches!(self, LegSettings::DsmVelocityBased)
    }

    pub fn name(&self) -> &'static str {
        match self {
            LegSettings::UnpoweredUnperturbed => "unpowered unperturbed",
            LegSettings::DsmPositionBased => "DSM position based",
            LegSettings::DsmVelocityBased => "DSM velocity based",
        }
    }
}

impl fmt::Display for LegSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bound orbit imposed at a departure or capture node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitConstraint {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
}

impl OrbitConstraint {
    pub fn new(semi_major_axis_km: f64, eccentricity: f64) -> Self {
        Self {
            semi_major_axis_km,
            eccentricity,
        }
    }
}

/// Event model of a node.
///
/// A `None` orbit places the departure or arrival at the edge of the sphere
/// of influence; a `None` minimum periapsis defers to the default table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeSettings {
    EscapeAndDeparture {
        departure_orbit: Option<OrbitConstraint>,
    },
    Swingby {
        minimum_periapsis_km: Option<f64>,
    },
    CaptureAndInsertion {
        capture_orbit: Option<OrbitConstraint>,
    },
}

impl NodeSettings {
    pub fn name(&self) -> &'static str {
        match self {
            NodeSettings::EscapeAndDeparture { .. } => "escape and departure",
            NodeSettings::Swingby { .. } => "swingby",
            NodeSettings::CaptureAndInsertion { .. } => "capture and insertion",
        }
    }
}

impl fmt::Display for NodeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn unpowered_leg() -> LegSettings {
    LegSettings::UnpoweredUnperturbed
}

pub fn dsm_position_based_leg() -> LegSettings {
    LegSettings::DsmPositionBased
}

pub fn dsm_velocity_based_leg() -> LegSettings {
    LegSettings::DsmVelocityBased
}

pub fn departure_node(departure_orbit: Option<OrbitConstraint>) -> NodeSettings {
    NodeSettings::EscapeAndDeparture { departure_orbit }
}

pub fn swingby_node(minimum_periapsis_km: Option<f64>) -> NodeSettings {
    NodeSettings::Swingby {
        minimum_periapsis_km,
    }
}

pub fn capture_node(capture_orbit: Option<OrbitConstraint>) -> NodeSettings {
    NodeSettings::CaptureAndInsertion { capture_orbit }
}

/// Settings for a multiple gravity-assist chain along `body_order`: departure
/// at the first body, swingbys at every intermediate body, capture at the last,
/// and `leg_type` for every leg.
///
/// Swingby minimum periapsis radii are taken from `minimum_pericenters` when the
/// body appears there (case-insensitive); otherwise left to the default table.
pub fn mga_transfer_settings(
    body_order: &[impl AsRef<str>],
    leg_type: LegSettings,
    departure_orbit: Option<OrbitConstraint>,
    arrival_orbit: Option<OrbitConstraint>,
    minimum_pericenters: &BTreeMap<String, f64>,
) -> (Vec<LegSettings>, Vec<NodeSettings>) {
    let count = body_order.len();
    let legs = vec![leg_type; count.saturating_sub(1)];
    let nodes = body_order
        .iter()
        .enumerate()
        .map(|(index, body)| {
            if index == 0 {
                departure_node(departure_orbit)
            } else if index + 1 == count {
                capture_node(arrival_orbit)
            } else {
                let override_radius = minimum_pericenters
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(body.as_ref()))
                    .map(|(_, radius)| *radius);
                swingby_node(override_radius)
            }
        })
        .collect();
    (legs, nodes)
}

pub fn mga_settings_unpowered_unperturbed_legs(
    body_order: &[impl AsRef<str>],
    departure_orbit: Option<OrbitConstraint>,
    arrival_orbit: Option<OrbitConstraint>,
    minimum_pericenters: &BTreeMap<String, f64>,
) -> (Vec<LegSettings>, Vec<NodeSettings>) {
    mga_transfer_settings(
        body_order,
        unpowered_leg(),
        departure_orbit,
        arrival_orbit,
        minimum_pericenters,
    )
}

pub fn mga_settings_dsm_position_based_legs(
    body_order: &[impl AsRef<str>],
    departure_orbit: Option<OrbitConstraint>,
    arrival_orbit: Option<OrbitConstraint>,
    minimum_pericenters: &BTreeMap<String, f64>,
) -> (Vec<LegSettings>, Vec<NodeSettings>) {
    mga_transfer_settings(
        body_order,
        dsm_position_based_leg(),
        departure_orbit,
        arrival_orbit,
        minimum_pericenters,
    )
}

pub fn mga_settings_dsm_velocity_based_legs(
    body_order: &[impl AsRef<str>],
    departure_orbit: Option<OrbitConstraint>,
    arrival_orbit: Option<OrbitConstraint>,
    minimum_pericenters: &BTreeMap<String, f64>,
) -> (Vec<LegSettings>, Vec<NodeSettings>) {
    mga_transfer_settings(
        body_order,
        dsm_velocity_based_leg(),
        departure_orbit,
        arrival_orbit,
        minimum_pericenters,
    )
}

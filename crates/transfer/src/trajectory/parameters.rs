//! Free-parameter layouts of every leg and node variant.

use std::fmt;

use serde::Serialize;

use super::TransferError;
use super::factory::node_variant;
use super::nodes::NodeVariant;
use super::settings::{LegSettings, NodeSettings};

/// Ordered parameter names for a leg model.
pub fn leg_parameter_names(settings: LegSettings) -> &'static [&'static str] {
    match settings {
        LegSettings::UnpoweredUnperturbed => &[],
        LegSettings::DsmPositionBased => &[
            "DSM time-of-flight fraction (-)",
            "DSM dimensionless radius (-)",
            "DSM in-plane angle (rad)",
            "DSM out-of-plane angle (rad)",
        ],
        LegSettings::DsmVelocityBased => &["DSM time-of-flight fraction (-)"],
    }
}

/// Ordered parameter names for a node variant.
pub fn node_parameter_names(variant: NodeVariant) -> &'static [&'static str] {
    match variant {
        NodeVariant::DepartureWithFreeOutgoingVelocity => &[
            "excess velocity magnitude (km/s)",
            "excess velocity in-plane angle (rad)",
            "excess velocity out-of-plane angle (rad)",
        ],
        NodeVariant::SwingbyWithFreeOutgoingVelocity => &[
            "periapsis radius (km)",
            "rotation angle (rad)",
            "periapsis delta-v (km/s)",
        ],
        NodeVariant::DepartureWithFixedOutgoingVelocity
        | NodeVariant::SwingbyWithFixedOutgoingVelocity
        | NodeVariant::CaptureAndInsertion => &[],
    }
}

/// Which element of the trajectory a parameter block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "element", content = "index", rename_all = "snake_case")]
pub enum ElementIndex {
    Node(usize),
    Leg(usize),
}

impl fmt::Display for ElementIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementIndex::Node(index) => write!(f, "node {index}"),
            ElementIndex::Leg(index) => write!(f, "leg {index}"),
        }
    }
}

/// Free-parameter block of one node or leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDefinition {
    pub element: ElementIndex,
    pub model: String,
    pub parameters: Vec<&'static str>,
}

/// Parameter blocks in evaluation order: node 0, leg 0, node 1, leg 1, ...
pub fn parameter_definitions(
    leg_settings: &[LegSettings],
    node_settings: &[NodeSettings],
) -> Result<Vec<ParameterDefinition>, TransferError> {
    super::check_structure(leg_settings, node_settings)?;

    let node_count = node_settings.len();
    let mut definitions = Vec::with_capacity(node_count + leg_settings.len());
    for (index, settings) in node_settings.iter().enumerate() {
        let variant = node_variant(index, node_count, settings, leg_settings.get(index).copied())?;
        definitions.push(ParameterDefinition {
            element: ElementIndex::Node(index),
            model: variant.name().to_string(),
            parameters: node_parameter_names(variant).to_vec(),
        });
        if let Some(leg) = leg_settings.get(index) {
            definitions.push(ParameterDefinition {
                element: ElementIndex::Leg(index),
                model: leg.name().to_string(),
                parameters: leg_parameter_names(*leg).to_vec(),
            });
        }
    }
    Ok(definitions)
}

/// Render the parameter layout as human-readable text.
pub fn format_parameter_definitions(definitions: &[ParameterDefinition]) -> String {
    let mut out = String::new();
    for definition in definitions {
        out.push_str(&format!("{} ({}):", definition.element, definition.model));
        if definition.parameters.is_empty() {
            out.push_str(" no free parameters\n");
            continue;
        }
        out.push('\n');
        for (slot, name) in definition.parameters.iter().enumerate() {
            out.push_str(&format!("  [{slot}] {name}\n"));
        }
    }
    out
}

/// Print the parameter layout of a settings sequence to stdout.
pub fn print_parameter_definitions(
    leg_settings: &[LegSettings],
    node_settings: &[NodeSettings],
) -> Result<(), TransferError> {
    let definitions = parameter_definitions(leg_settings, node_settings)?;
    print!("{}", format_parameter_definitions(&definitions));
    Ok(())
}

//! Node models: events at the bodies of the sequence.

use std::fmt;
use std::sync::Arc;

use mga_core::state::StateVector;
use mga_core::vector::{self, Vector3, cross, norm, normalize};
use mga_ephemeris::Ephemeris;
use mga_orbits::{
    OrbitError, bending_angle, escape_or_capture_delta_v, gravity_assist_outgoing_velocity,
    powered_swingby_delta_v, powered_swingby_periapsis,
};
use thiserror::Error;

use super::parameters::node_parameter_names;
use super::settings::OrbitConstraint;

/// Failures local to one node evaluation.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("{0}")]
    Infeasible(String),
    #[error("invalid free parameter: {0}")]
    InvalidParameter(String),
    #[error("two-body geometry failed: {0}")]
    Orbit(#[from] OrbitError),
    #[error("{0} velocity was not supplied to the node")]
    MissingVelocity(&'static str),
}

/// Concrete node variant, fixed by the node's position and its outgoing leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeVariant {
    DepartureWithFixedOutgoingVelocity,
    DepartureWithFreeOutgoingVelocity,
    SwingbyWithFixedOutgoingVelocity,
    SwingbyWithFreeOutgoingVelocity,
    CaptureAndInsertion,
}

impl NodeVariant {
    /// Whether the node computes the outgoing velocity from its own parameters.
    pub fn has_free_outgoing_velocity(&self) -> bool {
        matches!(
            self,
            NodeVariant::DepartureWithFreeOutgoingVelocity
                | NodeVariant::SwingbyWithFreeOutgoingVelocity
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeVariant::DepartureWithFixedOutgoingVelocity => {
                "departure with fixed outgoing velocity"
            }
            NodeVariant::DepartureWithFreeOutgoingVelocity => {
                "departure with free outgoing velocity"
            }
            NodeVariant::SwingbyWithFixedOutgoingVelocity => "swingby with fixed outgoing velocity",
            NodeVariant::SwingbyWithFreeOutgoingVelocity => "swingby with free outgoing velocity",
            NodeVariant::CaptureAndInsertion => "capture and insertion",
        }
    }
}

impl fmt::Display for NodeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parking orbit together with the gravitational parameter of the body it circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParkingOrbit {
    pub constraint: OrbitConstraint,
    pub mu_km3_s2: f64,
}

impl ParkingOrbit {
    fn delta_v(&self, vinf_km_s: f64) -> Result<f64, OrbitError> {
        escape_or_capture_delta_v(
            self.mu_km3_s2,
            self.constraint.semi_major_axis_km,
            self.constraint.eccentricity,
            vinf_km_s,
        )
    }
}

/// Escape (or capture) cost for an optional parking orbit: the excess speed
/// itself when the event happens at the sphere of influence.
fn fixed_parameters<const N: usize>(parameters: &[f64]) -> Result<[f64; N], NodeError> {
    <[f64; N]>::try_from(parameters).map_err(|_| {
        NodeError::InvalidParameter(format!(
            "expected {N} free parameters, got {}",
            parameters.len()
        ))
    })
}

fn parking_delta_v(parking: Option<&ParkingOrbit>, vinf_km_s: f64) -> Result<f64, OrbitError> {
    match parking {
        Some(orbit) => orbit.delta_v(vinf_km_s),
        None => Ok(vinf_km_s),
    }
}

/// Outcome of one node evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSolution {
    pub delta_v_km_s: f64,
    /// Velocity handed to the outgoing leg; only set by free-outgoing variants.
    pub outgoing_velocity_km_s: Option<Vector3>,
    /// Swingby periapsis radius flown, when the node is a swingby.
    pub periapsis_km: Option<f64>,
}

/// Evaluable node bound to its body.
#[derive(Debug, Clone)]
pub struct TransferNode {
    variant: NodeVariant,
    body: String,
    ephemeris: Arc<dyn Ephemeris>,
    parking: Option<ParkingOrbit>,
    swingby: Option<SwingbyBody>,
}

/// Body data a swingby needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingbyBody {
    pub mu_km3_s2: f64,
    pub minimum_periapsis_km: f64,
}

impl TransferNode {
    pub(crate) fn departure(
        body: String,
        ephemeris: Arc<dyn Ephemeris>,
        parking: Option<ParkingOrbit>,
        free_outgoing_velocity: bool,
    ) -> Self {
        let variant = if free_outgoing_velocity {
            NodeVariant::DepartureWithFreeOutgoingVelocity
        } else {
            NodeVariant::DepartureWithFixedOutgoingVelocity
        };
        Self {
            variant,
            body,
            ephemeris,
            parking,
            swingby: None,
        }
    }

    pub(crate) fn swingby(
        body: String,
        ephemeris: Arc<dyn Ephemeris>,
        swingby: SwingbyBody,
        free_outgoing_velocity: bool,
    ) -> Self {
        let variant = if free_outgoing_velocity {
            NodeVariant::SwingbyWithFreeOutgoingVelocity
        } else {
            NodeVariant::SwingbyWithFixedOutgoingVelocity
        };
        Self {
            variant,
            body,
            ephemeris,
            parking: None,
            swingby: Some(swingby),
        }
    }

    pub(crate) fn capture(
        body: String,
        ephemeris: Arc<dyn Ephemeris>,
        parking: Option<ParkingOrbit>,
    ) -> Self {
        Self {
            variant: NodeVariant::CaptureAndInsertion,
            body,
            ephemeris,
            parking,
            swingby: None,
        }
    }

    pub fn variant(&self) -> NodeVariant {
        self.variant
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn parking_orbit(&self) -> Option<&ParkingOrbit> {
        self.parking.as_ref()
    }

    /// Minimum periapsis radius enforced at a swingby node.
    pub fn minimum_periapsis_km(&self) -> Option<f64> {
        self.swingby.map(|swingby| swingby.minimum_periapsis_km)
    }

    pub fn ephemeris(&self) -> &dyn Ephemeris {
        self.ephemeris.as_ref()
    }

    pub fn parameter_count(&self) -> usize {
        node_parameter_names(self.variant).len()
    }

    /// Evaluate the node event.
    ///
    /// `incoming` is the spacecraft velocity at the end of the previous leg and
    /// `outgoing` the velocity at the start of the next one, both relative to
    /// the central body. Free-outgoing variants ignore `outgoing` and compute it.
    pub fn evaluate(
        &self,
        body_state: &StateVector,
        incoming: Option<&Vector3>,
        outgoing: Option<&Vector3>,
        parameters: &[f64],
    ) -> Result<NodeSolution, NodeError> {
        match self.variant {
            NodeVariant::DepartureWithFixedOutgoingVelocity => {
                let outgoing = outgoing.ok_or(NodeError::MissingVelocity("outgoing"))?;
                let vinf = norm(&vector::sub(outgoing, &body_state.velocity_km_s));
                Ok(NodeSolution {
                    delta_v_km_s: parking_delta_v(self.parking.as_ref(), vinf)?,
                    outgoing_velocity_km_s: None,
                    periapsis_km: None,
                })
            }
            NodeVariant::DepartureWithFreeOutgoingVelocity => {
                self.free_departure(body_state, parameters)
            }
            NodeVariant::SwingbyWithFixedOutgoingVelocity => {
                let incoming = incoming.ok_or(NodeError::MissingVelocity("incoming"))?;
                let outgoing = outgoing.ok_or(NodeError::MissingVelocity("outgoing"))?;
                self.fixed_swingby(body_state, incoming, outgoing)
            }
            NodeVariant::SwingbyWithFreeOutgoingVelocity => {
                let incoming = incoming.ok_or(NodeError::MissingVelocity("incoming"))?;
                self.free_swingby(body_state, incoming, parameters)
            }
            NodeVariant::CaptureAndInsertion => {
                let incoming = incoming.ok_or(NodeError::MissingVelocity("incoming"))?;
                let vinf = norm(&vector::sub(incoming, &body_state.velocity_km_s));
                Ok(NodeSolution {
                    delta_v_km_s: parking_delta_v(self.parking.as_ref(), vinf)?,
                    outgoing_velocity_km_s: None,
                    periapsis_km: None,
                })
            }
        }
    }

    fn free_departure(
        &self,
        body_state: &StateVector,
        parameters: &[f64],
    ) -> Result<NodeSolution, NodeError> {
        let [vinf, in_plane, out_of_plane] = fixed_parameters(parameters)?;
        if !(vinf >= 0.0) || !vinf.is_finite() {
            return Err(NodeError::InvalidParameter(format!(
                "excess speed must be non-negative, got {vinf}"
            )));
        }

        // u1 along the body velocity, u3 along the orbit normal.
        let u1 = normalize(&body_state.velocity_km_s)
            .ok_or(OrbitError::DegenerateGeometry("departure body is at rest"))?;
        let u3 = normalize(&cross(&body_state.position_km, &body_state.velocity_km_s)).ok_or(
            OrbitError::DegenerateGeometry("departure body has no angular momentum"),
        )?;
        let u2 = cross(&u3, &u1);

        let (sin_a, cos_a) = in_plane.sin_cos();
        let (sin_b, cos_b) = out_of_plane.sin_cos();
        let vinf_vector = vector::scale(
            &vector::combine(cos_a * cos_b, &u1, sin_a * cos_b, &u2, sin_b, &u3),
            vinf,
        );

        Ok(NodeSolution {
            delta_v_km_s: parking_delta_v(self.parking.as_ref(), vinf)?,
            outgoing_velocity_km_s: Some(vector::add(&body_state.velocity_km_s, &vinf_vector)),
            periapsis_km: None,
        })
    }

    fn swingby_body(&self) -> Result<SwingbyBody, NodeError> {
        self.swingby
            .ok_or(NodeError::Orbit(OrbitError::DegenerateGeometry(
                "swingby node without swingby body data",
            )))
    }

    fn fixed_swingby(
        &self,
        body_state: &StateVector,
        incoming: &Vector3,
        outgoing: &Vector3,
    ) -> Result<NodeSolution, NodeError> {
        let swingby = self.swingby_body()?;
        let vinf_in = vector::sub(incoming, &body_state.velocity_km_s);
        let vinf_out = vector::sub(outgoing, &body_state.velocity_km_s);
        let (vin, vout) = (norm(&vinf_in), norm(&vinf_out));

        let bending = bending_angle(&vinf_in, &vinf_out)?;
        let periapsis = powered_swingby_periapsis(swingby.mu_km3_s2, vin, vout, bending)?;
        if !(periapsis > 0.0) {
            return Err(NodeError::Infeasible(format!(
                "swingby of `{}` needs a bending of {bending:.6} rad, beyond the grazing limit",
                self.body
            )));
        }
        if periapsis < swingby.minimum_periapsis_km {
            return Err(NodeError::Infeasible(format!(
                "swingby of `{}` needs periapsis {periapsis:.3} km, below the minimum {:.3} km",
                self.body, swingby.minimum_periapsis_km
            )));
        }

        Ok(NodeSolution {
            delta_v_km_s: powered_swingby_delta_v(swingby.mu_km3_s2, vin, vout, periapsis),
            outgoing_velocity_km_s: None,
            periapsis_km: Some(periapsis),
        })
    }

    fn free_swingby(
        &self,
        body_state: &StateVector,
        incoming: &Vector3,
        parameters: &[f64],
    ) -> Result<NodeSolution, NodeError> {
        let swingby = self.swingby_body()?;
        let [periapsis, rotation, periapsis_delta_v] = fixed_parameters(parameters)?;
        if !(periapsis > 0.0) || !periapsis.is_finite() || periapsis < swingby.minimum_periapsis_km
        {
            return Err(NodeError::Infeasible(format!(
                "swingby of `{}` at periapsis {periapsis:.3} km is below the minimum {:.3} km",
                self.body, swingby.minimum_periapsis_km
            )));
        }

        let vinf_in = vector::sub(incoming, &body_state.velocity_km_s);
        let vinf_out = match gravity_assist_outgoing_velocity(
            swingby.mu_km3_s2,
            &vinf_in,
            &body_state.velocity_km_s,
            periapsis,
            rotation,
            periapsis_delta_v,
        ) {
            Ok(vinf_out) => vinf_out,
            Err(OrbitError::NotHyperbolic) => {
                return Err(NodeError::Infeasible(format!(
                    "periapsis impulse of {periapsis_delta_v} km/s at `{}` leaves a bound orbit",
                    self.body
                )));
            }
            Err(other) => return Err(other.into()),
        };

        Ok(NodeSolution {
            delta_v_km_s: periapsis_delta_v.abs(),
            outgoing_velocity_km_s: Some(vector::add(&body_state.velocity_km_s, &vinf_out)),
            periapsis_km: Some(periapsis),
        })
    }
}

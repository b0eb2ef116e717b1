//! Multi-leg transfer trajectories: assembly, evaluation and sampling.
//!
//! A trajectory is a chain of `N` nodes (departure, swingbys, capture) joined
//! by `N - 1` legs. It is assembled once from settings and then evaluated
//! repeatedly for different node epochs and free parameters; the outcome of the
//! last successful evaluation is cached and read back through the accessors.

pub mod factory;
pub mod legs;
pub mod nodes;
pub mod parameters;
pub mod sampler;
pub mod settings;

use log::{debug, info, trace};
use mga_core::state::StateVector;
use mga_core::vector::Vector3;
use mga_ephemeris::{EphemerisError, SystemOfBodies};
use thiserror::Error;

use self::legs::{LegBoundary, LegError, LegSolution, TransferLeg};
use self::nodes::{NodeError, TransferNode};
use self::settings::{LegSettings, NodeSettings};

/// Errors surfaced while assembling or evaluating a transfer trajectory.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("unsupported configuration: {0}")]
    Configuration(String),
    #[error("missing environment data for `{body}`: {detail}")]
    MissingEnvironmentData { body: String, detail: String },
    #[error("structural mismatch: {0}")]
    StructuralMismatch(String),
    #[error("{element} expects {expected} value(s), got {actual}")]
    ParameterDimension {
        element: String,
        expected: usize,
        actual: usize,
    },
    #[error("node times must be finite and strictly increasing: {0}")]
    InvalidNodeTimes(String),
    #[error("invalid parameter for {element}: {message}")]
    InvalidParameter { element: String, message: String },
    #[error("node {node_index} is infeasible: {reason}")]
    InfeasibleNode { node_index: usize, reason: String },
    #[error("node {node_index} could not be evaluated: {source}")]
    NodeComputation {
        node_index: usize,
        #[source]
        source: NodeError,
    },
    #[error("body state for node {node_index} unavailable: {source}")]
    Ephemeris {
        node_index: usize,
        #[source]
        source: EphemerisError,
    },
    #[error("leg {leg_index} could not be evaluated: {source}")]
    LegComputation {
        leg_index: usize,
        #[source]
        source: LegError,
    },
    #[error("trajectory has not been evaluated yet")]
    NotYetEvaluated,
    #[error("{kind} index {index} is out of range for {count} {kind}s")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        count: usize,
    },
}

impl TransferError {
    fn from_node(node_index: usize, err: NodeError) -> Self {
        match err {
            NodeError::Infeasible(reason) => TransferError::InfeasibleNode { node_index, reason },
            NodeError::InvalidParameter(message) => TransferError::InvalidParameter {
                element: format!("node {node_index}"),
                message,
            },
            source => TransferError::NodeComputation { node_index, source },
        }
    }

    fn from_leg(leg_index: usize, err: LegError) -> Self {
        match err {
            LegError::InvalidParameter(message) => TransferError::InvalidParameter {
                element: format!("leg {leg_index}"),
                message,
            },
            source => TransferError::LegComputation { leg_index, source },
        }
    }
}

/// Check the leg/node count relation shared by assembly and parameter listings.
pub(crate) fn check_structure(
    leg_settings: &[LegSettings],
    node_settings: &[NodeSettings],
) -> Result<(), TransferError> {
    if leg_settings.is_empty() {
        return Err(TransferError::StructuralMismatch(
            "a transfer needs at least one leg".to_string(),
        ));
    }
    if leg_settings.len() + 1 != node_settings.len() {
        return Err(TransferError::StructuralMismatch(format!(
            "{} legs need {} nodes, got {}",
            leg_settings.len(),
            leg_settings.len() + 1,
            node_settings.len()
        )));
    }
    Ok(())
}

/// Outcome of the last successful evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub node_times_s: Vec<f64>,
    pub node_delta_v_km_s: Vec<f64>,
    pub leg_delta_v_km_s: Vec<f64>,
    pub delta_v_km_s: f64,
    pub time_of_flight_s: f64,
    /// Swingby periapsis radius per node; `None` for departure and capture.
    pub node_periapsis_km: Vec<Option<f64>>,
    pub legs: Vec<LegSolution>,
}

/// Assembled transfer trajectory.
#[derive(Debug, Clone)]
pub struct TransferTrajectory {
    legs: Vec<TransferLeg>,
    nodes: Vec<TransferNode>,
    body_order: Vec<String>,
    central_body: String,
    last_evaluation: Option<Evaluation>,
}

/// Assemble a trajectory from leg and node settings.
///
/// `node_names[i]` is the body of node `i`; leg `i` runs from node `i` to node
/// `i + 1` about `central_body`.
pub fn create_transfer_trajectory(
    bodies: &SystemOfBodies,
    leg_settings: &[LegSettings],
    node_settings: &[NodeSettings],
    node_names: &[impl AsRef<str>],
    central_body: &str,
) -> Result<TransferTrajectory, TransferError> {
    check_structure(leg_settings, node_settings)?;
    if node_names.len() != node_settings.len() {
        return Err(TransferError::StructuralMismatch(format!(
            "{} node settings but {} node bodies",
            node_settings.len(),
            node_names.len()
        )));
    }

    let central = bodies
        .get(central_body)
        .map_err(|_| TransferError::MissingEnvironmentData {
            body: central_body.to_string(),
            detail: "central body is not registered".to_string(),
        })?;
    if central.gravitational_parameter_km3_s2.is_none() {
        return Err(TransferError::MissingEnvironmentData {
            body: central.name.clone(),
            detail: "central body has no gravitational parameter".to_string(),
        });
    }

    let body_order: Vec<String> = node_names
        .iter()
        .map(|name| name.as_ref().to_string())
        .collect();
    let (legs, nodes) = factory::create_legs_and_nodes(
        bodies,
        &body_order,
        central_body,
        leg_settings,
        node_settings,
    )?;

    info!(
        "assembled transfer {} about `{}` ({} legs)",
        body_order.join(" -> "),
        central.name,
        legs.len()
    );

    Ok(TransferTrajectory {
        legs,
        nodes,
        body_order,
        central_body: central.name.clone(),
        last_evaluation: None,
    })
}

impl TransferTrajectory {
    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn number_of_legs(&self) -> usize {
        self.legs.len()
    }

    pub fn body_order(&self) -> &[String] {
        &self.body_order
    }

    pub fn central_body(&self) -> &str {
        &self.central_body
    }

    pub fn legs(&self) -> &[TransferLeg] {
        &self.legs
    }

    pub fn nodes(&self) -> &[TransferNode] {
        &self.nodes
    }

    /// Evaluate the trajectory for the given node epochs (seconds) and free
    /// parameters.
    ///
    /// On failure the previous evaluation, if any, stays available.
    pub fn evaluate(
        &mut self,
        node_times: &[f64],
        leg_parameters: &[Vec<f64>],
        node_parameters: &[Vec<f64>],
    ) -> Result<(), TransferError> {
        self.validate_request(node_times, leg_parameters, node_parameters)?;
        debug!(
            "evaluating {} with node times {:?}",
            self.body_order.join(" -> "),
            node_times
        );

        let body_states = self
            .nodes
            .iter()
            .zip(node_times)
            .enumerate()
            .map(|(node_index, (node, epoch))| {
                node.ephemeris()
                    .state_at(*epoch)
                    .map_err(|source| TransferError::Ephemeris { node_index, source })
            })
            .collect::<Result<Vec<StateVector>, _>>()?;

        let node_count = self.nodes.len();
        let mut node_delta_v = vec![0.0; node_count];
        let mut node_periapsis = vec![None; node_count];
        let mut solutions: Vec<LegSolution> = Vec::with_capacity(self.legs.len());
        let mut incoming: Option<Vector3> = None;

        for (i, leg) in self.legs.iter().enumerate() {
            let node = &self.nodes[i];
            let boundary = LegBoundary {
                departure_epoch_s: node_times[i],
                arrival_epoch_s: node_times[i + 1],
                departure_body: body_states[i],
                arrival_body: body_states[i + 1],
            };

            let solution = if node.variant().has_free_outgoing_velocity() {
                let node_solution = node
                    .evaluate(&body_states[i], incoming.as_ref(), None, &node_parameters[i])
                    .map_err(|err| TransferError::from_node(i, err))?;
                let outgoing = node_solution.outgoing_velocity_km_s.ok_or_else(|| {
                    TransferError::NodeComputation {
                        node_index: i,
                        source: NodeError::MissingVelocity("outgoing"),
                    }
                })?;
                node_delta_v[i] = node_solution.delta_v_km_s;
                node_periapsis[i] = node_solution.periapsis_km;
                leg.evaluate(&boundary, &leg_parameters[i], Some(&outgoing))
                    .map_err(|err| TransferError::from_leg(i, err))?
            } else {
                let solution = leg
                    .evaluate(&boundary, &leg_parameters[i], None)
                    .map_err(|err| TransferError::from_leg(i, err))?;
                let node_solution = node
                    .evaluate(
                        &body_states[i],
                        incoming.as_ref(),
                        Some(&solution.departure_velocity_km_s),
                        &node_parameters[i],
                    )
                    .map_err(|err| TransferError::from_node(i, err))?;
                node_delta_v[i] = node_solution.delta_v_km_s;
                node_periapsis[i] = node_solution.periapsis_km;
                solution
            };

            trace!(
                "node {i} (`{}`, {}): dv {:.6} km/s",
                node.body(),
                node.variant(),
                node_delta_v[i]
            );
            trace!(
                "leg {i} ({}): dv {:.6} km/s",
                leg.settings(),
                solution.delta_v_km_s
            );
            incoming = Some(solution.arrival_velocity_km_s);
            solutions.push(solution);
        }

        let last = node_count - 1;
        let capture = &self.nodes[last];
        let capture_solution = capture
            .evaluate(&body_states[last], incoming.as_ref(), None, &node_parameters[last])
            .map_err(|err| TransferError::from_node(last, err))?;
        node_delta_v[last] = capture_solution.delta_v_km_s;
        trace!(
            "node {last} (`{}`, {}): dv {:.6} km/s",
            capture.body(),
            capture.variant(),
            node_delta_v[last]
        );

        if let Some(node_index) = node_delta_v.iter().position(|dv| !dv.is_finite()) {
            return Err(TransferError::InfeasibleNode {
                node_index,
                reason: "delta-v is not finite".to_string(),
            });
        }
        let leg_delta_v: Vec<f64> = solutions.iter().map(|leg| leg.delta_v_km_s).collect();
        if let Some(leg_index) = leg_delta_v.iter().position(|dv| !dv.is_finite()) {
            return Err(TransferError::LegComputation {
                leg_index,
                source: LegError::DegenerateGeometry("delta-v is not finite"),
            });
        }
        let delta_v = node_delta_v.iter().sum::<f64>() + leg_delta_v.iter().sum::<f64>();
        let time_of_flight = node_times[last] - node_times[0];
        debug!("total delta-v {delta_v:.6} km/s over {time_of_flight:.1} s");

        self.last_evaluation = Some(Evaluation {
            node_times_s: node_times.to_vec(),
            node_delta_v_km_s: node_delta_v,
            leg_delta_v_km_s: leg_delta_v,
            delta_v_km_s: delta_v,
            time_of_flight_s: time_of_flight,
            node_periapsis_km: node_periapsis,
            legs: solutions,
        });
        Ok(())
    }

    fn validate_request(
        &self,
        node_times: &[f64],
        leg_parameters: &[Vec<f64>],
        node_parameters: &[Vec<f64>],
    ) -> Result<(), TransferError> {
        let check_count = |element: &str, expected: usize, actual: usize| {
            if expected == actual {
                Ok(())
            } else {
                Err(TransferError::ParameterDimension {
                    element: element.to_string(),
                    expected,
                    actual,
                })
            }
        };
        check_count("node times", self.nodes.len(), node_times.len())?;
        check_count("leg parameters", self.legs.len(), leg_parameters.len())?;
        check_count("node parameters", self.nodes.len(), node_parameters.len())?;

        if let Some(bad) = node_times.iter().find(|time| !time.is_finite()) {
            return Err(TransferError::InvalidNodeTimes(format!(
                "non-finite epoch {bad}"
            )));
        }
        if let Some(index) = node_times.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(TransferError::InvalidNodeTimes(format!(
                "epoch of node {} ({}) does not follow node {} ({})",
                index + 1,
                node_times[index + 1],
                index,
                node_times[index]
            )));
        }

        for (index, (leg, parameters)) in self.legs.iter().zip(leg_parameters).enumerate() {
            check_count(&format!("leg {index}"), leg.parameter_count(), parameters.len())?;
        }
        for (index, (node, parameters)) in self.nodes.iter().zip(node_parameters).enumerate() {
            check_count(&format!("node {index}"), node.parameter_count(), parameters.len())?;
        }
        Ok(())
    }

    /// Last successful evaluation.
    pub fn last_evaluation(&self) -> Result<&Evaluation, TransferError> {
        self.last_evaluation
            .as_ref()
            .ok_or(TransferError::NotYetEvaluated)
    }

    /// Total delta-v (km/s) of the last evaluation.
    pub fn delta_v(&self) -> Result<f64, TransferError> {
        Ok(self.last_evaluation()?.delta_v_km_s)
    }

    /// Total time of flight (s) of the last evaluation.
    pub fn time_of_flight(&self) -> Result<f64, TransferError> {
        Ok(self.last_evaluation()?.time_of_flight_s)
    }

    pub fn delta_v_per_node(&self) -> Result<Vec<f64>, TransferError> {
        Ok(self.last_evaluation()?.node_delta_v_km_s.clone())
    }

    pub fn delta_v_per_leg(&self) -> Result<Vec<f64>, TransferError> {
        Ok(self.last_evaluation()?.leg_delta_v_km_s.clone())
    }

    pub fn single_node_delta_v(&self, node_index: usize) -> Result<f64, TransferError> {
        let evaluation = self.last_evaluation()?;
        evaluation
            .node_delta_v_km_s
            .get(node_index)
            .copied()
            .ok_or(TransferError::IndexOutOfRange {
                kind: "node",
                index: node_index,
                count: self.nodes.len(),
            })
    }

    pub fn single_leg_delta_v(&self, leg_index: usize) -> Result<f64, TransferError> {
        Ok(self.leg_solution(leg_index)?.delta_v_km_s)
    }

    pub fn node_times(&self) -> Result<Vec<f64>, TransferError> {
        Ok(self.last_evaluation()?.node_times_s.clone())
    }

    /// Spacecraft velocity at the start of leg `leg_index`.
    pub fn leg_departure_velocity(&self, leg_index: usize) -> Result<Vector3, TransferError> {
        Ok(self.leg_solution(leg_index)?.departure_velocity_km_s)
    }

    /// Spacecraft velocity at the end of leg `leg_index`.
    pub fn leg_arrival_velocity(&self, leg_index: usize) -> Result<Vector3, TransferError> {
        Ok(self.leg_solution(leg_index)?.arrival_velocity_km_s)
    }

    pub fn leg_solution(&self, leg_index: usize) -> Result<&LegSolution, TransferError> {
        let evaluation = self.last_evaluation()?;
        evaluation
            .legs
            .get(leg_index)
            .ok_or(TransferError::IndexOutOfRange {
                kind: "leg",
                index: leg_index,
                count: self.legs.len(),
            })
    }

    /// Spacecraft states at `samples_per_leg` epochs per leg, in increasing
    /// epoch order. See [`sampler::leg_sample_epochs`] for the epoch layout.
    pub fn states_along_trajectory(
        &self,
        samples_per_leg: usize,
    ) -> Result<Vec<(f64, StateVector)>, TransferError> {
        let evaluation = self.last_evaluation()?;
        sampler::sample_legs(&evaluation.legs, samples_per_leg)
    }
}

//! Leg models: transfer kinematics between two consecutive nodes.

use std::sync::Arc;

use mga_core::state::StateVector;
use mga_core::vector::{self, Vector3, cross, norm, normalize};
use mga_ephemeris::Ephemeris;
use mga_impulsive::{LambertSolverError, solve_prograde};
use mga_orbits::OrbitError;
use thiserror::Error;

use super::parameters::leg_parameter_names;
use super::settings::LegSettings;

/// Failures local to one leg evaluation.
#[derive(Debug, Error)]
pub enum LegError {
    #[error("lambert arc failed: {0}")]
    Lambert(#[from] LambertSolverError),
    #[error("two-body propagation failed: {0}")]
    Propagation(#[from] OrbitError),
    #[error("invalid free parameter: {0}")]
    InvalidParameter(String),
    #[error("departure velocity must be supplied by the departure node")]
    MissingDepartureVelocity,
    #[error("degenerate leg geometry: {0}")]
    DegenerateGeometry(&'static str),
}

/// Conic segment flown between two epochs without manoeuvres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicArc {
    pub start_epoch_s: f64,
    pub end_epoch_s: f64,
    /// State right after any manoeuvre at `start_epoch_s`.
    pub initial_state: StateVector,
}

/// Deep-space manoeuvre performed inside a leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeepSpaceManeuver {
    pub epoch_s: f64,
    pub position_km: Vector3,
    pub delta_v_km_s: f64,
}

/// Result of evaluating one leg.
#[derive(Debug, Clone, PartialEq)]
pub struct LegSolution {
    pub departure_epoch_s: f64,
    pub arrival_epoch_s: f64,
    /// Velocity on the leg right after leaving the departure node.
    pub departure_velocity_km_s: Vector3,
    /// Velocity on the leg right before reaching the arrival node.
    pub arrival_velocity_km_s: Vector3,
    pub delta_v_km_s: f64,
    pub maneuver: Option<DeepSpaceManeuver>,
    pub arcs: Vec<ConicArc>,
    pub central_mu_km3_s2: f64,
}

impl LegSolution {
    /// State on the leg at `epoch_s`, propagated along the conic arc covering it.
    pub fn state_at(&self, epoch_s: f64) -> Result<StateVector, OrbitError> {
        let arc = self
            .arcs
            .iter()
            .rev()
            .find(|arc| arc.start_epoch_s <= epoch_s)
            .or_else(|| self.arcs.first())
            .ok_or(OrbitError::DegenerateGeometry("leg has no conic arcs"))?;
        mga_orbits::propagate(
            &arc.initial_state,
            epoch_s - arc.start_epoch_s,
            self.central_mu_km3_s2,
        )
    }
}

/// Body states at the two ends of a leg, looked up by the evaluator.
#[derive(Debug, Clone, Copy)]
pub struct LegBoundary {
    pub departure_epoch_s: f64,
    pub arrival_epoch_s: f64,
    pub departure_body: StateVector,
    pub arrival_body: StateVector,
}

impl LegBoundary {
    pub fn time_of_flight_s(&self) -> f64 {
        self.arrival_epoch_s - self.departure_epoch_s
    }
}

/// Evaluable leg bound to its endpoint bodies and central body.
#[derive(Debug, Clone)]
pub struct TransferLeg {
    settings: LegSettings,
    departure_body: String,
    arrival_body: String,
    departure_ephemeris: Arc<dyn Ephemeris>,
    arrival_ephemeris: Arc<dyn Ephemeris>,
    central_mu_km3_s2: f64,
}

impl TransferLeg {
    pub(crate) fn new(
        settings: LegSettings,
        departure_body: String,
        arrival_body: String,
        departure_ephemeris: Arc<dyn Ephemeris>,
        arrival_ephemeris: Arc<dyn Ephemeris>,
        central_mu_km3_s2: f64,
    ) -> Self {
        Self {
            settings,
            departure_body,
            arrival_body,
            departure_ephemeris,
            arrival_ephemeris,
            central_mu_km3_s2,
        }
    }

    pub fn settings(&self) -> LegSettings {
        self.settings
    }

    pub fn departure_body(&self) -> &str {
        &self.departure_body
    }

    pub fn arrival_body(&self) -> &str {
        &self.arrival_body
    }

    pub fn departure_ephemeris(&self) -> &dyn Ephemeris {
        self.departure_ephemeris.as_ref()
    }

    pub fn arrival_ephemeris(&self) -> &dyn Ephemeris {
        self.arrival_ephemeris.as_ref()
    }

    /// Number of free parameters this leg consumes.
    pub fn parameter_count(&self) -> usize {
        leg_parameter_names(self.settings).len()
    }

    /// Whether the departure node has to supply this leg's initial velocity.
    pub fn needs_node_velocity(&self) -> bool {
        self.settings.needs_node_velocity()
    }

    /// Solve the leg kinematics.
    ///
    /// `departure_velocity` is required for legs whose initial velocity is set
    /// by the departure node and ignored otherwise.
    pub fn evaluate(
        &self,
        boundary: &LegBoundary,
        parameters: &[f64],
        departure_velocity: Option<&Vector3>,
    ) -> Result<LegSolution, LegError> {
        match self.settings {
            LegSettings::UnpoweredUnperturbed => self.evaluate_unpowered(boundary),
            LegSettings::DsmPositionBased => self.evaluate_dsm_position_based(boundary, parameters),
            LegSettings::DsmVelocityBased => {
                let velocity = departure_velocity.ok_or(LegError::MissingDepartureVelocity)?;
                self.evaluate_dsm_velocity_based(boundary, parameters, velocity)
            }
        }
    }

    fn evaluate_unpowered(&self, boundary: &LegBoundary) -> Result<LegSolution, LegError> {
        let (v1, v2) = solve_prograde(
            boundary.departure_body.position_km,
            boundary.arrival_body.position_km,
            boundary.time_of_flight_s(),
            self.central_mu_km3_s2,
        )?;
        Ok(LegSolution {
            departure_epoch_s: boundary.departure_epoch_s,
            arrival_epoch_s: boundary.arrival_epoch_s,
            departure_velocity_km_s: v1,
            arrival_velocity_km_s: v2,
            delta_v_km_s: 0.0,
            maneuver: None,
            arcs: vec![ConicArc {
                start_epoch_s: boundary.departure_epoch_s,
                end_epoch_s: boundary.arrival_epoch_s,
                initial_state: StateVector::new(boundary.departure_body.position_km, v1),
            }],
            central_mu_km3_s2: self.central_mu_km3_s2,
        })
    }

    fn evaluate_dsm_position_based(
        &self,
        boundary: &LegBoundary,
        parameters: &[f64],
    ) -> Result<LegSolution, LegError> {
        let [fraction, radius_ratio, in_plane, out_of_plane] = fixed_parameters(parameters)?;
        let fraction = dsm_fraction(fraction)?;
        if !(radius_ratio > 0.0) || !radius_ratio.is_finite() {
            return Err(LegError::InvalidParameter(format!(
                "dimensionless DSM radius must be positive, got {radius_ratio}"
            )));
        }

        let departure = &boundary.departure_body;
        let radial = normalize(&departure.position_km)
            .ok_or(LegError::DegenerateGeometry("departure body sits at the central body"))?;
        let normal = normalize(&cross(&departure.position_km, &departure.velocity_km_s))
            .ok_or(LegError::DegenerateGeometry("departure body has no angular momentum"))?;
        let transverse = cross(&normal, &radial);

        let radius = radius_ratio * norm(&departure.position_km);
        let (sin_a, cos_a) = in_plane.sin_cos();
        let (sin_b, cos_b) = out_of_plane.sin_cos();
        let dsm_position = vector::scale(
            &vector::combine(
                cos_a * cos_b,
                &radial,
                sin_a * cos_b,
                &transverse,
                sin_b,
                &normal,
            ),
            radius,
        );

        let dsm_epoch = boundary.departure_epoch_s + fraction * boundary.time_of_flight_s();
        let (v_departure, v_dsm_in) = solve_prograde(
            departure.position_km,
            dsm_position,
            dsm_epoch - boundary.departure_epoch_s,
            self.central_mu_km3_s2,
        )?;
        let (v_dsm_out, v_arrival) = solve_prograde(
            dsm_position,
            boundary.arrival_body.position_km,
            boundary.arrival_epoch_s - dsm_epoch,
            self.central_mu_km3_s2,
        )?;

        Ok(self.two_arc_solution(
            boundary,
            dsm_epoch,
            dsm_position,
            v_departure,
            v_dsm_in,
            v_dsm_out,
            v_arrival,
        ))
    }

    fn evaluate_dsm_velocity_based(
        &self,
        boundary: &LegBoundary,
        parameters: &[f64],
        departure_velocity: &Vector3,
    ) -> Result<LegSolution, LegError> {
        let [fraction] = fixed_parameters(parameters)?;
        let fraction = dsm_fraction(fraction)?;
        let dsm_epoch = boundary.departure_epoch_s + fraction * boundary.time_of_flight_s();

        let departure_state =
            StateVector::new(boundary.departure_body.position_km, *departure_velocity);
        let before_dsm = mga_orbits::propagate(
            &departure_state,
            dsm_epoch - boundary.departure_epoch_s,
            self.central_mu_km3_s2,
        )?;
        let (v_dsm_out, v_arrival) = solve_prograde(
            before_dsm.position_km,
            boundary.arrival_body.position_km,
            boundary.arrival_epoch_s - dsm_epoch,
            self.central_mu_km3_s2,
        )?;

        Ok(self.two_arc_solution(
            boundary,
            dsm_epoch,
            before_dsm.position_km,
            *departure_velocity,
            before_dsm.velocity_km_s,
            v_dsm_out,
            v_arrival,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn two_arc_solution(
        &self,
        boundary: &LegBoundary,
        dsm_epoch: f64,
        dsm_position: Vector3,
        v_departure: Vector3,
        v_dsm_in: Vector3,
        v_dsm_out: Vector3,
        v_arrival: Vector3,
    ) -> LegSolution {
        let delta_v = norm(&vector::sub(&v_dsm_out, &v_dsm_in));
        LegSolution {
            departure_epoch_s: boundary.departure_epoch_s,
            arrival_epoch_s: boundary.arrival_epoch_s,
            departure_velocity_km_s: v_departure,
            arrival_velocity_km_s: v_arrival,
            delta_v_km_s: delta_v,
            maneuver: Some(DeepSpaceManeuver {
                epoch_s: dsm_epoch,
                position_km: dsm_position,
                delta_v_km_s: delta_v,
            }),
            arcs: vec![
                ConicArc {
                    start_epoch_s: boundary.departure_epoch_s,
                    end_epoch_s: dsm_epoch,
                    initial_state: StateVector::new(boundary.departure_body.position_km, v_departure),
                },
                ConicArc {
                    start_epoch_s: dsm_epoch,
                    end_epoch_s: boundary.arrival_epoch_s,
                    initial_state: StateVector::new(dsm_position, v_dsm_out),
                },
            ],
            central_mu_km3_s2: self.central_mu_km3_s2,
        }
    }
}

fn fixed_parameters<const N: usize>(parameters: &[f64]) -> Result<[f64; N], LegError> {
    <[f64; N]>::try_from(parameters).map_err(|_| {
        LegError::InvalidParameter(format!(
            "expected {N} free parameters, got {}",
            parameters.len()
        ))
    })
}

fn dsm_fraction(value: f64) -> Result<f64, LegError> {
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(LegError::InvalidParameter(format!(
            "DSM time-of-flight fraction must lie in (0, 1), got {value}"
        )))
    }
}

use lambert_bate::get_velocities;
use mga_core::vector::{Vector3, cross, norm};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LambertSolverError {
    #[error("lambert solver failed: {0}")]
    Failure(String),
    #[error("lambert arc requires a positive time of flight, got {0} s")]
    NonPositiveTimeOfFlight(f64),
    #[error("lambert arc endpoints must lie away from the central body")]
    DegenerateGeometry,
}

pub fn solve(
    r1_km: Vector3,
    r2_km: Vector3,
    time_of_flight_s: f64,
    mu_km3_s2: f64,
    short: bool,
) -> Result<(Vector3, Vector3), LambertSolverError> {
    if !(time_of_flight_s > 0.0) {
        return Err(LambertSolverError::NonPositiveTimeOfFlight(time_of_flight_s));
    }
    if norm(&r1_km) <= 0.0 || norm(&r2_km) <= 0.0 {
        return Err(LambertSolverError::DegenerateGeometry);
    }
    let (v1, v2) = get_velocities(r1_km, r2_km, time_of_flight_s, mu_km3_s2, short, 1e-8, 500)
        .map_err(|e| LambertSolverError::Failure(format!("{e:?}")))?;
    if v1.iter().chain(v2.iter()).any(|c| !c.is_finite()) {
        return Err(LambertSolverError::Failure(
            "non-finite velocity in solution".to_string(),
        ));
    }
    Ok((v1, v2))
}

/// Zero-revolution Lambert arc flown in the prograde sense about +z.
///
/// The short way is taken when the transfer angle, measured counter-clockwise,
/// is below 180 degrees.
pub fn solve_prograde(
    r1_km: Vector3,
    r2_km: Vector3,
    time_of_flight_s: f64,
    mu_km3_s2: f64,
) -> Result<(Vector3, Vector3), LambertSolverError> {
    let short = cross(&r1_km, &r2_km)[2] >= 0.0;
    solve(r1_km, r2_km, time_of_flight_s, mu_km3_s2, short)
}

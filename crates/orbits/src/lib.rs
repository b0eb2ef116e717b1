//! Two-body helpers: patched-conic escape/capture, Kepler propagation, element
//! conversion and gravity-assist geometry.

pub mod elements;
pub mod gravity_assist;
pub mod kepler;

use thiserror::Error;

pub use elements::{KeplerianElements, keplerian_to_cartesian};
pub use gravity_assist::{
    bending_angle, gravity_assist_outgoing_velocity, powered_swingby_delta_v,
    powered_swingby_periapsis,
};
pub use kepler::propagate;

/// Failures raised by the two-body helpers.
#[derive(Debug, Error)]
pub enum OrbitError {
    #[error("invalid orbit: {0}")]
    InvalidOrbit(String),
    #[error("kepler propagation over {dt_s} s did not converge")]
    KeplerDidNotConverge { dt_s: f64 },
    #[error("periapsis speed after the manoeuvre is not hyperbolic")]
    NotHyperbolic,
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),
}

/// Patched-conic delta-v between a bound orbit `(a, e)` and a hyperbola with
/// excess speed `vinf_km_s`, applied at the orbit's periapsis.
///
/// Serves both escape (departure) and capture (insertion); the manoeuvre is
/// symmetric.
pub fn escape_or_capture_delta_v(
    mu_km3_s2: f64,
    semi_major_axis_km: f64,
    eccentricity: f64,
    vinf_km_s: f64,
) -> Result<f64, OrbitError> {
    validate_bound_orbit(semi_major_axis_km, eccentricity)?;
    let periapsis = semi_major_axis_km * (1.0 - eccentricity);
    let hyperbolic_speed = (vinf_km_s * vinf_km_s + 2.0 * mu_km3_s2 / periapsis).sqrt();
    let orbital_speed = (mu_km3_s2 * (2.0 / periapsis - 1.0 / semi_major_axis_km)).sqrt();
    Ok((hyperbolic_speed - orbital_speed).abs())
}

/// Reject orbits that cannot serve as a parking orbit.
pub fn validate_bound_orbit(semi_major_axis_km: f64, eccentricity: f64) -> Result<(), OrbitError> {
    if !(semi_major_axis_km > 0.0) || !semi_major_axis_km.is_finite() {
        return Err(OrbitError::InvalidOrbit(format!(
            "semi-major axis must be positive and finite, got {semi_major_axis_km}"
        )));
    }
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(OrbitError::InvalidOrbit(format!(
            "eccentricity must lie in [0, 1), got {eccentricity}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MU_EARTH: f64 = 398_600.4418;

    #[test]
    fn circular_escape_matches_closed_form() {
        let r = 6_678.0;
        let vinf = 3.0;
        let dv = escape_or_capture_delta_v(MU_EARTH, r, 0.0, vinf).unwrap();
        let expected = (vinf * vinf + 2.0 * MU_EARTH / r).sqrt() - (MU_EARTH / r).sqrt();
        assert_relative_eq!(dv, expected, epsilon = 1e-12);
    }

    #[test]
    fn eccentric_orbit_needs_less_delta_v_than_circular() {
        let circular = escape_or_capture_delta_v(MU_EARTH, 7_000.0, 0.0, 2.5).unwrap();
        let eccentric = escape_or_capture_delta_v(MU_EARTH, 7_000.0 / (1.0 - 0.5), 0.5, 2.5).unwrap();
        assert!(eccentric < circular);
    }

    #[test]
    fn unbound_orbit_is_rejected() {
        assert!(escape_or_capture_delta_v(MU_EARTH, 7_000.0, 1.2, 1.0).is_err());
        assert!(escape_or_capture_delta_v(MU_EARTH, -7_000.0, 0.1, 1.0).is_err());
    }
}

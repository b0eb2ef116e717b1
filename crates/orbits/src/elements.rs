//! Classical orbital elements.

use mga_core::state::StateVector;

use crate::OrbitError;

/// Classical elements; angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerianElements {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub argument_of_periapsis: f64,
    pub true_anomaly: f64,
}

impl KeplerianElements {
    /// Circular, equatorial orbit at `radius_km` with the body at `phase` radians.
    pub fn circular(radius_km: f64, phase: f64) -> Self {
        Self {
            semi_major_axis_km: radius_km,
            eccentricity: 0.0,
            inclination: 0.0,
            raan: 0.0,
            argument_of_periapsis: 0.0,
            true_anomaly: phase,
        }
    }
}

/// Convert classical elements to a Cartesian state about a body with `mu_km3_s2`.
pub fn keplerian_to_cartesian(
    elements: &KeplerianElements,
    mu_km3_s2: f64,
) -> Result<StateVector, OrbitError> {
    let a = elements.semi_major_axis_km;
    let e = elements.eccentricity;
    if e < 0.0 || (e - 1.0).abs() < 1e-12 {
        return Err(OrbitError::InvalidOrbit(format!(
            "eccentricity {e} is negative or parabolic"
        )));
    }
    let p = a * (1.0 - e * e);
    if !(p > 0.0) {
        return Err(OrbitError::InvalidOrbit(format!(
            "semi-latus rectum must be positive (a = {a}, e = {e})"
        )));
    }
    let (sin_nu, cos_nu) = elements.true_anomaly.sin_cos();
    let denominator = 1.0 + e * cos_nu;
    if denominator <= 0.0 {
        return Err(OrbitError::InvalidOrbit(
            "true anomaly lies beyond the hyperbolic asymptote".to_string(),
        ));
    }
    let r = p / denominator;
    let position_pf = [r * cos_nu, r * sin_nu];
    let speed_factor = (mu_km3_s2 / p).sqrt();
    let velocity_pf = [-speed_factor * sin_nu, speed_factor * (e + cos_nu)];

    let (sin_o, cos_o) = elements.raan.sin_cos();
    let (sin_w, cos_w) = elements.argument_of_periapsis.sin_cos();
    let (sin_i, cos_i) = elements.inclination.sin_cos();

    // Columns of the perifocal-to-inertial rotation for the in-plane axes.
    let p_hat = [
        cos_o * cos_w - sin_o * sin_w * cos_i,
        sin_o * cos_w + cos_o * sin_w * cos_i,
        sin_w * sin_i,
    ];
    let q_hat = [
        -cos_o * sin_w - sin_o * cos_w * cos_i,
        -sin_o * sin_w + cos_o * cos_w * cos_i,
        cos_w * sin_i,
    ];

    let rotate = |v: [f64; 2]| {
        [
            v[0] * p_hat[0] + v[1] * q_hat[0],
            v[0] * p_hat[1] + v[1] * q_hat[1],
            v[0] * p_hat[2] + v[1] * q_hat[2],
        ]
    };

    Ok(StateVector::new(rotate(position_pf), rotate(velocity_pf)))
}

//! Two-body propagation in universal variables with Stumpff functions.

use mga_core::state::StateVector;
use mga_core::vector::{dot, norm};

use crate::OrbitError;

const MAX_ITERATIONS: usize = 100;

/// Propagate `state` by `dt_s` seconds under point-mass gravity `mu_km3_s2`.
pub fn propagate(state: &StateVector, dt_s: f64, mu_km3_s2: f64) -> Result<StateVector, OrbitError> {
    if dt_s == 0.0 {
        return Ok(*state);
    }
    let r0 = &state.position_km;
    let v0 = &state.velocity_km_s;
    let r0_mag = norm(r0);
    if !(r0_mag > 0.0) || !(mu_km3_s2 > 0.0) {
        return Err(OrbitError::DegenerateGeometry(
            "propagation needs a non-zero radius and positive mu",
        ));
    }
    let sqrt_mu = mu_km3_s2.sqrt();
    let rdotv = dot(r0, v0);
    let v0_mag_sq = dot(v0, v0);

    // alpha = 1/a, negative for hyperbolic motion
    let alpha = 2.0 / r0_mag - v0_mag_sq / mu_km3_s2;

    let mut chi = initial_guess(alpha, r0_mag, rdotv, dt_s, mu_km3_s2);

    let mut converged = false;
    for _ in 0..MAX_ITERATIONS {
        let chi2 = chi * chi;
        let psi = alpha * chi2;
        let (c2, c3) = stumpff_c2c3(psi);

        let r = chi2 * c2 + rdotv / sqrt_mu * chi * (1.0 - psi * c3) + r0_mag * (1.0 - psi * c2);
        let f_val =
            r0_mag * chi * (1.0 - psi * c3) + rdotv / sqrt_mu * chi2 * c2 + chi2 * chi * c3
                - sqrt_mu * dt_s;

        let delta = f_val / r;
        chi -= delta;
        if !chi.is_finite() {
            break;
        }
        if delta.abs() <= 1e-12 * chi.abs().max(1.0) {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(OrbitError::KeplerDidNotConverge { dt_s });
    }

    let chi2 = chi * chi;
    let psi = alpha * chi2;
    let (c2, c3) = stumpff_c2c3(psi);
    let r_mag = chi2 * c2 + rdotv / sqrt_mu * chi * (1.0 - psi * c3) + r0_mag * (1.0 - psi * c2);

    let f = 1.0 - chi2 / r0_mag * c2;
    let g = dt_s - chi2 * chi / sqrt_mu * c3;
    let g_dot = 1.0 - chi2 / r_mag * c2;
    let f_dot = sqrt_mu / (r_mag * r0_mag) * chi * (psi * c3 - 1.0);

    Ok(StateVector::new(
        [
            f * r0[0] + g * v0[0],
            f * r0[1] + g * v0[1],
            f * r0[2] + g * v0[2],
        ],
        [
            f_dot * r0[0] + g_dot * v0[0],
            f_dot * r0[1] + g_dot * v0[1],
            f_dot * r0[2] + g_dot * v0[2],
        ],
    ))
}

fn initial_guess(alpha: f64, r0_mag: f64, rdotv: f64, dt_s: f64, mu: f64) -> f64 {
    let sqrt_mu = mu.sqrt();
    if alpha > 1e-12 {
        return sqrt_mu * dt_s * alpha;
    }
    if alpha < -1e-12 {
        let a = 1.0 / alpha;
        let sign_dt = dt_s.signum();
        let denominator = rdotv + sign_dt * (-mu * a).sqrt() * (1.0 - r0_mag * alpha);
        let argument = -2.0 * mu * alpha * dt_s / denominator;
        if argument > 0.0 && argument.is_finite() {
            return sign_dt * (-a).sqrt() * argument.ln();
        }
    }
    sqrt_mu * dt_s / r0_mag
}

/// Stumpff functions c2(psi) and c3(psi).
fn stumpff_c2c3(psi: f64) -> (f64, f64) {
    if psi > 1e-6 {
        let sqrt_psi = psi.sqrt();
        let c2 = (1.0 - sqrt_psi.cos()) / psi;
        let c3 = (sqrt_psi - sqrt_psi.sin()) / (psi * sqrt_psi);
        (c2, c3)
    } else if psi < -1e-6 {
        let sqrt_neg_psi = (-psi).sqrt();
        let c2 = (1.0 - sqrt_neg_psi.cosh()) / psi;
        let c3 = (sqrt_neg_psi.sinh() - sqrt_neg_psi) / ((-psi) * sqrt_neg_psi);
        (c2, c3)
    } else {
        let c2 = 1.0 / 2.0 - psi / 24.0 + psi * psi / 720.0;
        let c3 = 1.0 / 6.0 - psi / 120.0 + psi * psi / 5040.0;
        (c2, c3)
    }
}

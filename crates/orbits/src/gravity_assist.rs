//! Patched-conic gravity-assist geometry.
//!
//! All velocities are hyperbolic excess velocities relative to the swingby body.

use mga_core::vector::{self, Vector3, cross, dot, norm, normalize};

use crate::OrbitError;

const MAX_BISECTIONS: usize = 200;

/// Angle between incoming and outgoing excess velocity vectors (radians).
pub fn bending_angle(vinf_in: &Vector3, vinf_out: &Vector3) -> Result<f64, OrbitError> {
    let denominator = norm(vinf_in) * norm(vinf_out);
    if !(denominator > 0.0) {
        return Err(OrbitError::DegenerateGeometry(
            "bending angle needs non-zero excess velocities",
        ));
    }
    Ok((dot(vinf_in, vinf_out) / denominator).clamp(-1.0, 1.0).acos())
}

fn half_bend(mu: f64, periapsis_km: f64, vinf_km_s: f64) -> f64 {
    let eccentricity = 1.0 + periapsis_km * vinf_km_s * vinf_km_s / mu;
    (1.0 / eccentricity).asin()
}

/// Periapsis radius at which a powered swingby with a single periapsis impulse
/// bends `vin` into `vout` by `bending` radians.
///
/// Returns `f64::INFINITY` when no bending is required. The bending achievable
/// shrinks monotonically with periapsis radius, so the root is bracketed and
/// found by bisection on a logarithmic scale.
pub fn powered_swingby_periapsis(
    mu_km3_s2: f64,
    vin_km_s: f64,
    vout_km_s: f64,
    bending: f64,
) -> Result<f64, OrbitError> {
    if !(vin_km_s > 0.0) || !(vout_km_s > 0.0) || !(mu_km3_s2 > 0.0) {
        return Err(OrbitError::DegenerateGeometry(
            "swingby needs positive excess speeds and mu",
        ));
    }
    if bending <= 1e-14 {
        return Ok(f64::INFINITY);
    }
    let residual =
        |rp: f64| half_bend(mu_km3_s2, rp, vin_km_s) + half_bend(mu_km3_s2, rp, vout_km_s) - bending;

    let mut lower = 1e-9_f64;
    if residual(lower) <= 0.0 {
        // Requested bending is at (or beyond) the grazing limit.
        return Ok(0.0);
    }
    let mut upper = 1.0_f64;
    while residual(upper) > 0.0 {
        upper *= 2.0;
        if !upper.is_finite() {
            return Ok(f64::INFINITY);
        }
    }

    for _ in 0..MAX_BISECTIONS {
        let middle = (lower * upper).sqrt();
        if residual(middle) > 0.0 {
            lower = middle;
        } else {
            upper = middle;
        }
        if upper - lower <= 1e-12 * upper {
            break;
        }
    }
    Ok(0.5 * (lower + upper))
}

/// Impulse at periapsis connecting the incoming and outgoing hyperbolas.
pub fn powered_swingby_delta_v(
    mu_km3_s2: f64,
    vin_km_s: f64,
    vout_km_s: f64,
    periapsis_km: f64,
) -> f64 {
    if periapsis_km.is_infinite() {
        return (vout_km_s - vin_km_s).abs();
    }
    let escape_term = 2.0 * mu_km3_s2 / periapsis_km;
    ((vout_km_s * vout_km_s + escape_term).sqrt() - (vin_km_s * vin_km_s + escape_term).sqrt())
        .abs()
}

/// Outgoing excess velocity of a swingby defined by its periapsis radius, the
/// rotation of the bending plane about the incoming asymptote and a tangential
/// impulse applied at periapsis.
pub fn gravity_assist_outgoing_velocity(
    mu_km3_s2: f64,
    vinf_in: &Vector3,
    body_velocity: &Vector3,
    periapsis_km: f64,
    rotation_angle: f64,
    periapsis_delta_v_km_s: f64,
) -> Result<Vector3, OrbitError> {
    let vin = norm(vinf_in);
    if !(periapsis_km > 0.0) {
        return Err(OrbitError::DegenerateGeometry(
            "swingby periapsis radius must be positive",
        ));
    }
    let escape_term = 2.0 * mu_km3_s2 / periapsis_km;
    let periapsis_speed_out = (vin * vin + escape_term).sqrt() + periapsis_delta_v_km_s;
    let vout_sq = periapsis_speed_out * periapsis_speed_out - escape_term;
    if periapsis_speed_out <= 0.0 || vout_sq <= 0.0 {
        return Err(OrbitError::NotHyperbolic);
    }
    let vout = vout_sq.sqrt();
    let bending = half_bend(mu_km3_s2, periapsis_km, vin) + half_bend(mu_km3_s2, periapsis_km, vout);

    let u1 = normalize(vinf_in).ok_or(OrbitError::DegenerateGeometry(
        "incoming excess velocity is zero",
    ))?;
    let u2 = normalize(&cross(&u1, body_velocity)).ok_or(OrbitError::DegenerateGeometry(
        "incoming asymptote is parallel to the body velocity",
    ))?;
    let u3 = cross(&u1, &u2);

    let (sin_b, cos_b) = bending.sin_cos();
    let (sin_r, cos_r) = rotation_angle.sin_cos();
    let direction = vector::combine(cos_b, &u1, sin_b * cos_r, &u2, sin_b * sin_r, &u3);
    Ok(vector::scale(&direction, vout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MU_MARS: f64 = 42_828.37;

    #[test]
    fn free_and_fixed_swingby_models_agree() {
        let vinf_in = [3.0, 1.0, 0.2];
        let body_velocity = [0.0, 24.0, 0.0];
        let rp = 4_500.0;
        let dv = 0.35;
        let vinf_out =
            gravity_assist_outgoing_velocity(MU_MARS, &vinf_in, &body_velocity, rp, 0.7, dv).unwrap();

        let bend = bending_angle(&vinf_in, &vinf_out).unwrap();
        let solved_rp = powered_swingby_periapsis(MU_MARS, norm(&vinf_in), norm(&vinf_out), bend).unwrap();
        assert_relative_eq!(solved_rp, rp, max_relative = 1e-6);

        let solved_dv = powered_swingby_delta_v(MU_MARS, norm(&vinf_in), norm(&vinf_out), solved_rp);
        assert_relative_eq!(solved_dv, dv, max_relative = 1e-5);
    }

    #[test]
    fn unpowered_swingby_preserves_excess_speed() {
        let vinf_in = [0.0, 4.0, 0.0];
        let vinf_out =
            gravity_assist_outgoing_velocity(MU_MARS, &vinf_in, &[24.0, 0.0, 0.0], 5_000.0, 0.0, 0.0)
                .unwrap();
        assert_relative_eq!(norm(&vinf_out), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn straight_through_needs_no_periapsis() {
        let rp = powered_swingby_periapsis(MU_MARS, 3.0, 3.5, 0.0).unwrap();
        assert!(rp.is_infinite());
        assert_relative_eq!(powered_swingby_delta_v(MU_MARS, 3.0, 3.5, rp), 0.5);
    }

    #[test]
    fn strong_braking_cannot_escape() {
        let err = gravity_assist_outgoing_velocity(MU_MARS, &[1.0, 0.0, 0.0], &[0.0, 24.0, 0.0], 4_000.0, 0.0, -10.0)
            .expect_err("captured");
        assert!(matches!(err, OrbitError::NotHyperbolic));
    }
}

//! Core units, constants, and shared primitives for the MGA trajectory workspace.

/// Physical constants expressed in kilometre/second units.
pub mod constants {
    /// Gravitational parameter of the Sun (km^3/s^2).
    pub const MU_SUN: f64 = 1.327_124_400_18e11;
    /// Kilometres per astronomical unit.
    pub const AU_KM: f64 = 149_597_870.7;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::SECONDS_PER_DAY;

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in kilometres or km/s depending on context.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Unit vector along `v`, or `None` for a zero-length input.
    #[inline]
    pub fn normalize(v: &Vector3) -> Option<Vector3> {
        let n = norm(v);
        if n > 0.0 && n.is_finite() {
            Some(scale(v, 1.0 / n))
        } else {
            None
        }
    }

    /// Linear combination `a * u + b * v + c * w`.
    #[inline]
    pub fn combine(a: f64, u: &Vector3, b: f64, v: &Vector3, c: f64, w: &Vector3) -> Vector3 {
        [
            a * u[0] + b * v[0] + c * w[0],
            a * u[1] + b * v[1] + c * w[1],
            a * u[2] + b * v[2] + c * w[2],
        ]
    }
}

/// Cartesian state shared by ephemerides, propagators and trajectory samples.
pub mod state {
    use serde::{Deserialize, Serialize};

    use super::vector::{self, Vector3};

    /// Position (km) and velocity (km/s) relative to a central body.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct StateVector {
        pub position_km: Vector3,
        pub velocity_km_s: Vector3,
    }

    impl StateVector {
        pub fn new(position_km: Vector3, velocity_km_s: Vector3) -> Self {
            Self {
                position_km,
                velocity_km_s,
            }
        }

        /// Distance from the central body (km).
        pub fn radius_km(&self) -> f64 {
            vector::norm(&self.position_km)
        }

        /// Speed relative to the central body (km/s).
        pub fn speed_km_s(&self) -> f64 {
            vector::norm(&self.velocity_km_s)
        }

        /// Specific orbital energy (km^2/s^2) for the given gravitational parameter.
        pub fn specific_energy(&self, mu_km3_s2: f64) -> f64 {
            let v = self.speed_km_s();
            0.5 * v * v - mu_km3_s2 / self.radius_km()
        }

        /// Flat `[x, y, z, vx, vy, vz]` representation.
        pub fn to_array(&self) -> [f64; 6] {
            let [x, y, z] = self.position_km;
            let [vx, vy, vz] = self.velocity_km_s;
            [x, y, z, vx, vy, vz]
        }
    }
}

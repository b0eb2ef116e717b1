#![allow(dead_code)]

use mga_core::constants::{AU_KM, MU_SUN, SECONDS_PER_DAY};
use mga_ephemeris::{Body, KeplerEphemeris, SystemOfBodies};

pub const MU_EARTH: f64 = 398_600.4418;
pub const MU_MARS: f64 = 42_828.37;
pub const MU_JUPITER: f64 = 126_686_534.0;

pub fn days(value: f64) -> f64 {
    value * SECONDS_PER_DAY
}

fn circular(radius_km: f64, phase_deg: f64, mu: f64) -> KeplerEphemeris {
    KeplerEphemeris::circular(radius_km, phase_deg.to_radians(), 0.0, mu)
        .expect("circular ephemeris")
}

/// Sun-centred system with Earth, Mars and Jupiter on circular coplanar orbits,
/// phased so that Earth (t = 0) -> Mars (t = 200 d) -> Jupiter (t = 1200 d)
/// transfers are well posed.
pub fn heliocentric_system() -> SystemOfBodies {
    SystemOfBodies::new()
        .with_body(Body::new("Sun").with_gravitational_parameter(MU_SUN))
        .with_body(
            Body::new("Earth")
                .with_gravitational_parameter(MU_EARTH)
                .with_radius(6_378.1)
                .with_ephemeris(circular(AU_KM, 0.0, MU_SUN)),
        )
        .with_body(
            Body::new("Mars")
                .with_gravitational_parameter(MU_MARS)
                .with_radius(3_389.5)
                .with_ephemeris(circular(1.524 * AU_KM, 45.2, MU_SUN)),
        )
        .with_body(
            Body::new("Jupiter")
                .with_gravitational_parameter(MU_JUPITER)
                .with_radius(71_492.0)
                .with_ephemeris(circular(5.2 * AU_KM, 210.3, MU_SUN)),
        )
        .with_body(
            Body::new("Ceres")
                .with_gravitational_parameter(62.6)
                .with_radius(469.7)
                .with_ephemeris(circular(2.77 * AU_KM, 120.0, MU_SUN)),
        )
        .with_body(
            Body::new("Rock")
                .with_gravitational_parameter(1.0)
                .with_ephemeris(circular(2.0 * AU_KM, 90.0, MU_SUN)),
        )
}

/// Earth-centred system with two satellites on circular orbits.
pub fn geocentric_system() -> SystemOfBodies {
    SystemOfBodies::new()
        .with_body(Body::new("Earth").with_gravitational_parameter(MU_EARTH))
        .with_body(Body::new("Alpha").with_ephemeris(circular(30_000.0, 0.0, MU_EARTH)))
        .with_body(
            Body::new("Beta")
                .with_gravitational_parameter(4_902.8)
                .with_radius(1_737.4)
                .with_ephemeris(circular(104_000.0, 75.0, MU_EARTH)),
        )
}

pub fn earth_mars_jupiter_times() -> Vec<f64> {
    vec![0.0, days(200.0), days(1_200.0)]
}

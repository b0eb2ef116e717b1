use approx::assert_relative_eq;
use mga_core::constants::{AU_KM, MU_SUN, SECONDS_PER_DAY};
use mga_core::state::StateVector;
use mga_ephemeris::{
    Body, Ephemeris, EphemerisError, FixedStateEphemeris, KeplerEphemeris, SystemOfBodies,
};

#[test]
fn lookup_is_case_insensitive_and_reports_unknown_bodies() {
    let bodies = SystemOfBodies::new().with_body(Body::new("Earth").with_gravitational_parameter(398_600.4418));
    assert!(bodies.get("EARTH").is_ok());
    assert!(bodies.get("earth").is_ok());
    match bodies.get("Vulcan") {
        Err(EphemerisError::UnknownBody(name)) => assert_eq!(name, "Vulcan"),
        other => panic!("expected unknown body, got {other:?}"),
    }
}

#[test]
fn body_without_ephemeris_is_reported() {
    let body = Body::new("Sun").with_gravitational_parameter(MU_SUN);
    assert!(matches!(
        body.ephemeris(),
        Err(EphemerisError::MissingEphemeris(_))
    ));
}

#[test]
fn circular_kepler_ephemeris_completes_half_orbit() {
    let ephemeris = KeplerEphemeris::circular(AU_KM, 0.0, 0.0, MU_SUN).unwrap();
    let half_period = std::f64::consts::PI * (AU_KM.powi(3) / MU_SUN).sqrt();
    let state = ephemeris.state_at(half_period).unwrap();
    assert_relative_eq!(state.position_km[0], -AU_KM, max_relative = 1e-8);
    assert!(half_period / SECONDS_PER_DAY > 180.0);
}

#[test]
fn fixed_state_ephemeris_ignores_epoch() {
    let state = StateVector::new([1.0, 2.0, 3.0], [0.1, 0.2, 0.3]);
    let ephemeris = FixedStateEphemeris { state };
    assert_eq!(ephemeris.state_at(1.0e9).unwrap(), state);
}

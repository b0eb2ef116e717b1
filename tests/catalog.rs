use approx::assert_relative_eq;
use mga_planner::config::{SequenceConfig, load_bodies, load_trajectory};
use mga_planner::constants::AU_KM;
use mga_planner::transfer::bodies_from_config;

#[test]
fn body_catalog_contains_planets_with_ephemerides() {
    let configs = load_bodies("configs/bodies.yaml").expect("bodies yaml");
    assert!(configs.len() >= 7);
    let bodies = bodies_from_config(&configs).expect("system of bodies");

    let sun = bodies.get("SUN").expect("sun");
    assert!(sun.ephemeris.is_none());
    assert!(sun.gravitational_parameter_km3_s2.is_some());

    let earth = bodies.get("earth").expect("earth");
    let state = earth.ephemeris().unwrap().state_at(0.0).unwrap();
    assert_relative_eq!(state.radius_km(), AU_KM, max_relative = 1e-12);
    assert_relative_eq!(state.speed_km_s(), 29.78, epsilon = 0.01);
}

#[test]
fn inclined_catalog_orbit_leaves_the_ecliptic() {
    let configs = load_bodies("configs/bodies.yaml").expect("bodies yaml");
    let bodies = bodies_from_config(&configs).expect("system of bodies");
    let ceres = bodies.get("Ceres").unwrap().ephemeris().unwrap();
    let state = ceres.state_at(0.0).unwrap();
    assert!(state.position_km[2].abs() > 1.0e6);
}

#[test]
fn shipped_trajectories_parse() {
    let mga = load_trajectory("configs/trajectories/earth_mars_jupiter.yaml").expect("yaml");
    assert_eq!(mga.body_order, ["Earth", "Mars", "Jupiter"]);
    assert!(matches!(mga.sequence, SequenceConfig::Mga { .. }));

    let explicit = load_trajectory("configs/trajectories/earth_mars.toml").expect("toml");
    match explicit.sequence {
        SequenceConfig::Explicit { legs, nodes } => {
            assert_eq!(legs.len(), 1);
            assert_eq!(nodes.len(), 2);
        }
        other => panic!("unexpected sequence {other:?}"),
    }
    assert_eq!(explicit.leg_parameters_or_empty(), vec![Vec::<f64>::new()]);
}

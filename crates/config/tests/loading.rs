use std::fs;

use mga_config::{
    LegTypeConfig, NodeConfig, SequenceConfig, load_bodies, load_trajectory,
};

#[test]
fn yaml_catalog_parses_optional_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bodies.yaml");
    fs::write(
        &path,
        r#"
- name: Sun
  mu_km3_s2: 1.32712440018e11
- name: Earth
  mu_km3_s2: 398600.4418
  radius_km: 6378.1
  orbit:
    central_body: Sun
    semi_major_axis_km: 149597870.7
"#,
    )
    .unwrap();

    let bodies = load_bodies(&path).expect("catalog");
    assert_eq!(bodies.len(), 2);
    assert!(bodies[0].orbit.is_none());
    let orbit = bodies[1].orbit.as_ref().expect("earth orbit");
    assert_eq!(orbit.central_body, "Sun");
    assert_eq!(orbit.eccentricity, 0.0);
}

#[test]
fn toml_directory_is_loaded_in_name_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("b_mars.toml"), "name = \"Mars\"\nmu_km3_s2 = 42828.37\n").unwrap();
    fs::write(dir.path().join("a_earth.toml"), "name = \"Earth\"\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let bodies = load_bodies(dir.path()).expect("catalog directory");
    let names: Vec<_> = bodies.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Earth", "Mars"]);
    assert_eq!(bodies[0].mu_km3_s2, None);
}

#[test]
fn explicit_trajectory_description_parses() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("trajectory.yaml");
    fs::write(
        &path,
        r#"
central_body: Sun
body_order: [Earth, Mars]
sequence:
  type: explicit
  legs: [dsm_velocity_based]
  nodes:
    - type: departure
    - type: capture
      orbit: { semi_major_axis_km: 7000.0, eccentricity: 0.01 }
node_times_days: [0.0, 200.0]
leg_parameters: [[0.4]]
node_parameters: [[3.0, 0.0, 0.0], []]
"#,
    )
    .unwrap();

    let trajectory = load_trajectory(&path).expect("trajectory");
    match &trajectory.sequence {
        SequenceConfig::Explicit { legs, nodes } => {
            assert_eq!(legs, &[LegTypeConfig::DsmVelocityBased]);
            assert_eq!(nodes[0], NodeConfig::Departure { orbit: None });
            assert!(matches!(nodes[1], NodeConfig::Capture { orbit: Some(_) }));
        }
        other => panic!("unexpected sequence {other:?}"),
    }
    assert_eq!(trajectory.leg_parameters_or_empty(), vec![vec![0.4]]);
}

#[test]
fn mga_shorthand_defaults_parameters_to_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("trajectory.toml");
    fs::write(
        &path,
        r#"
central_body = "Sun"
body_order = ["Earth", "Mars", "Jupiter"]
node_times_days = [0.0, 200.0, 1200.0]

[sequence]
type = "mga"
leg_type = "unpowered"

[sequence.minimum_pericenters_km]
Mars = 3596.2
"#,
    )
    .unwrap();

    let trajectory = load_trajectory(&path).expect("trajectory");
    assert_eq!(trajectory.leg_parameters_or_empty().len(), 2);
    assert_eq!(trajectory.node_parameters_or_empty().len(), 3);
    match trajectory.sequence {
        SequenceConfig::Mga {
            leg_type,
            minimum_pericenters_km,
            departure_orbit,
            ..
        } => {
            assert_eq!(leg_type, LegTypeConfig::Unpowered);
            assert_eq!(minimum_pericenters_km.get("Mars"), Some(&3596.2));
            assert!(departure_orbit.is_none());
        }
        other => panic!("unexpected sequence {other:?}"),
    }
}

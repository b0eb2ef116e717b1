use approx::assert_relative_eq;
use mga_planner::config::{load_bodies, load_trajectory};
use mga_planner::constants::SECONDS_PER_DAY;
use mga_planner::ephemeris::SystemOfBodies;
use mga_planner::export::states::{StateRecord, write_states};
use mga_planner::export::writer_for_path;
use mga_planner::transfer::{
    TransferTrajectory, bodies_from_config, evaluate_from_config, trajectory_from_config,
};

fn catalog() -> SystemOfBodies {
    let configs = load_bodies("configs/bodies.yaml").expect("bodies yaml");
    bodies_from_config(&configs).expect("system of bodies")
}

fn evaluated(path: &str) -> TransferTrajectory {
    let bodies = catalog();
    let config = load_trajectory(path).expect("trajectory description");
    let mut trajectory = trajectory_from_config(&bodies, &config).expect("assemble");
    evaluate_from_config(&mut trajectory, &config).expect("evaluate");
    trajectory
}

fn assert_consistent(trajectory: &TransferTrajectory) {
    let nodes: f64 = trajectory.delta_v_per_node().unwrap().iter().sum();
    let legs: f64 = trajectory.delta_v_per_leg().unwrap().iter().sum();
    assert_relative_eq!(trajectory.delta_v().unwrap(), nodes + legs, max_relative = 1e-12);
    assert_eq!(
        trajectory.delta_v_per_node().unwrap().len(),
        trajectory.number_of_legs() + 1
    );
}

#[test]
fn dsm_velocity_chain_from_configuration() {
    let trajectory = evaluated("configs/trajectories/earth_mars_jupiter.yaml");
    assert_consistent(&trajectory);
    assert_eq!(
        trajectory.time_of_flight().unwrap(),
        1_200.0 * SECONDS_PER_DAY
    );
    // Free swingby cost is the periapsis impulse itself.
    assert_relative_eq!(trajectory.single_node_delta_v(1).unwrap(), 0.1, epsilon = 1e-12);
    assert!(trajectory.single_node_delta_v(2).unwrap() > 0.0);

    let mu_earth = 398_600.4418;
    let rp = 6_678.0;
    let escape = (3.0_f64.powi(2) + 2.0 * mu_earth / rp).sqrt() - (mu_earth / rp).sqrt();
    assert_relative_eq!(trajectory.single_node_delta_v(0).unwrap(), escape, max_relative = 1e-12);
}

#[test]
fn explicit_sequences_from_configuration() {
    let direct = evaluated("configs/trajectories/earth_mars.toml");
    assert_consistent(&direct);
    assert_eq!(direct.delta_v_per_leg().unwrap(), vec![0.0]);

    let venus = evaluated("configs/trajectories/earth_venus_mars.yaml");
    assert_consistent(&venus);
    assert!(venus.single_leg_delta_v(0).unwrap() > 0.0);
    assert_eq!(venus.single_leg_delta_v(1).unwrap(), 0.0);
}

#[test]
fn sampled_states_export_to_csv() {
    let trajectory = evaluated("configs/trajectories/earth_mars_jupiter.yaml");
    let samples_per_leg = 20;
    let states = trajectory.states_along_trajectory(samples_per_leg).unwrap();
    let records: Vec<StateRecord> = states
        .iter()
        .enumerate()
        .map(|(index, (epoch, state))| {
            StateRecord::new(index / samples_per_leg, *epoch, state.to_array())
        })
        .collect();

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("states.csv");
    {
        let mut writer = writer_for_path(&path).expect("writer");
        write_states(&mut writer, &records).expect("write");
    }

    let mut reader = csv::Reader::from_path(&path).expect("csv reader");
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(headers.get(1), Some("epoch_s"));
    let epochs: Vec<f64> = reader
        .records()
        .map(|row| row.expect("row")[1].parse::<f64>().expect("epoch"))
        .collect();
    assert_eq!(epochs.len(), 2 * samples_per_leg);
    assert!(epochs.windows(2).all(|pair| pair[1] > pair[0]));
}

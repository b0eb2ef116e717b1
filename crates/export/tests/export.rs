use std::fs;

use mga_export::states::{StateRecord, write_states};
use mga_export::summary::{LegSummary, NodeSummary, TrajectorySummary, write_summary};
use mga_export::writer_for_path;

fn summary() -> TrajectorySummary {
    TrajectorySummary {
        name: Some("earth-mars".to_string()),
        central_body: "Sun".to_string(),
        body_order: vec!["Earth".to_string(), "Mars".to_string()],
        delta_v_km_s: 6.5,
        time_of_flight_s: 17_280_000.0,
        time_of_flight_days: 200.0,
        nodes: vec![
            NodeSummary {
                index: 0,
                body: "Earth".to_string(),
                model: "departure with fixed outgoing velocity".to_string(),
                epoch_s: 0.0,
                delta_v_km_s: 3.5,
                periapsis_km: None,
            },
            NodeSummary {
                index: 1,
                body: "Mars".to_string(),
                model: "capture and insertion".to_string(),
                epoch_s: 17_280_000.0,
                delta_v_km_s: 3.0,
                periapsis_km: None,
            },
        ],
        legs: vec![LegSummary {
            index: 0,
            from: "Earth".to_string(),
            to: "Mars".to_string(),
            model: "unpowered unperturbed".to_string(),
            time_of_flight_days: 200.0,
            delta_v_km_s: 0.0,
            dsm_epoch_s: None,
        }],
    }
}

#[test]
fn state_table_has_header_and_one_row_per_sample() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("out/states.csv");
    let records = [
        StateRecord::new(0, 0.0, [1.0, 2.0, 3.0, 0.1, 0.2, 0.3]),
        StateRecord::new(0, 86_400.0, [4.0, 5.0, 6.0, 0.4, 0.5, 0.6]),
    ];
    {
        let mut writer = writer_for_path(&path).expect("writer");
        write_states(&mut writer, &records).expect("write states");
    }

    let contents = fs::read_to_string(&path).expect("read back");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines[0],
        "leg,epoch_s,epoch_days,x_km,y_km,z_km,vx_km_s,vy_km_s,vz_km_s"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("0,86400.0,1.0,4.0,"));
}

#[test]
fn summary_json_round_trips_key_fields() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("summary.json");
    {
        let mut writer = writer_for_path(&path).expect("writer");
        write_summary(&mut writer, &summary()).expect("write summary");
    }

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read back")).expect("json");
    assert_eq!(value["central_body"], "Sun");
    assert_eq!(value["nodes"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["legs"][0]["delta_v_km_s"], 0.0);
    assert!(value["nodes"][0].get("periapsis_km").is_none());
}

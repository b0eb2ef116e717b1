//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod states {
    use std::io::{self, Write};

    use serde::Serialize;

    /// One sampled spacecraft state; column order follows field order.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct StateRecord {
        pub leg: usize,
        pub epoch_s: f64,
        pub epoch_days: f64,
        pub x_km: f64,
        pub y_km: f64,
        pub z_km: f64,
        pub vx_km_s: f64,
        pub vy_km_s: f64,
        pub vz_km_s: f64,
    }

    impl StateRecord {
        pub fn new(leg: usize, epoch_s: f64, state: [f64; 6]) -> Self {
            Self {
                leg,
                epoch_s,
                epoch_days: epoch_s / 86_400.0,
                x_km: state[0],
                y_km: state[1],
                z_km: state[2],
                vx_km_s: state[3],
                vy_km_s: state[4],
                vz_km_s: state[5],
            }
        }
    }

    /// Write the state table as CSV with a header row.
    pub fn write_states(writer: &mut dyn Write, records: &[StateRecord]) -> io::Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        for record in records {
            csv.serialize(record)?;
        }
        csv.flush()
    }
}

pub mod summary {
    use std::io::{self, Write};

    use serde::Serialize;
    use serde_json::to_writer_pretty;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct NodeSummary {
        pub index: usize,
        pub body: String,
        pub model: String,
        pub epoch_s: f64,
        pub delta_v_km_s: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub periapsis_km: Option<f64>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct LegSummary {
        pub index: usize,
        pub from: String,
        pub to: String,
        pub model: String,
        pub time_of_flight_days: f64,
        pub delta_v_km_s: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub dsm_epoch_s: Option<f64>,
    }

    /// JSON summary of one evaluated trajectory.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct TrajectorySummary {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        pub central_body: String,
        pub body_order: Vec<String>,
        pub delta_v_km_s: f64,
        pub time_of_flight_s: f64,
        pub time_of_flight_days: f64,
        pub nodes: Vec<NodeSummary>,
        pub legs: Vec<LegSummary>,
    }

    /// Pretty-printed JSON followed by a trailing newline.
    pub fn write_summary(writer: &mut dyn Write, summary: &TrajectorySummary) -> io::Result<()> {
        to_writer_pretty(&mut *writer, summary)?;
        writeln!(writer)?;
        writer.flush()
    }
}

//! Configuration models and loaders for body catalogs and trajectory descriptions.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Body entry parsed from a catalog manifest.
#[derive(Debug, Deserialize, Clone)]
pub struct BodyConfig {
    pub name: String,
    #[serde(default)]
    pub mu_km3_s2: Option<f64>,
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub orbit: Option<OrbitConfig>,
}

/// Osculating elements of a body about its parent at a reference epoch.
#[derive(Debug, Deserialize, Clone)]
pub struct OrbitConfig {
    pub central_body: String,
    pub semi_major_axis_km: f64,
    #[serde(default)]
    pub eccentricity: f64,
    #[serde(default)]
    pub inclination_deg: f64,
    #[serde(default)]
    pub raan_deg: f64,
    #[serde(default)]
    pub argument_of_periapsis_deg: f64,
    #[serde(default)]
    pub true_anomaly_deg: f64,
    #[serde(default)]
    pub reference_epoch_days: f64,
}

/// Parking orbit imposed at a departure or capture node.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct OrbitConstraintConfig {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
}

/// Leg kinematics selected in a trajectory description.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LegTypeConfig {
    Unpowered,
    DsmPositionBased,
    DsmVelocityBased,
}

/// Node entry in an explicit trajectory description.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum NodeConfig {
    #[serde(rename = "departure")]
    Departure {
        #[serde(default)]
        orbit: Option<OrbitConstraintConfig>,
    },
    #[serde(rename = "swingby")]
    Swingby {
        #[serde(default)]
        minimum_periapsis_km: Option<f64>,
    },
    #[serde(rename = "capture")]
    Capture {
        #[serde(default)]
        orbit: Option<OrbitConstraintConfig>,
    },
}

/// How the legs and nodes of a trajectory are declared.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum SequenceConfig {
    /// Multiple gravity-assist shorthand: one leg type for every leg.
    #[serde(rename = "mga")]
    Mga {
        leg_type: LegTypeConfig,
        #[serde(default)]
        departure_orbit: Option<OrbitConstraintConfig>,
        #[serde(default)]
        arrival_orbit: Option<OrbitConstraintConfig>,
        #[serde(default)]
        minimum_pericenters_km: BTreeMap<String, f64>,
    },
    #[serde(rename = "explicit")]
    Explicit {
        legs: Vec<LegTypeConfig>,
        nodes: Vec<NodeConfig>,
    },
}

/// Complete trajectory description: structure plus one evaluation request.
#[derive(Debug, Deserialize, Clone)]
pub struct TrajectoryConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub central_body: String,
    pub body_order: Vec<String>,
    pub sequence: SequenceConfig,
    pub node_times_days: Vec<f64>,
    #[serde(default)]
    pub leg_parameters: Vec<Vec<f64>>,
    #[serde(default)]
    pub node_parameters: Vec<Vec<f64>>,
}

impl TrajectoryConfig {
    /// Leg parameters, defaulting to empty vectors when none were given.
    pub fn leg_parameters_or_empty(&self) -> Vec<Vec<f64>> {
        if self.leg_parameters.is_empty() {
            vec![Vec::new(); self.body_order.len().saturating_sub(1)]
        } else {
            self.leg_parameters.clone()
        }
    }

    /// Node parameters, defaulting to empty vectors when none were given.
    pub fn node_parameters_or_empty(&self) -> Vec<Vec<f64>> {
        if self.node_parameters.is_empty() {
            vec![Vec::new(); self.body_order.len()]
        } else {
            self.node_parameters.clone()
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("configuration at {0} holds no trajectory")]
    Empty(PathBuf),
}

/// Load body catalog entries from a YAML file, a TOML file, or a directory of TOML files.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    load_records(path)
}

/// Load a single trajectory description from a YAML or TOML file.
pub fn load_trajectory<P: AsRef<Path>>(path: P) -> Result<TrajectoryConfig, ConfigError> {
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&contents)?);
    }
    let reader = File::open(path)?;
    let records: serde_yaml::Value = serde_yaml::from_reader(reader)?;
    if records.is_null() {
        return Err(ConfigError::Empty(path.to_path_buf()));
    }
    Ok(serde_yaml::from_value(records)?)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

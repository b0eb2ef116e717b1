use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use mga_planner::config::{load_bodies, load_trajectory};
use mga_planner::constants::SECONDS_PER_DAY;
use mga_planner::export::states::{StateRecord, write_states};
use mga_planner::export::summary::{LegSummary, NodeSummary, TrajectorySummary, write_summary};
use mga_planner::export::writer_for_path;
use mga_planner::transfer::{
    TransferTrajectory, bodies_from_config, evaluate_from_config, print_parameter_definitions,
    settings_from_config, trajectory_from_config,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Evaluate multi-leg gravity-assist transfer trajectories"
)]
struct Cli {
    /// Trajectory description (YAML or TOML)
    trajectory: PathBuf,

    /// Body catalog (YAML file, TOML file or directory of TOML files)
    #[arg(long, default_value = "configs/bodies.yaml")]
    bodies: PathBuf,

    /// Print the free-parameter layout of the trajectory and exit
    #[arg(long, default_value_t = false)]
    print_parameters: bool,

    /// Write sampled states as CSV (`-` for stdout)
    #[arg(long)]
    states: Option<PathBuf>,

    /// Samples per leg when exporting states
    #[arg(long, default_value_t = 50)]
    samples_per_leg: usize,

    /// Write a JSON summary (`-` for stdout)
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = load_trajectory(&cli.trajectory)
        .with_context(|| format!("loading trajectory {}", cli.trajectory.display()))?;

    if cli.print_parameters {
        let (legs, nodes) = settings_from_config(&config);
        print_parameter_definitions(&legs, &nodes)?;
        return Ok(());
    }

    let catalog = load_bodies(&cli.bodies)
        .with_context(|| format!("loading bodies {}", cli.bodies.display()))?;
    let bodies = bodies_from_config(&catalog)?;
    info!("loaded {} bodies from {}", bodies.len(), cli.bodies.display());

    let mut trajectory = trajectory_from_config(&bodies, &config)?;
    evaluate_from_config(&mut trajectory, &config)?;

    let summary = summarize(&trajectory, config.name.clone())?;
    print_report(&summary);

    if let Some(path) = &cli.states {
        let records = state_records(&trajectory, cli.samples_per_leg)?;
        let mut writer = writer_for_path(path)?;
        write_states(&mut writer, &records)?;
        info!("wrote {} states to {}", records.len(), path.display());
    }

    if let Some(path) = &cli.summary {
        let mut writer = writer_for_path(path)?;
        write_summary(&mut writer, &summary)?;
    }

    Ok(())
}

fn summarize(
    trajectory: &TransferTrajectory,
    name: Option<String>,
) -> anyhow::Result<TrajectorySummary> {
    let evaluation = trajectory.last_evaluation()?;
    let nodes = trajectory
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| NodeSummary {
            index,
            body: node.body().to_string(),
            model: node.variant().to_string(),
            epoch_s: evaluation.node_times_s[index],
            delta_v_km_s: evaluation.node_delta_v_km_s[index],
            periapsis_km: evaluation.node_periapsis_km[index],
        })
        .collect();
    let legs = trajectory
        .legs()
        .iter()
        .zip(&evaluation.legs)
        .enumerate()
        .map(|(index, (leg, solution))| LegSummary {
            index,
            from: leg.departure_body().to_string(),
            to: leg.arrival_body().to_string(),
            model: leg.settings().to_string(),
            time_of_flight_days: (solution.arrival_epoch_s - solution.departure_epoch_s)
                / SECONDS_PER_DAY,
            delta_v_km_s: solution.delta_v_km_s,
            dsm_epoch_s: solution.maneuver.map(|dsm| dsm.epoch_s),
        })
        .collect();

    Ok(TrajectorySummary {
        name,
        central_body: trajectory.central_body().to_string(),
        body_order: trajectory.body_order().to_vec(),
        delta_v_km_s: evaluation.delta_v_km_s,
        time_of_flight_s: evaluation.time_of_flight_s,
        time_of_flight_days: evaluation.time_of_flight_s / SECONDS_PER_DAY,
        nodes,
        legs,
    })
}

fn state_records(
    trajectory: &TransferTrajectory,
    samples_per_leg: usize,
) -> anyhow::Result<Vec<StateRecord>> {
    let states = trajectory.states_along_trajectory(samples_per_leg)?;
    Ok(states
        .iter()
        .enumerate()
        .map(|(index, (epoch, state))| {
            StateRecord::new(index / samples_per_leg.max(1), *epoch, state.to_array())
        })
        .collect())
}

fn print_report(summary: &TrajectorySummary) {
    println!("=== Transfer Trajectory ===");
    if let Some(name) = &summary.name {
        println!("Name           : {name}");
    }
    println!(
        "Sequence       : {} (about {})",
        summary.body_order.join(" -> "),
        summary.central_body
    );
    println!(
        "Total          : Δv = {:.3} km/s, TOF = {:.2} days",
        summary.delta_v_km_s, summary.time_of_flight_days
    );
    for node in &summary.nodes {
        let periapsis = node
            .periapsis_km
            .map(|rp| format!(", r_p = {rp:.1} km"))
            .unwrap_or_default();
        println!(
            "Node {:<2} {:<8}: Δv = {:.3} km/s at day {:.2} [{}]{}",
            node.index,
            node.body,
            node.delta_v_km_s,
            node.epoch_s / SECONDS_PER_DAY,
            node.model,
            periapsis
        );
    }
    for leg in &summary.legs {
        println!(
            "Leg  {:<2} {} -> {}: Δv = {:.3} km/s over {:.2} days [{}]",
            leg.index, leg.from, leg.to, leg.delta_v_km_s, leg.time_of_flight_days, leg.model
        );
    }
}

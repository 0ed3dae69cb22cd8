//! Opinion Cascade Simulation
//!
//! Builds the composed network from configuration, runs the cascade and
//! writes the edge list, per-tick snapshots, cascade events and run
//! statistics to the output directory.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use opinion_core::config::DEFAULT_CONFIG_PATH;
use opinion_core::output::{
    write_edge_list_file, write_stats, EventLogger, SnapshotLogger, StatsCollector,
    EDGE_LIST_FILE_NAME, EVENTS_FILE_NAME, SNAPSHOTS_FILE_NAME,
};
use opinion_core::{
    BuildError, ConfigError, ConfigurationError, OutputError, SimConfig, SimulationEngine,
};

/// Metadata file name inside the output directory
const METADATA_FILE_NAME: &str = "metadata.json";

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "opinion_sim")]
#[command(about = "Opinion cascade simulation on a composite scale-free network")]
struct Args {
    /// TOML configuration file (defaults to opinion.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Named preset used when no configuration file is given
    #[arg(long, value_parser = ["polarized", "mixed"])]
    preset: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Output directory for simulation files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Skip writing any output files
    #[arg(long)]
    no_export: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigurationError),

    #[error("failed to build network: {0}")]
    Build(#[from] BuildError),

    #[error("failed to write output: {0}")]
    Output(#[from] OutputError),

    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<SimConfig, RunError> {
    let mut config = if let Some(path) = &args.config {
        SimConfig::from_file(path)?
    } else if let Some(name) = &args.preset {
        SimConfig::preset(name).ok_or_else(|| RunError::UnknownPreset(name.clone()))?
    } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
        SimConfig::from_file(DEFAULT_CONFIG_PATH)?
    } else {
        SimConfig::default()
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.simulation.max_ticks = ticks;
    }
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.display().to_string();
    }
    if args.no_export {
        config.output.write_edge_list = false;
        config.output.write_snapshots = false;
        config.output.write_events = false;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<(), RunError> {
    let config = load_config(&args)?;
    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    info!(
        seed = config.seed,
        positive = config.network.positive_count,
        negative = config.network.negative_count,
        max_ticks = config.simulation.max_ticks,
        "starting opinion cascade simulation"
    );

    let mut engine = SimulationEngine::from_config(&config)?;
    let output = &config.output;
    let dir = PathBuf::from(&output.directory);
    let exporting = output.write_edge_list || output.write_snapshots || output.write_events;
    if exporting {
        fs::create_dir_all(&dir).map_err(OutputError::from)?;
    }

    if output.write_edge_list {
        let edges = write_edge_list_file(
            dir.join(EDGE_LIST_FILE_NAME),
            engine.graph(),
            engine.population(),
        )?;
        info!(edges, "edge list written");
    }

    let mut snapshots = if output.write_snapshots {
        SnapshotLogger::new(dir.join(SNAPSHOTS_FILE_NAME))?
    } else {
        SnapshotLogger::null()
    };
    let mut events = if output.write_events {
        EventLogger::new(dir.join(EVENTS_FILE_NAME))?
    } else {
        EventLogger::null()
    };
    let mut stats = StatsCollector::new();

    let initial = engine.snapshot(output.histogram_bins);
    snapshots.log(&initial)?;
    stats.record(&initial, &[]);

    while let Some(report) = engine.step() {
        let snapshot = engine.snapshot(output.histogram_bins);
        snapshots.log(&snapshot)?;
        events.log_batch(&report.events)?;
        stats.record(&snapshot, &report.events);
    }
    snapshots.flush()?;
    events.flush()?;

    let summary = engine.summary();
    let stop_reason = summary.stop_reason.map(|r| r.label().to_string());
    info!(
        ticks = summary.ticks,
        stop_reason = stop_reason.as_deref().unwrap_or("none"),
        initial_active = summary.initial_active,
        final_active = summary.final_active,
        opinion_range = summary.opinion_range(),
        events = summary.events,
        "simulation complete"
    );

    if exporting {
        write_stats(&stats.generate_stats(summary.ticks, stop_reason), &dir)?;
        let metadata = engine.metadata(config.seed);
        let json = serde_json::to_string_pretty(&metadata).map_err(OutputError::from)?;
        fs::write(dir.join(METADATA_FILE_NAME), json).map_err(OutputError::from)?;
        info!(dir = %dir.display(), "output written");
    } else {
        info!("export disabled, no files written");
    }

    Ok(())
}

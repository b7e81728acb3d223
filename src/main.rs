use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use pharma_redistribution::config::DEFAULT_LOG_FILTER;
use pharma_redistribution::reporting::{banner, render_alerts, render_overview, render_plan};
use pharma_redistribution::{
    detect_stockouts, network_overview, plan_alerts, FacilityRegistry, RedistributionConfig, Result,
};

#[derive(Parser, Debug)]
#[command(name = "pharma-redistribution")]
#[command(about = "Detect drug stockouts and rank the best facilities to resupply them")]
#[command(version)]
struct Args {
    /// Facility registry JSON file (built-in demo network if omitted)
    #[arg(short, long)]
    registry: Option<PathBuf>,

    /// Configuration JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Detection horizon in days
    #[arg(long)]
    horizon: Option<u32>,

    /// Sources to show per alert
    #[arg(long)]
    top: Option<usize>,

    /// Only plan the N most urgent alerts
    #[arg(long)]
    max_alerts: Option<usize>,

    /// Monte Carlo runs per alert
    #[arg(long)]
    simulations: Option<usize>,

    /// Random seed for demand sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { DEFAULT_LOG_FILTER };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => RedistributionConfig::load(path)?,
        None => RedistributionConfig::default(),
    };
    if let Some(horizon) = args.horizon {
        config.horizon_days = horizon;
    }
    if let Some(top) = args.top {
        config.max_sources = top;
    }
    if let Some(max_alerts) = args.max_alerts {
        config.max_alerts = Some(max_alerts);
    }
    if let Some(simulations) = args.simulations {
        config.simulations = simulations;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;

    let registry = match &args.registry {
        Some(path) => FacilityRegistry::load(path)?,
        None => FacilityRegistry::builtin(),
    };

    println!("{}\n", banner("SMART DRUG REDISTRIBUTION"));

    let alerts = detect_stockouts(&registry, config.horizon_days)?;
    println!("{}\n", banner("STOCKOUT ALERTS"));
    println!("{}\n", render_alerts(&alerts));

    if !alerts.is_empty() {
        println!("{}\n", banner("ROUTE RECOMMENDATIONS"));
        for plan in plan_alerts(&registry, &alerts, &config)? {
            println!("{}\n", render_plan(&plan));
        }
    }

    println!("{}\n", banner("NETWORK OVERVIEW"));
    println!("{}", render_overview(&network_overview(&registry, &alerts)));
    Ok(())
}

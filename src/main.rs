//! Walkability CLI
//!
//! Plans greedy nearest-category walking routes from a home position.
//!
//! Usage:
//!     walkability --catalog pois.json --address "330 De Neve Dr" -r coffee_shop,library
//!     walkability --catalog pois.csv --coords 34.0677,-118.4421 --offline -r museum -r restaurant
//!     walkability --config walkability.toml -r desserts --json --geojson routes.geojson

mod cli;
mod report;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use walkability_core::Walkability;

use cli::Cli;
use report::Report;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.load_config()?;
    let session = Walkability::from_config(&config).context("Failed to build session")?;

    let resolution = session.home_resolution();
    if resolution.is_degraded() {
        warn!("Using default home: {resolution:?}");
    }

    let routes = cli.resolve_routes(session.registry())?;
    let snapshot = session.snapshot();
    let results = session.plan_many(&routes);
    info!("Planned {} routes", results.len());

    let report = Report::new(&snapshot, &routes, &results);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    if let Some(path) = &cli.geojson {
        report::write_geojson(path, snapshot.points(), &results)?;
        info!("Routes written to {}", path.display());
    }

    Ok(if report.all_planned() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

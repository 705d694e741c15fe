use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use walkability_core::loading::{ProviderKind, WalkabilityConfig};
use walkability_core::prelude::*;

pub const API_KEY_ENV: &str = "WALKABILITY_API_KEY";

/// Walkability - chain nearby points of interest into walking routes
#[derive(Parser, Debug)]
#[command(name = "walkability")]
#[command(version)]
#[command(about = "Plan greedy nearest-category walking routes from home", long_about = None)]
pub struct Cli {
    /// Point-of-interest catalog (JSON or CSV), overrides the config file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Home address, geocoded before planning
    #[arg(long, conflicts_with = "coords")]
    pub address: Option<String>,

    /// Home coordinates as LAT,LON
    #[arg(long, value_parser = parse_coords, allow_hyphen_values = true)]
    pub coords: Option<(f64, f64)>,

    /// Estimate walking costs from straight-line distance instead of Google Maps
    #[arg(long)]
    pub offline: bool,

    /// Comma-separated categories of one route, e.g. coffee_shop,library.
    /// Repeat for more routes.
    #[arg(short, long = "route", required = true, value_parser = parse_route)]
    pub routes: Vec<RouteArg>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the planned routes to a GeoJSON file
    #[arg(long)]
    pub geojson: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Reads the configuration file, if any, and applies the command-line
    /// overrides on top of it.
    pub fn load_config(&self) -> anyhow::Result<WalkabilityConfig> {
        let mut config: WalkabilityConfig = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config '{}'", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("Invalid config '{}'", path.display()))?
            }
            None => WalkabilityConfig::default(),
        };

        if let Some(catalog) = &self.catalog {
            config.catalog = Some(catalog.clone());
        }
        if let Some(address) = &self.address {
            config.home = Some(HomeAddress::text(address.clone()));
        }
        if let Some((lat, lon)) = self.coords {
            config.home = Some(HomeAddress::coordinates(lat, lon));
        }
        if self.offline {
            config.provider.kind = ProviderKind::StraightLine;
        }
        if config.provider.api_key.is_none() {
            config.provider.api_key = std::env::var(API_KEY_ENV).ok();
        }

        Ok(config)
    }

    /// Resolves the requested routes against the session's categories.
    pub fn resolve_routes(&self, registry: &CategoryRegistry) -> anyhow::Result<Vec<Vec<Category>>> {
        self.routes
            .iter()
            .map(|route| {
                route
                    .0
                    .iter()
                    .map(|name| registry.resolve(name))
                    .collect::<Result<Vec<_>, _>>()
                    .with_context(|| format!("Invalid route '{}'", route.0.join(",")))
            })
            .collect()
    }
}

fn parse_coords(s: &str) -> Result<(f64, f64), String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{s}'"))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid latitude '{lat}': {e}"))?;
    let lon = lon
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid longitude '{lon}': {e}"))?;
    Ok((lat, lon))
}

/// Category names of one `--route` argument
#[derive(Debug, Clone, PartialEq)]
pub struct RouteArg(pub Vec<String>);

/// An empty string is the empty route (home and straight back).
fn parse_route(s: &str) -> Result<RouteArg, String> {
    Ok(RouteArg(
        s.split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect(),
    ))
}

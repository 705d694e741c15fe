use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use walkability_core::Walkability;
use walkability_core::loading::ProviderKind;
use walkability_server::{ServerConfig, run_server};

const API_KEY_ENV: &str = "WALKABILITY_API_KEY";

#[derive(Parser, Debug)]
#[command(name = "walkability-server", version, about = "Walkability route planning over HTTP")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Point-of-interest catalog (JSON or CSV), overrides the config file
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Address to listen on, overrides the config file
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Estimate walking costs from straight-line distance instead of Google Maps
    #[arg(long)]
    offline: bool,
}

impl Args {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(catalog) = self.catalog {
            config.walkability.catalog = Some(catalog);
        }
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if self.offline {
            config.walkability.provider.kind = ProviderKind::StraightLine;
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    if config.walkability.provider.api_key.is_none() {
        config.walkability.provider.api_key = std::env::var(API_KEY_ENV).ok();
    }

    // The session talks to providers through blocking HTTP clients, so it is
    // built and dropped outside the async runtime.
    let session = Arc::new(
        Walkability::from_config(&config.walkability).context("Failed to build session")?,
    );
    info!("Home resolution: {:?}", session.home_resolution());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    runtime.block_on(run_server(session.clone(), config.server))?;
    drop(runtime);

    drop(session);
    Ok(())
}

//! Name Registry Gateway
//!
//! Serves forward and reverse resolution over HTTP from an in-process registry.

use anyhow::Result;
use clap::Parser;
use namereg_gateway::{
    router,
    seed::{apply_seed, load_seed},
    AppState, GatewayConfig,
};
use namereg_registry::{
    InMemoryFunds, InMemoryOwnershipLedger, NameRegistry, NameResolver, SystemClock,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "namereg-gateway")]
#[command(about = "Name Registry resolution gateway")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON file of registrations to apply at startup
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = GatewayConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(seed) = cli.seed {
        config.seed_file = Some(seed);
    }

    init_logging(&config);

    if config.registry.admin.is_zero() {
        warn!("no admin configured; administrative operations are disabled");
    }

    let registry = Arc::new(NameRegistry::new(
        config.registry.clone(),
        Arc::new(InMemoryOwnershipLedger::new()),
        Arc::new(InMemoryFunds::new()),
        Arc::new(SystemClock),
    )?);

    if let Some(path) = &config.seed_file {
        let entries = load_seed(path)?;
        let applied = apply_seed(&registry, &entries);
        info!(applied, total = entries.len(), "seed file applied");
    }

    let app = router(AppState::new(NameResolver::new(registry)));

    let addr = config.bind_addr();
    info!("Name registry gateway starting on {}", addr);
    info!("Resolving names under suffix {}", config.registry.suffix);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &GatewayConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}

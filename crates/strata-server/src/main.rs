//! Strata production server
//!
//! Multi-tenant gateway: every inbound request is routed to its tenant's
//! partition from the request hostname before any business code runs.
//!
//! Usage:
//! ```bash
//! # With config file
//! strata-server --config strata.toml
//!
//! # Or with environment variables
//! STRATA_BASE_DOMAIN=example.com strata-server
//! ```

mod config;

use clap::Parser;
use config::ServerConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use strata_files::TenantFileStore;
use strata_gateway::{build_app, GatewayState};
use strata_lifecycle::collaborators::{
    LoggingEmployeeDirectory, LoggingStructureProvisioner, LoggingUserActivation,
};
use strata_lifecycle::{LifecycleConfig, LifecycleManager};
use strata_registry_sqlite::SqlitePartitionStore;
use strata_resolver::DomainResolver;

/// Strata Server - Multi-Tenant SaaS Gateway
#[derive(Parser)]
#[command(name = "strata-server")]
#[command(about = "Strata multi-tenant gateway server", long_about = None)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "FILE", env = "STRATA_CONFIG")]
    config: Option<String>,
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("failed to load config {}: {}", path, e))?,
        None => ServerConfig::default(),
    };
    config.merge_env();

    init_tracing(&config.logging.level)?;

    let db_path = PathBuf::from(shellexpand::tilde(&config.database_path).to_string());
    let storage_root = PathBuf::from(shellexpand::tilde(&config.storage_root).to_string());

    let store = Arc::new(SqlitePartitionStore::new(&db_path).await?);
    let resolver = Arc::new(DomainResolver::new(store.clone()));
    let lifecycle = Arc::new(LifecycleManager::new(
        store,
        Arc::new(LoggingStructureProvisioner),
        Arc::new(LoggingEmployeeDirectory),
        Arc::new(LoggingUserActivation),
        LifecycleConfig {
            base_domain: config.base_domain.clone(),
            structure_timeout: Duration::from_secs(config.structure_timeout_secs),
        },
    ));
    let files = Arc::new(TenantFileStore::new(storage_root));

    let app = build_app(GatewayState::new(resolver, lifecycle, files));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        addr = %addr,
        base_domain = %config.base_domain,
        registry = %db_path.display(),
        "strata server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

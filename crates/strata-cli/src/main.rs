//! Strata CLI
//!
//! Administrative command-line interface for the tenant registry:
//! provisioning, deactivation, reactivation, and inspection.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use strata_core::tenant::OwnerId;
use strata_lifecycle::collaborators::{
    LoggingEmployeeDirectory, LoggingStructureProvisioner, LoggingUserActivation,
};
use strata_lifecycle::{LifecycleConfig, LifecycleManager, ProvisionRequest};
use strata_registry_sqlite::SqlitePartitionStore;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Strata - Multi-tenant partition administration", long_about = None)]
struct Cli {
    /// Path to the registry database
    #[arg(long, default_value = "~/.strata/registry.db", env = "STRATA_DATABASE_PATH")]
    db: PathBuf,

    /// Base domain for tenant hostnames
    #[arg(long, default_value = "localhost", env = "STRATA_BASE_DOMAIN")]
    base_domain: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision a new tenant with its own isolated partition
    Provision {
        /// Display name of the company
        name: String,

        /// Partition identifier and hostname label
        slug: String,

        /// Numeric owner identity in the account system
        #[arg(long)]
        owner: i64,

        /// Opaque metadata as a JSON object
        #[arg(long, default_value = "{}")]
        metadata: String,
    },
    /// Deactivate a tenant, freeing its hostname without destroying data
    Deactivate { slug: String },
    /// Reactivate a deactivated tenant, restoring its hostname
    Reactivate { slug: String },
    /// List all active tenants
    List,
}

async fn open_manager(db: &PathBuf, base_domain: &str) -> anyhow::Result<LifecycleManager> {
    let db_path = PathBuf::from(shellexpand::tilde(&db.to_string_lossy()).to_string());
    let store = Arc::new(SqlitePartitionStore::new(&db_path).await?);

    Ok(LifecycleManager::new(
        store,
        Arc::new(LoggingStructureProvisioner),
        Arc::new(LoggingEmployeeDirectory),
        Arc::new(LoggingUserActivation),
        LifecycleConfig {
            base_domain: base_domain.to_string(),
            structure_timeout: Duration::from_secs(30),
        },
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let manager = open_manager(&cli.db, &cli.base_domain).await?;

    match cli.command {
        Commands::Provision {
            name,
            slug,
            owner,
            metadata,
        } => {
            let metadata: serde_json::Value = serde_json::from_str(&metadata)?;
            let tenant = manager
                .provision(
                    ProvisionRequest::new(name, slug, OwnerId(owner)).with_metadata(metadata),
                )
                .await?;
            println!(
                "Provisioned '{}' ({}) at {}",
                tenant.name,
                tenant.slug,
                manager.primary_hostname(&tenant.slug)
            );
        }
        Commands::Deactivate { slug } => {
            let tenant = manager.deactivate(&slug).await?;
            println!("Deactivated '{}'; its hostname is released", tenant.slug);
        }
        Commands::Reactivate { slug } => {
            let tenant = manager.reactivate(&slug).await?;
            println!(
                "Reactivated '{}' at {}",
                tenant.slug,
                manager.primary_hostname(&tenant.slug)
            );
        }
        Commands::List => {
            let tenants = manager.list_active().await?;
            if tenants.is_empty() {
                println!("No active tenants");
            }
            for tenant in tenants {
                println!(
                    "{:<24} {:<32} owner={} created={}",
                    tenant.slug,
                    tenant.name,
                    tenant.owner,
                    tenant.created_at.format("%Y-%m-%d")
                );
            }
        }
    }

    Ok(())
}

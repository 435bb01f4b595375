//! Shared helpers for Strata integration tests

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use strata_core::collaborators::{EmployeeDirectory, StructureProvisioner, UserActivation};
use strata_files::TenantFileStore;
use strata_lifecycle::collaborators::{
    LoggingEmployeeDirectory, LoggingStructureProvisioner, LoggingUserActivation,
};
use strata_lifecycle::{LifecycleConfig, LifecycleManager};
use strata_registry_sqlite::SqlitePartitionStore;
use strata_resolver::DomainResolver;

pub const BASE_DOMAIN: &str = "example.com";

/// A complete wired system against a temporary registry and storage root.
pub struct TestHarness {
    pub store: Arc<SqlitePartitionStore>,
    pub manager: Arc<LifecycleManager>,
    pub resolver: DomainResolver,
    pub files: Arc<TenantFileStore>,
    dir: TempDir,
}

impl TestHarness {
    /// Harness with the default logging collaborators
    pub async fn new() -> Self {
        Self::with_collaborators(
            Arc::new(LoggingStructureProvisioner),
            Arc::new(LoggingEmployeeDirectory),
            Arc::new(LoggingUserActivation),
        )
        .await
    }

    /// Harness with caller-supplied collaborator implementations
    pub async fn with_collaborators(
        structure: Arc<dyn StructureProvisioner>,
        directory: Arc<dyn EmployeeDirectory>,
        users: Arc<dyn UserActivation>,
    ) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let store = Arc::new(
            SqlitePartitionStore::new(&dir.path().join("registry.db"))
                .await
                .expect("registry"),
        );

        let manager = Arc::new(LifecycleManager::new(
            store.clone(),
            structure,
            directory,
            users,
            LifecycleConfig {
                base_domain: BASE_DOMAIN.to_string(),
                structure_timeout: Duration::from_secs(5),
            },
        ));

        let resolver = DomainResolver::new(store.clone());
        let files = Arc::new(TenantFileStore::new(dir.path().join("storage")));

        Self {
            store,
            manager,
            resolver,
            files,
            dir,
        }
    }

    /// Root of the harness's scratch directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

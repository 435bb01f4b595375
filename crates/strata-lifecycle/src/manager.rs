//! Lifecycle manager: provisioning, deactivation, reactivation

use std::sync::Arc;
use std::time::Duration;

use strata_core::collaborators::{EmployeeDirectory, StructureProvisioner, UserActivation};
use strata_core::context::{self, PartitionScope};
use strata_core::store::PartitionStore;
use strata_core::tenant::{
    Domain, DomainId, NewTenant, OwnerId, SuspensionToken, Tenant, TenantUpdate,
};
use strata_core::{Error, Result};
use tracing::{error, info, warn};

use crate::slug::validate_slug;

/// Lifecycle manager configuration.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Base domain appended to the slug for the primary hostname
    /// (`{slug}.{base_domain}`).
    pub base_domain: String,
    /// Upper bound on the external structural-change call. A timeout rolls
    /// the provisioning back like any other structural failure.
    pub structure_timeout: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            base_domain: "localhost".to_string(),
            structure_timeout: Duration::from_secs(30),
        }
    }
}

/// Input to a provisioning operation.
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    pub name: String,
    pub slug: String,
    pub owner: OwnerId,
    pub metadata: serde_json::Value,
}

impl ProvisionRequest {
    pub fn new(name: impl Into<String>, slug: impl Into<String>, owner: OwnerId) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            owner,
            metadata: serde_json::json!({}),
        }
    }

    /// Attach opaque legal/billing metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Owns the tenant state machine (`Provisioning → Active ⇄ Deactivated`).
///
/// The registry mutations are transactional in the store; the external
/// collaborator steps are bracketed with rollback (provisioning) or
/// compensation (deactivate/reactivate) so a partial failure never leaves
/// observable intermediate state.
pub struct LifecycleManager {
    store: Arc<dyn PartitionStore>,
    structure: Arc<dyn StructureProvisioner>,
    directory: Arc<dyn EmployeeDirectory>,
    users: Arc<dyn UserActivation>,
    config: LifecycleConfig,
}

impl LifecycleManager {
    pub fn new(
        store: Arc<dyn PartitionStore>,
        structure: Arc<dyn StructureProvisioner>,
        directory: Arc<dyn EmployeeDirectory>,
        users: Arc<dyn UserActivation>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            store,
            structure,
            directory,
            users,
            config,
        }
    }

    /// The registry this manager mutates
    pub fn store(&self) -> &Arc<dyn PartitionStore> {
        &self.store
    }

    /// Primary hostname derived for a slug
    pub fn primary_hostname(&self, slug: &str) -> String {
        format!("{}.{}", slug, self.config.base_domain)
    }

    /// Provision a new tenant partition.
    ///
    /// All-or-nothing: if the structural-change collaborator or the
    /// owner-record creation fails (or times out), the tenant and domain
    /// rows are removed again and the slug is immediately reusable.
    ///
    /// # Errors
    /// - `Error::InvalidSlug` for malformed or reserved slugs
    /// - `Error::TenantAlreadyExists` / `Error::OwnerAlreadyHasTenant` /
    ///   `Error::DomainCollision` from the registry constraints
    /// - `Error::StructuralProvisioningFailed` if the external migrator
    ///   fails or times out
    pub async fn provision(&self, request: ProvisionRequest) -> Result<Tenant> {
        validate_slug(&request.slug)?;
        let hostname = self.primary_hostname(&request.slug);

        let (tenant, _domain) = self
            .store
            .create_tenant(
                NewTenant {
                    slug: request.slug,
                    name: request.name,
                    owner: request.owner,
                    metadata: request.metadata,
                },
                &hostname,
            )
            .await?;

        if let Err(e) = self.finish_provisioning(&tenant).await {
            warn!(tenant = %tenant.slug, error = %e, "provisioning failed, rolling back");
            if let Err(rollback) = self.store.remove_tenant(tenant.id).await {
                // The original failure still wins; the leftover rows need
                // operator attention.
                error!(
                    tenant = %tenant.slug,
                    error = %rollback,
                    "rollback of failed provisioning also failed"
                );
            }
            return Err(e);
        }

        info!(tenant = %tenant.slug, hostname = %hostname, owner = %tenant.owner, "tenant provisioned");
        Ok(tenant)
    }

    async fn finish_provisioning(&self, tenant: &Tenant) -> Result<()> {
        match tokio::time::timeout(
            self.config.structure_timeout,
            self.structure.apply_structure(&tenant.slug),
        )
        .await
        {
            Err(_) => {
                return Err(Error::StructuralProvisioningFailed {
                    partition: tenant.slug.clone(),
                    reason: format!(
                        "structural change timed out after {:?}",
                        self.config.structure_timeout
                    ),
                });
            }
            Ok(Err(e)) => {
                return Err(Error::StructuralProvisioningFailed {
                    partition: tenant.slug.clone(),
                    reason: e.to_string(),
                });
            }
            Ok(Ok(())) => {}
        }

        // The owner record is created inside the new partition's context.
        let scope = PartitionScope::tenant(tenant.clone());
        let entity_id = context::with_partition(scope, async {
            self.directory.create_owner_record(tenant, tenant.owner).await
        })
        .await?;

        info!(tenant = %tenant.slug, entity_id = %entity_id, "owner record created");
        Ok(())
    }

    /// Deactivate a tenant without destroying its data.
    ///
    /// The primary hostname is rewritten with a collision-proof token so the
    /// original becomes free, and all bound users are deactivated. Repeating
    /// the operation on an inactive tenant is a successful no-op.
    ///
    /// # Errors
    /// - `Error::TenantNotFound` if the slug is unknown
    pub async fn deactivate(&self, slug: &str) -> Result<Tenant> {
        let tenant = self.store.find_by_slug(slug).await?;
        if !tenant.active {
            info!(tenant = %slug, "deactivate: already inactive, nothing to do");
            return Ok(tenant);
        }

        let token = SuspensionToken::new(tenant.owner);
        let (tenant, domain) = self.store.park_tenant(tenant.id, token).await?;

        if let Err(e) = self.users.set_active_for_tenant(&tenant, false).await {
            warn!(tenant = %slug, error = %e, "user deactivation failed, compensating");
            if let Err(undo) = self.store.unpark_tenant(tenant.id).await {
                error!(tenant = %slug, error = %undo, "compensation of failed deactivate also failed");
            }
            return Err(e);
        }

        info!(tenant = %slug, parked_hostname = %domain.hostname, "tenant deactivated");
        Ok(tenant)
    }

    /// Reactivate a deactivated tenant, restoring its original hostname.
    ///
    /// # Errors
    /// - `Error::DomainCollision` if another binding claimed the original
    ///   hostname in the interim; the tenant stays deactivated with its
    ///   rewritten hostname intact
    /// - `Error::InconsistentLifecycleState` if there is no parked primary
    ///   domain to restore
    /// - `Error::TenantNotFound` if the slug is unknown
    pub async fn reactivate(&self, slug: &str) -> Result<Tenant> {
        let tenant = self.store.find_by_slug(slug).await?;
        if tenant.active {
            info!(tenant = %slug, "reactivate: already active, nothing to do");
            return Ok(tenant);
        }

        let (tenant, domain) = self.store.unpark_tenant(tenant.id).await?;

        if let Err(e) = self.users.set_active_for_tenant(&tenant, true).await {
            warn!(tenant = %slug, error = %e, "user reactivation failed, compensating");
            let token = SuspensionToken::new(tenant.owner);
            if let Err(undo) = self.store.park_tenant(tenant.id, token).await {
                error!(tenant = %slug, error = %undo, "compensation of failed reactivate also failed");
            }
            return Err(e);
        }

        info!(tenant = %slug, hostname = %domain.hostname, "tenant reactivated");
        Ok(tenant)
    }

    /// Apply an allow-listed update to a tenant.
    pub async fn update(&self, slug: &str, update: TenantUpdate) -> Result<Tenant> {
        let tenant = self.store.find_by_slug(slug).await?;
        self.store.update_tenant(tenant.id, update).await
    }

    /// Permanently delete a tenant's registry rows.
    ///
    /// Explicit, out-of-band destructive operation; normal deactivation
    /// never destroys data. Partition structure removal stays with the
    /// external migrator.
    pub async fn hard_delete(&self, slug: &str) -> Result<()> {
        let tenant = self.store.find_by_slug(slug).await?;
        self.store.remove_tenant(tenant.id).await?;
        info!(tenant = %slug, "tenant hard-deleted");
        Ok(())
    }

    /// Bind an additional non-primary hostname to a tenant.
    pub async fn add_domain(&self, slug: &str, hostname: &str) -> Result<Domain> {
        let tenant = self.store.find_by_slug(slug).await?;
        self.store.add_domain(tenant.id, hostname).await
    }

    /// Remove a non-primary domain binding.
    pub async fn remove_domain(&self, id: DomainId) -> Result<()> {
        self.store.remove_domain(id).await
    }

    /// All active tenants
    pub async fn list_active(&self) -> Result<Vec<Tenant>> {
        self.store.list_active().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{
        LoggingEmployeeDirectory, LoggingStructureProvisioner, LoggingUserActivation,
    };
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::Mutex;
    use strata_registry_sqlite::SqlitePartitionStore;
    use tempfile::TempDir;
    use uuid::Uuid;

    mock! {
        pub Structure {}

        #[async_trait]
        impl StructureProvisioner for Structure {
            async fn apply_structure(&self, partition_id: &str) -> Result<()>;
        }
    }

    mock! {
        pub Directory {}

        #[async_trait]
        impl EmployeeDirectory for Directory {
            async fn create_owner_record(&self, tenant: &Tenant, owner: OwnerId) -> Result<Uuid>;
        }
    }

    mock! {
        pub Users {}

        #[async_trait]
        impl UserActivation for Users {
            async fn set_active_for_tenant(&self, tenant: &Tenant, active: bool) -> Result<u64>;
        }
    }

    /// Structure provisioner that outlives any reasonable timeout.
    struct SlowProvisioner;

    #[async_trait]
    impl StructureProvisioner for SlowProvisioner {
        async fn apply_structure(&self, _partition_id: &str) -> Result<()> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(())
        }
    }

    async fn test_store() -> (Arc<SqlitePartitionStore>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqlitePartitionStore::new(&dir.path().join("registry.db"))
            .await
            .unwrap();
        (Arc::new(store), dir)
    }

    fn test_config() -> LifecycleConfig {
        LifecycleConfig {
            base_domain: "example.com".to_string(),
            structure_timeout: Duration::from_secs(5),
        }
    }

    fn manager_with_defaults(store: Arc<SqlitePartitionStore>) -> LifecycleManager {
        LifecycleManager::new(
            store,
            Arc::new(LoggingStructureProvisioner),
            Arc::new(LoggingEmployeeDirectory),
            Arc::new(LoggingUserActivation),
            test_config(),
        )
    }

    #[tokio::test]
    async fn test_provision_creates_active_tenant() {
        let (store, _dir) = test_store().await;
        let manager = manager_with_defaults(store.clone());

        let tenant = manager
            .provision(
                ProvisionRequest::new("Acme Inc", "acme", OwnerId(1))
                    .with_metadata(serde_json::json!({"tax_no": "123"})),
            )
            .await
            .unwrap();

        assert!(tenant.active);
        assert_eq!(tenant.slug, "acme");
        assert_eq!(tenant.metadata["tax_no"], "123");

        let (resolved, domain) = store.find_by_hostname("acme.example.com").await.unwrap();
        assert_eq!(resolved.id, tenant.id);
        assert!(domain.is_primary);
    }

    #[tokio::test]
    async fn test_provision_rejects_bad_slugs() {
        let (store, _dir) = test_store().await;
        let manager = manager_with_defaults(store);

        for slug in ["public", "Bad", "bad_slug"] {
            let result = manager
                .provision(ProvisionRequest::new("X", slug, OwnerId(1)))
                .await;
            assert!(matches!(result, Err(Error::InvalidSlug(_))));
        }
    }

    #[tokio::test]
    async fn test_provision_duplicate_slug_and_owner() {
        let (store, _dir) = test_store().await;
        let manager = manager_with_defaults(store);

        manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(1)))
            .await
            .unwrap();

        let result = manager
            .provision(ProvisionRequest::new("Acme 2", "acme", OwnerId(2)))
            .await;
        assert!(matches!(result, Err(Error::TenantAlreadyExists(_))));

        let result = manager
            .provision(ProvisionRequest::new("Beta", "beta", OwnerId(1)))
            .await;
        assert!(matches!(result, Err(Error::OwnerAlreadyHasTenant(_))));
    }

    #[tokio::test]
    async fn test_concurrent_provisions_of_one_slug() {
        let (store, _dir) = test_store().await;
        let manager = Arc::new(manager_with_defaults(store));

        let m1 = manager.clone();
        let m2 = manager.clone();
        let (a, b) = tokio::join!(
            tokio::spawn(async move {
                m1.provision(ProvisionRequest::new("Acme A", "acme", OwnerId(1)))
                    .await
            }),
            tokio::spawn(async move {
                m2.provision(ProvisionRequest::new("Acme B", "acme", OwnerId(2)))
                    .await
            }),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        // Exactly one wins; the loser sees the slug collision
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        let loser = if a.is_err() { a } else { b };
        assert!(matches!(loser, Err(Error::TenantAlreadyExists(_))));

        assert_eq!(manager.list_active().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_provision_rolls_back_on_structural_failure() {
        let (store, _dir) = test_store().await;

        let mut structure = MockStructure::new();
        structure
            .expect_apply_structure()
            .times(1)
            .returning(|_| Err(Error::Collaborator("migration exploded".to_string())));

        let manager = LifecycleManager::new(
            store.clone(),
            Arc::new(structure),
            Arc::new(LoggingEmployeeDirectory),
            Arc::new(LoggingUserActivation),
            test_config(),
        );

        let result = manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(1)))
            .await;
        match result {
            Err(Error::StructuralProvisioningFailed { partition, reason }) => {
                assert_eq!(partition, "acme");
                assert!(reason.contains("migration exploded"));
            }
            other => panic!("unexpected result: {:?}", other.map(|t| t.slug)),
        }

        // No orphaned rows; the slug provisions cleanly afterwards
        assert!(matches!(
            store.find_by_slug("acme").await,
            Err(Error::TenantNotFound(_))
        ));
        let manager = manager_with_defaults(store);
        manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(1)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_provision_rolls_back_on_timeout() {
        let (store, _dir) = test_store().await;

        let manager = LifecycleManager::new(
            store.clone(),
            Arc::new(SlowProvisioner),
            Arc::new(LoggingEmployeeDirectory),
            Arc::new(LoggingUserActivation),
            LifecycleConfig {
                base_domain: "example.com".to_string(),
                structure_timeout: Duration::from_millis(20),
            },
        );

        let result = manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(1)))
            .await;
        assert!(matches!(
            result,
            Err(Error::StructuralProvisioningFailed { .. })
        ));
        assert!(matches!(
            store.find_by_slug("acme").await,
            Err(Error::TenantNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_provision_rolls_back_on_owner_record_failure() {
        let (store, _dir) = test_store().await;

        let mut directory = MockDirectory::new();
        directory
            .expect_create_owner_record()
            .times(1)
            .returning(|_, _| Err(Error::Collaborator("directory down".to_string())));

        let manager = LifecycleManager::new(
            store.clone(),
            Arc::new(LoggingStructureProvisioner),
            Arc::new(directory),
            Arc::new(LoggingUserActivation),
            test_config(),
        );

        let result = manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(1)))
            .await;
        assert!(matches!(result, Err(Error::Collaborator(_))));
        assert!(matches!(
            store.find_by_slug("acme").await,
            Err(Error::TenantNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_owner_record_is_created_inside_partition_context() {
        let (store, _dir) = test_store().await;

        let observed: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let observed_in_mock = observed.clone();

        let mut directory = MockDirectory::new();
        directory
            .expect_create_owner_record()
            .times(1)
            .returning(move |_, _| {
                *observed_in_mock.lock().unwrap() =
                    Some(context::current().slug().to_string());
                Ok(Uuid::new_v4())
            });

        let manager = LifecycleManager::new(
            store,
            Arc::new(LoggingStructureProvisioner),
            Arc::new(directory),
            Arc::new(LoggingUserActivation),
            test_config(),
        );

        manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(7)))
            .await
            .unwrap();

        assert_eq!(observed.lock().unwrap().as_deref(), Some("acme"));
    }

    #[tokio::test]
    async fn test_deactivate_parks_and_flips_users() {
        let (store, _dir) = test_store().await;

        let mut users = MockUsers::new();
        users
            .expect_set_active_for_tenant()
            .withf(|_, active| !*active)
            .times(1)
            .returning(|_, _| Ok(3));

        let manager = LifecycleManager::new(
            store.clone(),
            Arc::new(LoggingStructureProvisioner),
            Arc::new(LoggingEmployeeDirectory),
            Arc::new(users),
            test_config(),
        );

        let tenant = manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(42)))
            .await
            .unwrap();

        let deactivated = manager.deactivate("acme").await.unwrap();
        assert!(!deactivated.active);

        let domains = store.list_domains(tenant.id).await.unwrap();
        assert_eq!(
            domains[0].parked_hostname.as_deref(),
            Some("acme.example.com")
        );
        assert!(domains[0].hostname.ends_with("-42-acme.example.com"));
    }

    #[tokio::test]
    async fn test_deactivate_is_idempotent() {
        let (store, _dir) = test_store().await;

        let mut users = MockUsers::new();
        // A repeated deactivate must not call the collaborator again
        users
            .expect_set_active_for_tenant()
            .times(1)
            .returning(|_, _| Ok(1));

        let manager = LifecycleManager::new(
            store,
            Arc::new(LoggingStructureProvisioner),
            Arc::new(LoggingEmployeeDirectory),
            Arc::new(users),
            test_config(),
        );

        manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(1)))
            .await
            .unwrap();

        manager.deactivate("acme").await.unwrap();
        let again = manager.deactivate("acme").await.unwrap();
        assert!(!again.active);
    }

    #[tokio::test]
    async fn test_deactivate_compensates_when_user_flip_fails() {
        let (store, _dir) = test_store().await;

        let mut users = MockUsers::new();
        users
            .expect_set_active_for_tenant()
            .times(1)
            .returning(|_, _| Err(Error::Collaborator("directory down".to_string())));

        let manager = LifecycleManager::new(
            store.clone(),
            Arc::new(LoggingStructureProvisioner),
            Arc::new(LoggingEmployeeDirectory),
            Arc::new(users),
            test_config(),
        );

        let tenant = manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(1)))
            .await
            .unwrap();

        let result = manager.deactivate("acme").await;
        assert!(matches!(result, Err(Error::Collaborator(_))));

        // Back to the prior consistent state
        let restored = store.find_by_slug("acme").await.unwrap();
        assert!(restored.active);
        let domains = store.list_domains(tenant.id).await.unwrap();
        assert_eq!(domains[0].hostname, "acme.example.com");
        assert!(domains[0].parked_hostname.is_none());
    }

    #[tokio::test]
    async fn test_deactivate_then_reactivate_roundtrip() {
        let (store, _dir) = test_store().await;
        let manager = manager_with_defaults(store.clone());

        let tenant = manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(1)))
            .await
            .unwrap();

        manager.deactivate("acme").await.unwrap();
        let reactivated = manager.reactivate("acme").await.unwrap();
        assert!(reactivated.active);

        let domains = store.list_domains(tenant.id).await.unwrap();
        assert_eq!(domains[0].hostname, "acme.example.com");
        assert!(domains[0].parked_hostname.is_none());

        // Idempotent on an already-active tenant
        let again = manager.reactivate("acme").await.unwrap();
        assert!(again.active);
    }

    #[tokio::test]
    async fn test_reactivate_surfaces_domain_collision() {
        let (store, _dir) = test_store().await;
        let manager = manager_with_defaults(store.clone());

        let tenant = manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(1)))
            .await
            .unwrap();
        manager.deactivate("acme").await.unwrap();

        // Another tenant claims the freed hostname while acme is parked
        store
            .create_tenant(
                NewTenant {
                    slug: "squatter".to_string(),
                    name: "Squatter".to_string(),
                    owner: OwnerId(2),
                    metadata: serde_json::json!({}),
                },
                "acme.example.com",
            )
            .await
            .unwrap();

        let result = manager.reactivate("acme").await;
        assert!(matches!(result, Err(Error::DomainCollision(_))));

        // Still deactivated, rewritten hostname intact
        let parked = store.find_by_slug("acme").await.unwrap();
        assert!(!parked.active);
        let domains = store.list_domains(tenant.id).await.unwrap();
        assert!(domains[0].is_parked());
    }

    #[tokio::test]
    async fn test_reactivate_compensates_when_user_flip_fails() {
        let (store, _dir) = test_store().await;

        let mut users = MockUsers::new();
        users
            .expect_set_active_for_tenant()
            .withf(|_, active| !*active)
            .times(1)
            .returning(|_, _| Ok(1));
        users
            .expect_set_active_for_tenant()
            .withf(|_, active| *active)
            .times(1)
            .returning(|_, _| Err(Error::Collaborator("directory down".to_string())));

        let manager = LifecycleManager::new(
            store.clone(),
            Arc::new(LoggingStructureProvisioner),
            Arc::new(LoggingEmployeeDirectory),
            Arc::new(users),
            test_config(),
        );

        let tenant = manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(1)))
            .await
            .unwrap();
        manager.deactivate("acme").await.unwrap();

        let result = manager.reactivate("acme").await;
        assert!(matches!(result, Err(Error::Collaborator(_))));

        // Re-parked: inactive, original hostname still recorded
        let parked = store.find_by_slug("acme").await.unwrap();
        assert!(!parked.active);
        let domains = store.list_domains(tenant.id).await.unwrap();
        assert_eq!(
            domains[0].parked_hostname.as_deref(),
            Some("acme.example.com")
        );
    }

    #[tokio::test]
    async fn test_update_and_hard_delete() {
        let (store, _dir) = test_store().await;
        let manager = manager_with_defaults(store.clone());

        manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(1)))
            .await
            .unwrap();

        let updated = manager
            .update(
                "acme",
                TenantUpdate {
                    name: Some("Acme Corporation".to_string()),
                    metadata: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Acme Corporation");
        assert_eq!(updated.slug, "acme");

        manager.hard_delete("acme").await.unwrap();
        assert!(matches!(
            store.find_by_slug("acme").await,
            Err(Error::TenantNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_secondary_domain_management() {
        let (store, _dir) = test_store().await;
        let manager = manager_with_defaults(store.clone());

        manager
            .provision(ProvisionRequest::new("Acme", "acme", OwnerId(1)))
            .await
            .unwrap();

        let alias = manager.add_domain("acme", "www.acme-corp.com").await.unwrap();
        assert!(!alias.is_primary);

        manager.remove_domain(alias.id).await.unwrap();
    }
}

//! Partition store trait: the persistent registry of tenants and domains
//!
//! The `PartitionStore` is the single source of truth for routing decisions.
//! Implementations back it with a transactional database; every mutating
//! operation is atomic — fully applied or not applied at all — and
//! uniqueness (slug, owner, hostname) is enforced with database constraints
//! rather than check-then-insert.

use async_trait::async_trait;

use crate::tenant::{Domain, DomainId, NewTenant, SuspensionToken, Tenant, TenantId, TenantUpdate};
use crate::Result;

/// Persistent registry of tenants and their domain bindings.
///
/// Implementations:
/// - `SqlitePartitionStore`: SQLite-backed registry (strata-registry-sqlite)
#[async_trait]
pub trait PartitionStore: Send + Sync {
    /// Create a tenant and its primary domain in one transaction.
    ///
    /// # Arguments
    /// * `tenant` - Identity and metadata of the new tenant
    /// * `primary_hostname` - Hostname of the primary domain binding
    ///
    /// # Errors
    /// - `Error::TenantAlreadyExists` if the slug is taken (concurrent
    ///   provisions of one slug serialize here: exactly one wins)
    /// - `Error::OwnerAlreadyHasTenant` if the owner already owns a tenant
    /// - `Error::DomainCollision` if the hostname is already bound
    /// - `Error::Database` for database errors
    async fn create_tenant(
        &self,
        tenant: NewTenant,
        primary_hostname: &str,
    ) -> Result<(Tenant, Domain)>;

    /// Look up a tenant by slug.
    ///
    /// # Errors
    /// - `Error::TenantNotFound` if no tenant has this slug
    async fn find_by_slug(&self, slug: &str) -> Result<Tenant>;

    /// Look up a tenant by id.
    ///
    /// # Errors
    /// - `Error::TenantNotFound` if no tenant has this id
    async fn find_by_id(&self, id: TenantId) -> Result<Tenant>;

    /// Look up the tenant bound to a hostname, with the matching domain.
    ///
    /// Matches the literal current hostname column; callers are expected to
    /// pass normalized hostnames. Parked (rewritten) hostnames match like
    /// any other — resolution-layer policy decides what an inactive hit
    /// means.
    ///
    /// # Errors
    /// - `Error::TenantNotFound` if no domain has this hostname
    async fn find_by_hostname(&self, hostname: &str) -> Result<(Tenant, Domain)>;

    /// Apply an allow-listed update to a tenant and bump `updated_at`.
    ///
    /// # Errors
    /// - `Error::TenantNotFound` if the tenant does not exist
    async fn update_tenant(&self, id: TenantId, update: TenantUpdate) -> Result<Tenant>;

    /// Atomically rename a domain.
    ///
    /// # Errors
    /// - `Error::DomainCollision` if the target hostname is already bound
    /// - `Error::TenantNotFound` if the domain does not exist
    async fn rename_domain(&self, id: DomainId, new_hostname: &str) -> Result<Domain>;

    /// Add a non-primary domain binding for a tenant.
    ///
    /// # Errors
    /// - `Error::DomainCollision` if the hostname is already bound
    /// - `Error::TenantNotFound` if the tenant does not exist
    async fn add_domain(&self, tenant_id: TenantId, hostname: &str) -> Result<Domain>;

    /// Remove a non-primary domain binding.
    ///
    /// # Errors
    /// - `Error::InconsistentLifecycleState` if the domain is the primary
    /// - `Error::TenantNotFound` if the domain does not exist
    async fn remove_domain(&self, id: DomainId) -> Result<()>;

    /// All active tenants, oldest first.
    async fn list_active(&self) -> Result<Vec<Tenant>>;

    /// All domain bindings of a tenant.
    async fn list_domains(&self, tenant_id: TenantId) -> Result<Vec<Domain>>;

    /// Deactivate a tenant in one transaction: mark it inactive and rewrite
    /// its primary domain's hostname with the token, recording the original
    /// hostname and the park time in dedicated columns.
    ///
    /// # Errors
    /// - `Error::TenantNotFound` if the tenant does not exist
    /// - `Error::InconsistentLifecycleState` if the tenant has no primary
    ///   domain
    async fn park_tenant(
        &self,
        id: TenantId,
        token: SuspensionToken,
    ) -> Result<(Tenant, Domain)>;

    /// Reactivate a tenant in one transaction: restore the primary domain's
    /// original hostname and mark the tenant active again.
    ///
    /// On a collision the whole transaction rolls back, leaving the tenant
    /// deactivated with its rewritten hostname intact.
    ///
    /// # Errors
    /// - `Error::DomainCollision` if the original hostname has since been
    ///   claimed by another binding
    /// - `Error::InconsistentLifecycleState` if the tenant has no parked
    ///   primary domain
    /// - `Error::TenantNotFound` if the tenant does not exist
    async fn unpark_tenant(&self, id: TenantId) -> Result<(Tenant, Domain)>;

    /// Permanently delete a tenant and all of its domain bindings.
    ///
    /// Used for provisioning rollback and the explicit out-of-band hard
    /// delete; never part of normal lifecycle flow. Partition structure
    /// removal stays with the external migrator.
    ///
    /// # Errors
    /// - `Error::TenantNotFound` if the tenant does not exist
    async fn remove_tenant(&self, id: TenantId) -> Result<()>;
}

//! Task-scoped partition execution context
//!
//! Every unit of work (request, background job) runs inside exactly one
//! `PartitionScope`, carried in tokio task-local storage. The scope is set
//! for the duration of a future and restored on return, error, or panic;
//! unrelated concurrent tasks never observe each other's scope. There is no
//! process-global "current tenant".

use std::future::Future;
use std::sync::Arc;

use crate::tenant::Tenant;
use crate::{Error, Result};

/// Partition identifier used when no tenant is active.
pub const PUBLIC_PARTITION: &str = "public";

/// The partition a unit of work operates on: a tenant's, or the shared
/// public partition used for tenant-creation, authentication, and
/// system-wide operations.
#[derive(Debug, Clone)]
pub enum PartitionScope {
    /// Shared public partition; the fallback when no tenant resolves.
    Public,
    /// An active tenant's partition.
    Tenant(Arc<Tenant>),
}

impl PartitionScope {
    /// Scope for a tenant's partition
    pub fn tenant(tenant: Tenant) -> Self {
        Self::Tenant(Arc::new(tenant))
    }

    /// The partition identifier: the tenant slug, or `"public"`
    pub fn slug(&self) -> &str {
        match self {
            Self::Public => PUBLIC_PARTITION,
            Self::Tenant(tenant) => &tenant.slug,
        }
    }

    /// True for the shared public partition
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }

    /// The scoped tenant, if any
    pub fn as_tenant(&self) -> Option<&Arc<Tenant>> {
        match self {
            Self::Public => None,
            Self::Tenant(tenant) => Some(tenant),
        }
    }
}

tokio::task_local! {
    static CURRENT_PARTITION: PartitionScope;
}

/// Run a future with the given partition scope active.
///
/// The scope holds for the future's entire execution, including across
/// await points, and the prior scope (or "none") is restored when the
/// future completes, fails, or panics. Scopes nest: an inner
/// `with_partition` shadows the outer one only for the inner future.
pub async fn with_partition<F>(scope: PartitionScope, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_PARTITION.scope(scope, fut).await
}

/// Synchronous variant of [`with_partition`] for non-async call trees.
pub fn with_partition_sync<F, R>(scope: PartitionScope, f: F) -> R
where
    F: FnOnce() -> R,
{
    CURRENT_PARTITION.sync_scope(scope, f)
}

/// The current partition scope, consulted at the moment of the call.
///
/// Returns `PartitionScope::Public` when the caller runs outside any
/// scoped unit of work.
pub fn current() -> PartitionScope {
    CURRENT_PARTITION
        .try_with(|scope| scope.clone())
        .unwrap_or(PartitionScope::Public)
}

/// The currently scoped tenant, if a tenant partition is active.
pub fn current_tenant() -> Option<Arc<Tenant>> {
    CURRENT_PARTITION
        .try_with(|scope| scope.as_tenant().cloned())
        .ok()
        .flatten()
}

/// The currently scoped tenant, or `TenantRequired` if the unit of work is
/// running against the public partition.
pub fn require_tenant() -> Result<Arc<Tenant>> {
    current_tenant().ok_or_else(|| {
        Error::TenantRequired(
            "no tenant partition is active for this unit of work".to_string(),
        )
    })
}

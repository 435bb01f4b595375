//! Hostname → tenant resolution

use std::sync::Arc;

use strata_core::{
    context::PartitionScope,
    store::PartitionStore,
    tenant::{Domain, Tenant},
    Error, Result,
};

use crate::hostname::normalize_hostname;

/// Outcome of resolving an inbound hostname.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The hostname is bound to an active tenant.
    Tenant {
        tenant: Arc<Tenant>,
        domain: Domain,
    },
    /// No active tenant is bound to the hostname; the unit of work runs
    /// against the shared public partition.
    Public,
}

impl Resolution {
    /// The partition scope this resolution selects
    pub fn scope(&self) -> PartitionScope {
        match self {
            Self::Tenant { tenant, .. } => PartitionScope::Tenant(tenant.clone()),
            Self::Public => PartitionScope::Public,
        }
    }

    /// The resolved tenant, if any
    pub fn tenant(&self) -> Option<&Arc<Tenant>> {
        match self {
            Self::Tenant { tenant, .. } => Some(tenant),
            Self::Public => None,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }
}

/// Resolves request hostnames against the partition store.
///
/// Resolution re-queries the store at the start of every unit of work; the
/// result is carried in that unit's execution context, which is the only
/// cache. A hit on a deactivated tenant counts as a miss: its original
/// hostname must behave as if unbound.
#[derive(Clone)]
pub struct DomainResolver {
    store: Arc<dyn PartitionStore>,
}

impl DomainResolver {
    pub fn new(store: Arc<dyn PartitionStore>) -> Self {
        Self { store }
    }

    /// Resolve a raw request hostname, falling back to the public partition.
    ///
    /// Misses and inactive tenants resolve to `Resolution::Public`; only
    /// infrastructure failures are errors.
    ///
    /// # Errors
    /// - `Error::InvalidHostname` if the hostname cannot be normalized
    /// - `Error::Database` for store failures
    pub async fn resolve(&self, raw_hostname: &str) -> Result<Resolution> {
        let hostname = normalize_hostname(raw_hostname)?;

        match self.store.find_by_hostname(&hostname).await {
            Ok((tenant, domain)) => {
                if !tenant.active {
                    tracing::debug!(
                        hostname = %hostname,
                        tenant = %tenant.slug,
                        "hostname bound to inactive tenant, falling back to public"
                    );
                    return Ok(Resolution::Public);
                }
                tracing::debug!(hostname = %hostname, tenant = %tenant.slug, "hostname resolved");
                Ok(Resolution::Tenant {
                    tenant: Arc::new(tenant),
                    domain,
                })
            }
            Err(Error::TenantNotFound(_)) => {
                tracing::debug!(hostname = %hostname, "no tenant bound, falling back to public");
                Ok(Resolution::Public)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve a hostname for an operation that requires an active tenant.
    ///
    /// # Errors
    /// - `Error::TenantNotFound` on a miss or an inactive tenant
    /// - `Error::InvalidHostname` / `Error::Database` as for [`resolve`]
    ///
    /// [`resolve`]: DomainResolver::resolve
    pub async fn require_tenant(&self, raw_hostname: &str) -> Result<(Arc<Tenant>, Domain)> {
        match self.resolve(raw_hostname).await? {
            Resolution::Tenant { tenant, domain } => Ok((tenant, domain)),
            Resolution::Public => Err(Error::TenantNotFound(raw_hostname.to_string())),
        }
    }
}

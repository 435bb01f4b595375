//! Default collaborator implementations
//!
//! The real structural migrator, employee directory, and user directory
//! live outside this system. These implementations log the call and
//! succeed; deployments swap them for clients of the real services.

use async_trait::async_trait;
use uuid::Uuid;

use strata_core::collaborators::{EmployeeDirectory, StructureProvisioner, UserActivation};
use strata_core::context;
use strata_core::tenant::{OwnerId, Tenant};
use strata_core::Result;

/// Structure provisioner that records the request and reports success.
#[derive(Debug, Clone, Default)]
pub struct LoggingStructureProvisioner;

#[async_trait]
impl StructureProvisioner for LoggingStructureProvisioner {
    async fn apply_structure(&self, partition_id: &str) -> Result<()> {
        tracing::info!(partition = %partition_id, "applying structural changes");
        Ok(())
    }
}

/// Employee directory that records the owner-record request.
#[derive(Debug, Clone, Default)]
pub struct LoggingEmployeeDirectory;

#[async_trait]
impl EmployeeDirectory for LoggingEmployeeDirectory {
    async fn create_owner_record(&self, tenant: &Tenant, owner: OwnerId) -> Result<Uuid> {
        let entity_id = Uuid::new_v4();
        tracing::info!(
            tenant = %tenant.slug,
            partition = %context::current().slug(),
            owner = %owner,
            entity_id = %entity_id,
            "creating owner record"
        );
        Ok(entity_id)
    }
}

/// User directory that records activation flips.
#[derive(Debug, Clone, Default)]
pub struct LoggingUserActivation;

#[async_trait]
impl UserActivation for LoggingUserActivation {
    async fn set_active_for_tenant(&self, tenant: &Tenant, active: bool) -> Result<u64> {
        tracing::info!(tenant = %tenant.slug, active, "updating tenant user activation");
        Ok(0)
    }
}

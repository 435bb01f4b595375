//! External collaborator traits
//!
//! The lifecycle subsystem delegates three concerns to external systems:
//! applying structural changes to a partition (schema migration), creating
//! the owner's initial business record inside a fresh partition, and
//! flipping the active flag on a tenant's bound users. These traits are the
//! seams where deployments plug their real implementations in; tests mock
//! them.

use async_trait::async_trait;
use uuid::Uuid;

use crate::tenant::{OwnerId, Tenant};
use crate::Result;

/// Applies pending structural changes to a partition.
///
/// Invoked synchronously during provisioning. Implementations must be
/// idempotent so retries are safe; a failure aborts and rolls back the
/// whole provisioning operation.
#[async_trait]
pub trait StructureProvisioner: Send + Sync {
    async fn apply_structure(&self, partition_id: &str) -> Result<()>;
}

/// Creates business-entity records inside a tenant partition.
///
/// `create_owner_record` is called exactly once per successful
/// provisioning, inside the new partition's execution context, and must
/// produce a record with an owner designation that can never be deleted.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn create_owner_record(&self, tenant: &Tenant, owner: OwnerId) -> Result<Uuid>;
}

/// Flips the active flag on every user bound to a tenant.
///
/// Returns the number of users affected.
#[async_trait]
pub trait UserActivation: Send + Sync {
    async fn set_active_for_tenant(&self, tenant: &Tenant, active: bool) -> Result<u64>;
}

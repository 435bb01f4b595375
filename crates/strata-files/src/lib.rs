//! Tenant-aware file routing and storage
//!
//! Derives storage sub-paths from the partition execution context so two
//! tenants' files can never collide or be served cross-tenant. The context
//! is consulted at the moment of each storage operation, not at
//! request-setup time.

mod path_router;
mod tenant_file_store;

pub use path_router::resolve_storage_path;
pub use tenant_file_store::TenantFileStore;

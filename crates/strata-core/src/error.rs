//! Error types for Strata Core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Resolution errors
    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error("Tenant required: {0}")]
    TenantRequired(String),

    #[error("Invalid hostname: {0}")]
    InvalidHostname(String),

    // Lifecycle errors
    #[error("Tenant already exists: {0}")]
    TenantAlreadyExists(String),

    #[error("Owner already has a tenant: {0}")]
    OwnerAlreadyHasTenant(String),

    #[error("Domain collision: {0}")]
    DomainCollision(String),

    #[error("Structural provisioning failed for partition '{partition}': {reason}")]
    StructuralProvisioningFailed { partition: String, reason: String },

    #[error("Inconsistent lifecycle state: {0}")]
    InconsistentLifecycleState(String),

    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    // Storage errors
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    // Collaborator errors
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

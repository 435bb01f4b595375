//! Tenant, domain, and identifier types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::{Error, Result};

/// Unique identifier for a tenant.
///
/// The tenant id is the stable database identity; the tenant's `slug` is the
/// partition identifier used for schema and storage-path derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Create a new random tenant ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a tenant ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse a tenant ID from a string
    pub fn from_string(s: &str) -> Result<Self> {
        let uuid = Uuid::parse_str(s)
            .map_err(|e| Error::Database(format!("Invalid tenant ID format: {}", e)))?;
        Ok(Self(uuid))
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TenantId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

/// Unique identifier for a domain binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainId(Uuid);

impl DomainId {
    /// Create a new random domain ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a domain ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse a domain ID from a string
    pub fn from_string(s: &str) -> Result<Self> {
        let uuid = Uuid::parse_str(s)
            .map_err(|e| Error::Database(format!("Invalid domain ID format: {}", e)))?;
        Ok(Self(uuid))
    }
}

impl Default for DomainId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a tenant owner in the external account system.
///
/// Account identities are numeric serials issued by the account service.
/// The owner is assigned exactly once at provisioning and is never
/// reassignable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub i64);

impl OwnerId {
    /// Get the inner numeric identity
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tenant: one customer company with its own isolated data partition.
///
/// The `slug` doubles as the physical partition identifier and is immutable
/// once assigned; it is globally unique and never reused for a different
/// tenant, even after deactivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    /// Partition identifier. Immutable, globally unique.
    pub slug: String,
    /// Human-readable display name.
    pub name: String,
    /// Owner in the external account system. Assigned once, never reassigned.
    pub owner: OwnerId,
    /// Whether the tenant is live. Deactivated tenants keep their data but
    /// their domains no longer resolve.
    pub active: bool,
    /// Opaque legal/billing fields. The core never interprets these.
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTenant {
    pub slug: String,
    pub name: String,
    pub owner: OwnerId,
    pub metadata: serde_json::Value,
}

/// Allow-listed mutable fields of a tenant.
///
/// Identity fields (slug, owner) and the active flag are structurally absent
/// so they cannot be reassigned through the update path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantUpdate {
    pub name: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl TenantUpdate {
    /// True when the update carries no changes
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.metadata.is_none()
    }
}

/// A hostname bound to exactly one tenant.
///
/// While the owning tenant is deactivated, `hostname` holds the rewritten
/// collision-proof value and `parked_hostname` the original; reactivation
/// restores from `parked_hostname` without parsing the rewritten form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    pub id: DomainId,
    pub hostname: String,
    pub tenant_id: TenantId,
    /// Exactly one primary domain exists per tenant.
    pub is_primary: bool,
    /// Original hostname while the tenant is deactivated.
    pub parked_hostname: Option<String>,
    /// Unix seconds when the domain was parked.
    pub parked_at: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Domain {
    /// True while the owning tenant is deactivated and the hostname rewritten
    pub fn is_parked(&self) -> bool {
        self.parked_hostname.is_some()
    }
}

/// Collision-proof token used to rewrite a parked domain's hostname.
///
/// The rewritten form is `{parked_at}-{owner}-{original-hostname}`, which
/// frees the original hostname while the tenant is deactivated. The token is
/// stored in dedicated columns alongside the original hostname, so restoring
/// a domain never depends on parsing the rewritten string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspensionToken {
    /// Unix seconds at which the domain was parked.
    pub parked_at: i64,
    /// Owner identity, included so two tenants parked in the same second
    /// cannot produce the same rewritten hostname.
    pub owner: OwnerId,
}

impl SuspensionToken {
    /// Create a token stamped with the current time
    pub fn new(owner: OwnerId) -> Self {
        Self {
            parked_at: Utc::now().timestamp(),
            owner,
        }
    }

    /// Create a token with an explicit timestamp
    pub fn at(parked_at: i64, owner: OwnerId) -> Self {
        Self { parked_at, owner }
    }

    /// Render the rewritten hostname for a parked domain
    pub fn rewrite(&self, hostname: &str) -> String {
        format!("{}-{}-{}", self.parked_at, self.owner, hostname)
    }

    /// Split a rewritten hostname back into its token and original hostname.
    ///
    /// Diagnostic helper only; lifecycle code restores parked domains from
    /// the stored original, not from this.
    pub fn parse(rewritten: &str) -> Option<(Self, String)> {
        let (ts, rest) = rewritten.split_once('-')?;
        let (owner, original) = rest.split_once('-')?;
        let parked_at = ts.parse::<i64>().ok()?;
        let owner = OwnerId(owner.parse::<i64>().ok()?);
        if original.is_empty() {
            return None;
        }
        Some((Self { parked_at, owner }, original.to_string()))
    }
}

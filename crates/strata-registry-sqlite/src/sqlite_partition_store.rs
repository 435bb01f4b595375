//! SqlitePartitionStore - PartitionStore trait implementation on SQLite

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
    SqliteSynchronous,
};
use sqlx::Row;
use std::path::Path;
use std::time::Duration;

use strata_core::{
    store::PartitionStore,
    tenant::{
        Domain, DomainId, NewTenant, OwnerId, SuspensionToken, Tenant, TenantId, TenantUpdate,
    },
    Error, Result,
};

/// SQLite-backed registry of tenants and domain bindings.
///
/// The registry is the single source of truth for routing decisions.
/// Slug, owner, and hostname uniqueness live in UNIQUE constraints, so
/// concurrent writers serialize at the database rather than racing an
/// application-level pre-check.
#[derive(Clone)]
pub struct SqlitePartitionStore {
    pool: SqlitePool,
}

impl SqlitePartitionStore {
    /// Open (or create) a registry database at the given path.
    ///
    /// # Errors
    /// - `Error::Database` if the connection or schema setup fails
    pub async fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(db_path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .synchronous(SqliteSynchronous::Normal)
                    .busy_timeout(Duration::from_secs(5))
                    .foreign_keys(true),
            )
            .await
            .map_err(|e| Error::Database(format!("Failed to open registry database: {}", e)))?;

        let store = Self { pool };
        store.initialize_schema().await?;
        Ok(store)
    }

    /// Create from an existing pool (useful for testing)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn initialize_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create schema_version table: {}", e)))?;

        sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (1)")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to record schema version: {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tenants (
                id TEXT PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                owner_id INTEGER NOT NULL UNIQUE,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                metadata TEXT NOT NULL DEFAULT '{}',
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create tenants table: {}", e)))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS domains (
                id TEXT PRIMARY KEY,
                hostname TEXT NOT NULL UNIQUE,
                tenant_id TEXT NOT NULL REFERENCES tenants(id) ON DELETE CASCADE,
                is_primary BOOLEAN NOT NULL DEFAULT 0,
                parked_hostname TEXT,
                parked_at INTEGER,
                created_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create domains table: {}", e)))?;

        // One primary domain per tenant
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_domains_primary
            ON domains(tenant_id) WHERE is_primary = 1
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create primary-domain index: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_domains_tenant ON domains(tenant_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to create domain index: {}", e)))?;

        Ok(())
    }
}

fn tenant_from_row(row: &SqliteRow) -> Result<Tenant> {
    let id: String = row
        .try_get("id")
        .map_err(|e| Error::Database(format!("Failed to read tenant id: {}", e)))?;
    let metadata: String = row
        .try_get("metadata")
        .map_err(|e| Error::Database(format!("Failed to read tenant metadata: {}", e)))?;

    Ok(Tenant {
        id: TenantId::from_string(&id)?,
        slug: row
            .try_get("slug")
            .map_err(|e| Error::Database(format!("Failed to read tenant slug: {}", e)))?,
        name: row
            .try_get("name")
            .map_err(|e| Error::Database(format!("Failed to read tenant name: {}", e)))?,
        owner: OwnerId(
            row.try_get("owner_id")
                .map_err(|e| Error::Database(format!("Failed to read tenant owner: {}", e)))?,
        ),
        active: row
            .try_get("is_active")
            .map_err(|e| Error::Database(format!("Failed to read tenant active flag: {}", e)))?,
        metadata: serde_json::from_str(&metadata)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| Error::Database(format!("Failed to read tenant created_at: {}", e)))?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| Error::Database(format!("Failed to read tenant updated_at: {}", e)))?,
    })
}

fn domain_from_row(row: &SqliteRow) -> Result<Domain> {
    let id: String = row
        .try_get("id")
        .map_err(|e| Error::Database(format!("Failed to read domain id: {}", e)))?;
    let tenant_id: String = row
        .try_get("tenant_id")
        .map_err(|e| Error::Database(format!("Failed to read domain tenant id: {}", e)))?;

    Ok(Domain {
        id: DomainId::from_string(&id)?,
        hostname: row
            .try_get("hostname")
            .map_err(|e| Error::Database(format!("Failed to read domain hostname: {}", e)))?,
        tenant_id: TenantId::from_string(&tenant_id)?,
        is_primary: row
            .try_get("is_primary")
            .map_err(|e| Error::Database(format!("Failed to read domain primary flag: {}", e)))?,
        parked_hostname: row
            .try_get("parked_hostname")
            .map_err(|e| Error::Database(format!("Failed to read parked hostname: {}", e)))?,
        parked_at: row
            .try_get("parked_at")
            .map_err(|e| Error::Database(format!("Failed to read parked_at: {}", e)))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| Error::Database(format!("Failed to read domain created_at: {}", e)))?,
    })
}

/// Map a UNIQUE violation from the tenant+domain insert to the lifecycle
/// error taxonomy. SQLite names the violated column in its message.
fn map_create_violation(e: sqlx::Error, slug: &str, owner: OwnerId, hostname: &str) -> Error {
    let msg = e.to_string();
    if msg.contains("tenants.slug") {
        Error::TenantAlreadyExists(slug.to_string())
    } else if msg.contains("tenants.owner_id") {
        Error::OwnerAlreadyHasTenant(owner.to_string())
    } else if msg.contains("domains.hostname") {
        Error::DomainCollision(hostname.to_string())
    } else {
        Error::Database(format!("Failed to create tenant: {}", msg))
    }
}

fn map_hostname_violation(e: sqlx::Error, hostname: &str) -> Error {
    let msg = e.to_string();
    if msg.contains("domains.hostname") {
        Error::DomainCollision(hostname.to_string())
    } else {
        Error::Database(format!("Failed to write domain: {}", msg))
    }
}

#[async_trait]
impl PartitionStore for SqlitePartitionStore {
    async fn create_tenant(
        &self,
        tenant: NewTenant,
        primary_hostname: &str,
    ) -> Result<(Tenant, Domain)> {
        let now = Utc::now();
        let tenant_id = TenantId::new();
        let domain_id = DomainId::new();
        let metadata = serde_json::to_string(&tenant.metadata)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Database(format!("Failed to start transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO tenants (id, slug, name, owner_id, is_active, metadata, created_at, updated_at)
            VALUES (?, ?, ?, ?, 1, ?, ?, ?)
            "#,
        )
        .bind(tenant_id.to_string())
        .bind(&tenant.slug)
        .bind(&tenant.name)
        .bind(tenant.owner.as_i64())
        .bind(&metadata)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_create_violation(e, &tenant.slug, tenant.owner, primary_hostname))?;

        sqlx::query(
            r#"
            INSERT INTO domains (id, hostname, tenant_id, is_primary, created_at)
            VALUES (?, ?, ?, 1, ?)
            "#,
        )
        .bind(domain_id.to_string())
        .bind(primary_hostname)
        .bind(tenant_id.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_create_violation(e, &tenant.slug, tenant.owner, primary_hostname))?;

        tx.commit()
            .await
            .map_err(|e| Error::Database(format!("Failed to commit transaction: {}", e)))?;

        tracing::debug!(tenant = %tenant.slug, hostname = %primary_hostname, "tenant created");

        Ok((
            Tenant {
                id: tenant_id,
                slug: tenant.slug,
                name: tenant.name,
                owner: tenant.owner,
                active: true,
                metadata: tenant.metadata,
                created_at: now,
                updated_at: now,
            },
            Domain {
                id: domain_id,
                hostname: primary_hostname.to_string(),
                tenant_id,
                is_primary: true,
                parked_hostname: None,
                parked_at: None,
                created_at: now,
            },
        ))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Tenant> {
        let row = sqlx::query("SELECT * FROM tenants WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to query tenant: {}", e)))?;

        match row {
            Some(row) => tenant_from_row(&row),
            None => Err(Error::TenantNotFound(slug.to_string())),
        }
    }

    async fn find_by_id(&self, id: TenantId) -> Result<Tenant> {
        let row = sqlx::query("SELECT * FROM tenants WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to query tenant: {}", e)))?;

        match row {
            Some(row) => tenant_from_row(&row),
            None => Err(Error::TenantNotFound(id.to_string())),
        }
    }

    async fn find_by_hostname(&self, hostname: &str) -> Result<(Tenant, Domain)> {
        let row = sqlx::query("SELECT * FROM domains WHERE hostname = ?")
            .bind(hostname)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to query domain: {}", e)))?;

        let domain = match row {
            Some(row) => domain_from_row(&row)?,
            None => return Err(Error::TenantNotFound(hostname.to_string())),
        };

        let tenant = self.find_by_id(domain.tenant_id).await?;
        Ok((tenant, domain))
    }

    async fn update_tenant(&self, id: TenantId, update: TenantUpdate) -> Result<Tenant> {
        if update.is_empty() {
            return self.find_by_id(id).await;
        }

        let current = self.find_by_id(id).await?;
        let name = update.name.unwrap_or(current.name);
        let metadata = update.metadata.unwrap_or(current.metadata);
        let now = Utc::now();

        sqlx::query("UPDATE tenants SET name = ?, metadata = ?, updated_at = ? WHERE id = ?")
            .bind(&name)
            .bind(serde_json::to_string(&metadata)?)
            .bind(now)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to update tenant: {}", e)))?;

        Ok(Tenant {
            name,
            metadata,
            updated_at: now,
            ..current
        })
    }

    async fn rename_domain(&self, id: DomainId, new_hostname: &str) -> Result<Domain> {
        let result = sqlx::query("UPDATE domains SET hostname = ? WHERE id = ?")
            .bind(new_hostname)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_hostname_violation(e, new_hostname))?;

        if result.rows_affected() == 0 {
            return Err(Error::TenantNotFound(format!("domain {}", id)));
        }

        let row = sqlx::query("SELECT * FROM domains WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to re-read domain: {}", e)))?;
        domain_from_row(&row)
    }

    async fn add_domain(&self, tenant_id: TenantId, hostname: &str) -> Result<Domain> {
        // Existence check doubles as the TenantNotFound mapping
        self.find_by_id(tenant_id).await?;

        let id = DomainId::new();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO domains (id, hostname, tenant_id, is_primary, created_at)
            VALUES (?, ?, ?, 0, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(hostname)
        .bind(tenant_id.to_string())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_hostname_violation(e, hostname))?;

        Ok(Domain {
            id,
            hostname: hostname.to_string(),
            tenant_id,
            is_primary: false,
            parked_hostname: None,
            parked_at: None,
            created_at: now,
        })
    }

    async fn remove_domain(&self, id: DomainId) -> Result<()> {
        let row = sqlx::query("SELECT * FROM domains WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to query domain: {}", e)))?;

        let domain = match row {
            Some(row) => domain_from_row(&row)?,
            None => return Err(Error::TenantNotFound(format!("domain {}", id))),
        };

        if domain.is_primary {
            return Err(Error::InconsistentLifecycleState(format!(
                "cannot remove the primary domain '{}'",
                domain.hostname
            )));
        }

        sqlx::query("DELETE FROM domains WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete domain: {}", e)))?;

        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<Tenant>> {
        let rows = sqlx::query("SELECT * FROM tenants WHERE is_active = 1 ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list tenants: {}", e)))?;

        rows.iter().map(tenant_from_row).collect()
    }

    async fn list_domains(&self, tenant_id: TenantId) -> Result<Vec<Domain>> {
        let rows = sqlx::query("SELECT * FROM domains WHERE tenant_id = ? ORDER BY created_at ASC")
            .bind(tenant_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list domains: {}", e)))?;

        rows.iter().map(domain_from_row).collect()
    }

    async fn park_tenant(
        &self,
        id: TenantId,
        token: SuspensionToken,
    ) -> Result<(Tenant, Domain)> {
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Database(format!("Failed to start transaction: {}", e)))?;

        let tenant_row = sqlx::query("SELECT * FROM tenants WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| Error::Database(format!("Failed to query tenant: {}", e)))?;

        let tenant = match tenant_row {
            Some(row) => tenant_from_row(&row)?,
            None => return Err(Error::TenantNotFound(id.to_string())),
        };

        let domain_row = sqlx::query("SELECT * FROM domains WHERE tenant_id = ? AND is_primary = 1")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| Error::Database(format!("Failed to query primary domain: {}", e)))?;

        let domain = match domain_row {
            Some(row) => domain_from_row(&row)?,
            None => {
                return Err(Error::InconsistentLifecycleState(format!(
                    "tenant '{}' has no primary domain",
                    tenant.slug
                )));
            }
        };

        let rewritten = token.rewrite(&domain.hostname);

        sqlx::query(
            "UPDATE domains SET hostname = ?, parked_hostname = ?, parked_at = ? WHERE id = ?",
        )
        .bind(&rewritten)
        .bind(&domain.hostname)
        .bind(token.parked_at)
        .bind(domain.id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_hostname_violation(e, &rewritten))?;

        sqlx::query("UPDATE tenants SET is_active = 0, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Database(format!("Failed to deactivate tenant: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| Error::Database(format!("Failed to commit transaction: {}", e)))?;

        tracing::debug!(tenant = %tenant.slug, hostname = %rewritten, "tenant parked");

        Ok((
            Tenant {
                active: false,
                updated_at: now,
                ..tenant
            },
            Domain {
                parked_hostname: Some(domain.hostname.clone()),
                parked_at: Some(token.parked_at),
                hostname: rewritten,
                ..domain
            },
        ))
    }

    async fn unpark_tenant(&self, id: TenantId) -> Result<(Tenant, Domain)> {
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Database(format!("Failed to start transaction: {}", e)))?;

        let tenant_row = sqlx::query("SELECT * FROM tenants WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| Error::Database(format!("Failed to query tenant: {}", e)))?;

        let tenant = match tenant_row {
            Some(row) => tenant_from_row(&row)?,
            None => return Err(Error::TenantNotFound(id.to_string())),
        };

        let domain_row = sqlx::query("SELECT * FROM domains WHERE tenant_id = ? AND is_primary = 1")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| Error::Database(format!("Failed to query primary domain: {}", e)))?;

        let domain = match domain_row {
            Some(row) => domain_from_row(&row)?,
            None => {
                return Err(Error::InconsistentLifecycleState(format!(
                    "tenant '{}' has no primary domain",
                    tenant.slug
                )));
            }
        };

        let original = match &domain.parked_hostname {
            Some(hostname) => hostname.clone(),
            None => {
                return Err(Error::InconsistentLifecycleState(format!(
                    "primary domain of tenant '{}' is not parked",
                    tenant.slug
                )));
            }
        };

        // A UNIQUE violation here means another binding claimed the original
        // hostname in the interim; the transaction rolls back and the parked
        // state stays intact.
        sqlx::query(
            "UPDATE domains SET hostname = ?, parked_hostname = NULL, parked_at = NULL WHERE id = ?",
        )
        .bind(&original)
        .bind(domain.id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_hostname_violation(e, &original))?;

        sqlx::query("UPDATE tenants SET is_active = 1, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Database(format!("Failed to reactivate tenant: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| Error::Database(format!("Failed to commit transaction: {}", e)))?;

        tracing::debug!(tenant = %tenant.slug, hostname = %original, "tenant unparked");

        Ok((
            Tenant {
                active: true,
                updated_at: now,
                ..tenant
            },
            Domain {
                hostname: original,
                parked_hostname: None,
                parked_at: None,
                ..domain
            },
        ))
    }

    async fn remove_tenant(&self, id: TenantId) -> Result<()> {
        // Domains go with the tenant via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM tenants WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete tenant: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(Error::TenantNotFound(id.to_string()));
        }

        tracing::debug!(tenant_id = %id, "tenant removed");
        Ok(())
    }
}

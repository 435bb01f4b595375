//! Context-aware storage path derivation

use std::path::{Component, Path, PathBuf};

use strata_core::{context, Error, Result};

/// Derive the storage sub-path for a relative path under the currently
/// active partition.
///
/// Reads the execution context at call time: under a tenant scope the path
/// is prefixed with that tenant's slug, otherwise with `"public"`. Two
/// different tenants therefore never share a resolved path for the same
/// relative path.
///
/// # Errors
/// - `Error::InvalidPath` for empty or absolute paths and any path
///   containing `..` or other non-normal components
pub fn resolve_storage_path(relative: impl AsRef<Path>) -> Result<PathBuf> {
    let relative = relative.as_ref();

    if relative.as_os_str().is_empty() {
        return Err(Error::InvalidPath("empty path".to_string()));
    }
    if relative.is_absolute() {
        return Err(Error::InvalidPath(format!(
            "absolute path not allowed: {}",
            relative.display()
        )));
    }
    for component in relative.components() {
        match component {
            Component::Normal(_) => {}
            _ => {
                return Err(Error::InvalidPath(format!(
                    "path may not traverse outside its partition: {}",
                    relative.display()
                )));
            }
        }
    }

    let scope = context::current();
    Ok(PathBuf::from(scope.slug()).join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use strata_core::context::{with_partition, PartitionScope};
    use strata_core::tenant::{OwnerId, Tenant, TenantId};

    fn make_tenant(slug: &str) -> Tenant {
        Tenant {
            id: TenantId::new(),
            slug: slug.to_string(),
            name: slug.to_uppercase(),
            owner: OwnerId(1),
            active: true,
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_public_prefix_outside_any_scope() {
        let path = resolve_storage_path("logo.png").unwrap();
        assert_eq!(path, PathBuf::from("public/logo.png"));
    }

    #[tokio::test]
    async fn test_tenant_prefix_inside_scope() {
        let scope = PartitionScope::tenant(make_tenant("acme"));
        let path = with_partition(scope, async { resolve_storage_path("docs/contract.pdf") })
            .await
            .unwrap();
        assert_eq!(path, PathBuf::from("acme/docs/contract.pdf"));
    }

    #[tokio::test]
    async fn test_distinct_tenants_never_share_paths() {
        let a = with_partition(PartitionScope::tenant(make_tenant("acme")), async {
            resolve_storage_path("logo.png")
        })
        .await
        .unwrap();
        let b = with_partition(PartitionScope::tenant(make_tenant("beta")), async {
            resolve_storage_path("logo.png")
        })
        .await
        .unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_context_is_consulted_at_call_time() {
        let outer = PartitionScope::tenant(make_tenant("outer"));
        let inner = PartitionScope::tenant(make_tenant("inner"));

        with_partition(outer, async {
            assert_eq!(
                resolve_storage_path("f").unwrap(),
                PathBuf::from("outer/f")
            );
            // A mid-unit-of-work scope change is reflected immediately
            with_partition(inner, async {
                assert_eq!(
                    resolve_storage_path("f").unwrap(),
                    PathBuf::from("inner/f")
                );
            })
            .await;
            assert_eq!(
                resolve_storage_path("f").unwrap(),
                PathBuf::from("outer/f")
            );
        })
        .await;
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        assert!(matches!(
            resolve_storage_path(""),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            resolve_storage_path("/etc/passwd"),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            resolve_storage_path("../other-tenant/secret.txt"),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            resolve_storage_path("docs/../../escape"),
            Err(Error::InvalidPath(_))
        ));
    }
}

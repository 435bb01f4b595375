//! Gateway application assembly

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use strata_core::context;
use strata_files::TenantFileStore;
use strata_lifecycle::LifecycleManager;
use strata_resolver::DomainResolver;

use crate::admin;
use crate::files;
use crate::middleware::tenant_resolution_middleware;

/// Shared gateway state
#[derive(Clone)]
pub struct GatewayState {
    pub resolver: Arc<DomainResolver>,
    pub lifecycle: Arc<LifecycleManager>,
    pub files: Arc<TenantFileStore>,
}

impl GatewayState {
    pub fn new(
        resolver: Arc<DomainResolver>,
        lifecycle: Arc<LifecycleManager>,
        files: Arc<TenantFileStore>,
    ) -> Self {
        Self {
            resolver,
            lifecycle,
            files,
        }
    }
}

/// Diagnostic route: reports the partition the request resolved to.
///
/// Reads the task-scoped context rather than the request extension, so it
/// exercises the same path every partition-scoped data access uses.
async fn whoami() -> Json<serde_json::Value> {
    let scope = context::current();
    Json(json!({
        "partition": scope.slug(),
        "tenant": scope.as_tenant().map(|t| json!({
            "slug": t.slug,
            "name": t.name,
        })),
    }))
}

/// Build the gateway router: tenant resolution around every route, plus the
/// administrative lifecycle surface.
pub fn build_app(state: GatewayState) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .route(
            "/files/{*path}",
            axum::routing::put(files::upload).get(files::download),
        )
        .route("/admin/tenants", post(admin::provision).get(admin::list))
        .route(
            "/admin/tenants/{slug}",
            axum::routing::patch(admin::update).delete(admin::hard_delete),
        )
        .route("/admin/tenants/{slug}/deactivate", post(admin::deactivate))
        .route("/admin/tenants/{slug}/reactivate", post(admin::reactivate))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_resolution_middleware,
        ))
        .with_state(state)
}

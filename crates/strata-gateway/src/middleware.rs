//! Tenant resolution middleware

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use strata_core::{context, Error};
use strata_resolver::Resolution;

use crate::app::GatewayState;

/// Extension carrying the request's resolution outcome.
///
/// Resolution runs once per request; this extension and the partition scope
/// are its only caches.
#[derive(Clone)]
pub struct ResolvedPartition(pub Resolution);

/// Resolve the request hostname and scope the partition context for the
/// duration of the request.
///
/// An unknown, unparseable, or missing hostname falls back to the public
/// partition; only store failures turn into a 500.
pub async fn tenant_resolution_middleware(
    State(state): State<GatewayState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let raw_host = req
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned)
        .or_else(|| req.uri().authority().map(|a| a.to_string()));

    let resolution = match raw_host {
        Some(host) => match state.resolver.resolve(&host).await {
            Ok(resolution) => resolution,
            Err(Error::InvalidHostname(_)) => {
                tracing::warn!(host = %host, "unparseable host header, treating as public");
                Resolution::Public
            }
            Err(e) => {
                tracing::error!(host = %host, error = %e, "tenant resolution failed");
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        },
        None => Resolution::Public,
    };

    req.extensions_mut().insert(ResolvedPartition(resolution.clone()));

    let scope = resolution.scope();
    Ok(context::with_partition(scope, next.run(req)).await)
}

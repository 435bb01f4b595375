//! Administrative lifecycle surface

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use strata_core::tenant::{OwnerId, Tenant, TenantUpdate};
use strata_core::Error;

use crate::app::GatewayState;

/// Error wrapper mapping the core taxonomy onto HTTP status codes.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::TenantNotFound(_) => StatusCode::NOT_FOUND,
            Error::TenantAlreadyExists(_)
            | Error::OwnerAlreadyHasTenant(_)
            | Error::DomainCollision(_)
            | Error::InconsistentLifecycleState(_) => StatusCode::CONFLICT,
            Error::InvalidSlug(_)
            | Error::InvalidHostname(_)
            | Error::InvalidPath(_)
            | Error::TenantRequired(_) => StatusCode::BAD_REQUEST,
            Error::StructuralProvisioningFailed { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ProvisionBody {
    pub name: String,
    pub slug: String,
    pub owner: i64,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    pub name: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

pub async fn provision(
    State(state): State<GatewayState>,
    Json(body): Json<ProvisionBody>,
) -> Result<(StatusCode, Json<Tenant>), ApiError> {
    let mut request = strata_lifecycle::ProvisionRequest::new(
        body.name,
        body.slug,
        OwnerId(body.owner),
    );
    if let Some(metadata) = body.metadata {
        request = request.with_metadata(metadata);
    }

    let tenant = state.lifecycle.provision(request).await?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

pub async fn list(State(state): State<GatewayState>) -> Result<Json<Vec<Tenant>>, ApiError> {
    Ok(Json(state.lifecycle.list_active().await?))
}

pub async fn update(
    State(state): State<GatewayState>,
    Path(slug): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<Tenant>, ApiError> {
    let tenant = state
        .lifecycle
        .update(
            &slug,
            TenantUpdate {
                name: body.name,
                metadata: body.metadata,
            },
        )
        .await?;
    Ok(Json(tenant))
}

pub async fn deactivate(
    State(state): State<GatewayState>,
    Path(slug): Path<String>,
) -> Result<Json<Tenant>, ApiError> {
    Ok(Json(state.lifecycle.deactivate(&slug).await?))
}

pub async fn reactivate(
    State(state): State<GatewayState>,
    Path(slug): Path<String>,
) -> Result<Json<Tenant>, ApiError> {
    Ok(Json(state.lifecycle.reactivate(&slug).await?))
}

pub async fn hard_delete(
    State(state): State<GatewayState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.lifecycle.hard_delete(&slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

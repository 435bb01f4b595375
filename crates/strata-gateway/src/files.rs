//! Partition-scoped file routes
//!
//! Uploads and downloads run inside the request's partition scope set by the
//! resolution middleware, so the storage prefix is derived at operation time
//! from the same context the rest of the request uses.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use strata_core::Error;

use crate::admin::ApiError;
use crate::app::GatewayState;

pub async fn upload(
    State(state): State<GatewayState>,
    Path(path): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    state.files.write(&path, &body).await?;
    Ok(StatusCode::CREATED)
}

pub async fn download(
    State(state): State<GatewayState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    match state.files.read(&path).await {
        Ok(contents) => Ok(Bytes::from(contents).into_response()),
        Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(StatusCode::NOT_FOUND.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

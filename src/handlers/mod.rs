//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the Posgate API.

pub mod categories;
pub mod config;
pub mod operators;
pub mod products;
pub mod sales;
pub mod stock;
pub mod verify;

use axum::{extract::State, response::Json};

use crate::db;
use crate::error::ApiError;
use crate::models::ServiceInfo;
use crate::server::AppState;

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Liveness handler that also pings the backing store
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = ServiceInfo),
        (status = 503, description = "Backing store unreachable", body = ApiError)
    ),
    tag = "root"
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<ServiceInfo>, ApiError> {
    db::health_check(&state.db).await.map_err(|err| {
        tracing::error!("Health check failed: {:?}", err);
        ApiError::new(
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Backing store unreachable",
        )
        .with_retry_after(5)
    })?;

    Ok(Json(ServiceInfo::default()))
}

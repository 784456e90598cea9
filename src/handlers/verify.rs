//! # License Verification Handler
//!
//! The desktop client's handshake: confirms the license authorizes access
//! and lazily provisions the tenant's partition so the data routes find it
//! ready.

use axum::{
    Extension,
    extract::State,
    http::HeaderMap,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{PartitionExtension, extract_license_key};
use crate::error::ApiError;
use crate::server::AppState;

/// Response payload for a successful license verification
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponseDto {
    /// Verification status
    #[schema(example = "ok")]
    pub status: String,
    /// Human-readable outcome message
    #[schema(example = "License valid")]
    pub message: String,
    /// Display identity of the license owner, if registered
    pub owner_email: Option<String>,
}

/// Verify the license key and provision the tenant partition
#[utoipa::path(
    get,
    path = "/api/v1/verify",
    responses(
        (status = 200, description = "License valid, partition ready", body = VerifyResponseDto),
        (status = 401, description = "Missing license header", body = ApiError),
        (status = 403, description = "License deactivated or expired", body = ApiError),
        (status = 404, description = "Unknown license key", body = ApiError),
        (status = 503, description = "Directory or store unavailable", body = ApiError)
    ),
    tag = "license"
)]
pub async fn verify_license(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponseDto>, ApiError> {
    state.store.initialize(&partition).await?;

    // The middleware has already authorized this key; the second lookup only
    // fetches the display identity for the response body.
    let license_key = extract_license_key(&headers)?;
    let owner_email = state
        .directory
        .find_by_key(&license_key)
        .await
        .ok()
        .flatten()
        .and_then(|record| record.owner_email);

    Ok(Json(VerifyResponseDto {
        status: "ok".to_string(),
        message: "License valid".to_string(),
        owner_email,
    }))
}

//! # Config Handlers
//!
//! Per-tenant settings, e.g. the currency exchange rate the desktop client
//! applies at the till.

use axum::{
    Extension,
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::PartitionExtension;
use crate::error::{ApiError, not_found};
use crate::repositories::ConfigRepository;
use crate::server::AppState;

/// Configuration entry as returned to the client
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfigEntryDto {
    #[schema(example = "exchange_rate")]
    pub key: String,
    #[schema(example = "2800")]
    pub value: String,
}

/// Request payload for setting a configuration value
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SetConfigDto {
    #[schema(example = "3100")]
    pub value: String,
}

/// Read a configuration value (documented defaults apply when unset)
#[utoipa::path(
    get,
    path = "/api/v1/config/{key}",
    params(("key" = String, Path, description = "Configuration key")),
    responses(
        (status = 200, description = "Configuration value", body = ConfigEntryDto),
        (status = 404, description = "Unknown key with no default", body = ApiError)
    ),
    tag = "config"
)]
pub async fn get_config(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Path(key): Path<String>,
) -> Result<Json<ConfigEntryDto>, ApiError> {
    let repo = ConfigRepository::new(&state.store, &partition);
    let value = repo
        .get(&key)
        .await?
        .ok_or_else(|| not_found("Config entry not found"))?;

    Ok(Json(ConfigEntryDto { key, value }))
}

/// Insert or replace a configuration value
#[utoipa::path(
    put,
    path = "/api/v1/config/{key}",
    params(("key" = String, Path, description = "Configuration key")),
    request_body = SetConfigDto,
    responses(
        (status = 200, description = "Configuration value stored", body = ConfigEntryDto)
    ),
    tag = "config"
)]
pub async fn set_config(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Path(key): Path<String>,
    Json(request): Json<SetConfigDto>,
) -> Result<Json<ConfigEntryDto>, ApiError> {
    let repo = ConfigRepository::new(&state.store, &partition);
    repo.set(&key, &request.value).await?;

    Ok(Json(ConfigEntryDto {
        key,
        value: request.value,
    }))
}

//! # Stock Handlers

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::PartitionExtension;
use crate::error::ApiError;
use crate::models::stock_entry::{StockEntry, StockJournalRow};
use crate::repositories::StockRepository;
use crate::server::AppState;

/// Request payload for a stock intake
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockIntakeDto {
    /// Units received
    #[schema(example = 10)]
    pub quantity: i32,
}

/// Stock journal entry as returned to the client
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockEntryDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub entered_at: DateTime<Utc>,
}

impl From<StockEntry> for StockEntryDto {
    fn from(entry: StockEntry) -> Self {
        Self {
            id: entry.id,
            product_id: entry.product_id,
            quantity: entry.quantity,
            entered_at: entry.entered_at,
        }
    }
}

/// Stock journal entry joined with its product name
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockJournalRowDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub entered_at: DateTime<Utc>,
}

impl From<StockJournalRow> for StockJournalRowDto {
    fn from(row: StockJournalRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            entered_at: row.entered_at,
        }
    }
}

/// Record inbound stock for a product
#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/stock",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = StockIntakeDto,
    responses(
        (status = 201, description = "Intake recorded", body = StockEntryDto),
        (status = 400, description = "Non-positive quantity", body = ApiError),
        (status = 404, description = "Product not found", body = ApiError)
    ),
    tag = "ledger"
)]
pub async fn record_intake(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Path(id): Path<Uuid>,
    Json(request): Json<StockIntakeDto>,
) -> Result<(StatusCode, Json<StockEntryDto>), ApiError> {
    let repo = StockRepository::new(&state.store, &partition);
    let entry = repo.record_intake(id, request.quantity).await?;

    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// The full stock journal, newest first
#[utoipa::path(
    get,
    path = "/api/v1/stock-journal",
    responses(
        (status = 200, description = "Stock journal entries", body = [StockJournalRowDto])
    ),
    tag = "ledger"
)]
pub async fn stock_journal(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
) -> Result<Json<Vec<StockJournalRowDto>>, ApiError> {
    let repo = StockRepository::new(&state.store, &partition);
    let rows = repo.journal().await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

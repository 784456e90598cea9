//! # Sales Handlers

use axum::{
    Extension,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::PartitionExtension;
use crate::error::{ApiError, insufficient_stock};
use crate::models::sale::{Sale, SaleReportRow};
use crate::repositories::{SaleOutcome, SaleRepository};
use crate::server::AppState;

/// Request payload for a sale
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaleRequestDto {
    pub product_id: Uuid,
    /// Units to sell
    #[schema(example = 1)]
    pub quantity: i32,
}

/// Committed sale as returned to the client
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaleDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Unit price snapshotted at sale time, in minor units
    pub unit_price: i64,
    pub sold_at: DateTime<Utc>,
}

impl From<Sale> for SaleDto {
    fn from(sale: Sale) -> Self {
        Self {
            id: sale.id,
            product_id: sale.product_id,
            quantity: sale.quantity,
            unit_price: sale.unit_price,
            sold_at: sale.sold_at,
        }
    }
}

/// Sales report row with the computed line total
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaleReportRowDto {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    /// Unit price snapshotted at sale time, in minor units
    pub unit_price: i64,
    /// `quantity * unit_price`, in minor units
    pub total: i64,
    pub sold_at: DateTime<Utc>,
}

impl From<SaleReportRow> for SaleReportRowDto {
    fn from(row: SaleReportRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total: row.total,
            sold_at: row.sold_at,
        }
    }
}

/// Query parameters for the sales report
#[derive(Debug, Deserialize, IntoParams)]
pub struct SalesReportParams {
    /// First day included in the report (YYYY-MM-DD)
    pub from: NaiveDate,
    /// Last day included in the report (YYYY-MM-DD)
    pub to: NaiveDate,
}

/// Sell units of a product
#[utoipa::path(
    post,
    path = "/api/v1/sales",
    request_body = SaleRequestDto,
    responses(
        (status = 201, description = "Sale committed", body = SaleDto),
        (status = 404, description = "Product not found", body = ApiError),
        (status = 409, description = "Insufficient stock", body = ApiError)
    ),
    tag = "ledger"
)]
pub async fn record_sale(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Json(request): Json<SaleRequestDto>,
) -> Result<(StatusCode, Json<SaleDto>), ApiError> {
    let repo = SaleRepository::new(&state.store, &partition);

    match repo.sell(request.product_id, request.quantity).await? {
        SaleOutcome::Completed(sale) => Ok((StatusCode::CREATED, Json(sale.into()))),
        SaleOutcome::InsufficientStock {
            requested,
            available,
        } => Err(insufficient_stock(requested, available)),
    }
}

/// Sales within a date range, newest first
#[utoipa::path(
    get,
    path = "/api/v1/sales",
    params(SalesReportParams),
    responses(
        (status = 200, description = "Sales report rows", body = [SaleReportRowDto]),
        (status = 400, description = "Invalid date range", body = ApiError)
    ),
    tag = "ledger"
)]
pub async fn sales_report(
    State(state): State<AppState>,
    Extension(PartitionExtension(partition)): Extension<PartitionExtension>,
    Query(params): Query<SalesReportParams>,
) -> Result<Json<Vec<SaleReportRowDto>>, ApiError> {
    let repo = SaleRepository::new(&state.store, &partition);
    let rows = repo.report(params.from, params.to).await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

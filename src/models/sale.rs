//! Sales ledger table definition and row models.
//!
//! `unit_price` is snapshotted from the product at sale time; later price
//! changes never rewrite history.

use chrono::{DateTime, Utc};
use sea_orm::{DeriveIden, FromQueryResult};
use uuid::Uuid;

#[derive(DeriveIden)]
pub enum Sales {
    Table,
    Id,
    ProductId,
    Quantity,
    UnitPrice,
    SoldAt,
}

/// One outbound sale ledger row.
#[derive(Debug, Clone, FromQueryResult)]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub sold_at: DateTime<Utc>,
}

/// Sale joined with its product name and computed line total for reporting.
#[derive(Debug, Clone, FromQueryResult)]
pub struct SaleReportRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub total: i64,
    pub sold_at: DateTime<Utc>,
}

//! Stock journal table definition and row models.
//!
//! The journal is an append-only log of inbound stock; entries are never
//! updated or deleted by tenant operations.

use chrono::{DateTime, Utc};
use sea_orm::{DeriveIden, FromQueryResult};
use uuid::Uuid;

#[derive(DeriveIden)]
pub enum StockEntries {
    Table,
    Id,
    ProductId,
    Quantity,
    EnteredAt,
}

/// One inbound stock journal entry.
#[derive(Debug, Clone, FromQueryResult)]
pub struct StockEntry {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub entered_at: DateTime<Utc>,
}

/// Journal entry joined with its product name for reporting.
#[derive(Debug, Clone, FromQueryResult)]
pub struct StockJournalRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub entered_at: DateTime<Utc>,
}

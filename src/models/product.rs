//! Product table definition and row model.
//!
//! `price` is in integral minor units; `quantity` is guarded by a column
//! CHECK so stock can never rest below zero.

use sea_orm::{DeriveIden, FromQueryResult};
use uuid::Uuid;

#[derive(DeriveIden)]
pub enum Products {
    Table,
    Id,
    Name,
    Price,
    Quantity,
    CategoryId,
    ImagePath,
}

/// One catalog product within a partition.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub category_id: Uuid,
    pub image_path: Option<String>,
}

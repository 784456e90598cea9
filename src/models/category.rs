//! Category table definition and row model.

use sea_orm::{DeriveIden, FromQueryResult};
use uuid::Uuid;

#[derive(DeriveIden)]
pub enum Categories {
    Table,
    Id,
    Name,
}

/// One product category within a partition.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

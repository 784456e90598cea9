//! Per-tenant configuration table definition and row model.

use sea_orm::{DeriveIden, FromQueryResult};

#[derive(DeriveIden)]
pub enum ConfigEntries {
    Table,
    Key,
    Value,
}

/// One key/value configuration entry within a partition.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

//! Operator table definition and row model.
//!
//! Operators are the tenant-local login accounts of the desktop client.

use sea_orm::{DeriveIden, FromQueryResult};
use uuid::Uuid;

#[derive(DeriveIden)]
pub enum Operators {
    Table,
    Id,
    Username,
    Password,
    Role,
}

/// One operator account within a partition.
#[derive(Debug, Clone, FromQueryResult)]
pub struct Operator {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub role: String,
}

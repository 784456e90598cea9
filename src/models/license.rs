//! License entity model
//!
//! This module contains the SeaORM entity model for the licenses table,
//! the central registry every authorization decision reads.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// License record gating access to one tenant partition
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "licenses")]
pub struct Model {
    /// Opaque license key (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,

    /// Whether the license currently authorizes access
    pub active: bool,

    /// Expiry timestamp; absent means the license never expires
    pub expires_at: Option<DateTimeWithTimeZone>,

    /// Display identity of the license owner, never used for authorization
    pub owner_email: Option<String>,

    /// Timestamp when the license was registered
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

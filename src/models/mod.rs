//! # Data Models
//!
//! This module contains the SeaORM entity for the shared license registry and
//! the table/row definitions for the partition-scoped tenant tables. The
//! partition tables are described with `Iden` enums plus `FromQueryResult`
//! rows rather than static entities because their namespace is resolved per
//! request.

pub mod category;
pub mod config_entry;
pub mod license;
pub mod operator;
pub mod product;
pub mod sale;
pub mod stock_entry;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Basic service information returned by the root endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// Service name
    pub name: String,
    /// Service version
    pub version: String,
    /// Service status
    pub status: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: "posgate".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            status: "ok".to_string(),
        }
    }
}

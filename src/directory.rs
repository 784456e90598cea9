//! # License Directory Client
//!
//! Read/update access to the central license registry. The gateway only
//! needs two operations from the directory: point lookup by key and a
//! state flip to deactivated. The production implementation reads the
//! `licenses` table; tests substitute an in-memory fake through the same
//! trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    entity::prelude::Expr,
};
use thiserror::Error;

use crate::models::license::{self, Entity as License};

/// A license record as seen by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRecord {
    /// Opaque unique key identifying the license.
    pub key: String,
    /// Whether the license currently authorizes access.
    pub active: bool,
    /// Expiry timestamp; `None` means the license never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Display identity of the owner, never used for authorization.
    pub owner_email: Option<String>,
}

impl From<license::Model> for LicenseRecord {
    fn from(model: license::Model) -> Self {
        Self {
            key: model.key,
            active: model.active,
            expires_at: model.expires_at.map(|ts| ts.with_timezone(&Utc)),
            owner_email: model.owner_email,
        }
    }
}

/// Errors that can occur while talking to the license directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("license directory query failed: {0}")]
    Backend(#[from] sea_orm::DbErr),
    #[error("license directory unavailable: {0}")]
    Unavailable(String),
}

/// Access to the central license registry.
#[async_trait]
pub trait LicenseDirectory: Send + Sync {
    /// Point lookup of a license record by key.
    async fn find_by_key(&self, key: &str) -> Result<Option<LicenseRecord>, DirectoryError>;

    /// Flip a license to deactivated. A no-op for already-inactive or
    /// unknown keys.
    async fn deactivate(&self, key: &str) -> Result<(), DirectoryError>;
}

/// License directory backed by the shared `licenses` table.
pub struct DbLicenseDirectory {
    db: DatabaseConnection,
}

impl DbLicenseDirectory {
    /// Create a directory client over the given connection pool.
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a license record (administrative seam, used by fixtures).
    pub async fn register(
        &self,
        key: &str,
        expires_at: Option<DateTime<Utc>>,
        owner_email: Option<String>,
    ) -> Result<LicenseRecord, DirectoryError> {
        let model = license::ActiveModel {
            key: Set(key.to_string()),
            active: Set(true),
            expires_at: Set(expires_at.map(Into::into)),
            owner_email: Set(owner_email),
            created_at: Set(Utc::now().into()),
        };

        let inserted = model.insert(&self.db).await?;

        Ok(inserted.into())
    }
}

#[async_trait]
impl LicenseDirectory for DbLicenseDirectory {
    async fn find_by_key(&self, key: &str) -> Result<Option<LicenseRecord>, DirectoryError> {
        let record = License::find_by_id(key).one(&self.db).await?;

        Ok(record.map(Into::into))
    }

    async fn deactivate(&self, key: &str) -> Result<(), DirectoryError> {
        // Conditional single-column write; touching an already-inactive
        // record affects zero rows and stays a no-op.
        License::update_many()
            .col_expr(license::Column::Active, Expr::value(false))
            .filter(license::Column::Key.eq(key))
            .filter(license::Column::Active.eq(true))
            .exec(&self.db)
            .await?;

        Ok(())
    }
}

//! # Config Repository
//!
//! Per-tenant key/value settings. Reads fall back to documented defaults
//! for well-known keys; writes are upserts, so repeated sets of the same
//! key never accumulate rows.

use sea_orm::ConnectionTrait;
use sea_orm::sea_query::{Alias, Expr, OnConflict, Query};

use crate::error::RepositoryError;
use crate::models::config_entry::ConfigEntries;
use crate::partition::PartitionId;
use crate::store::PartitionStore;

/// Key holding the tenant's currency exchange rate.
pub const EXCHANGE_RATE_KEY: &str = "exchange_rate";

/// Default exchange rate returned while the tenant has not set one.
pub const DEFAULT_EXCHANGE_RATE: &str = "2800";

/// Built-in default for a configuration key, if it has one.
pub fn default_for(key: &str) -> Option<&'static str> {
    match key {
        EXCHANGE_RATE_KEY => Some(DEFAULT_EXCHANGE_RATE),
        _ => None,
    }
}

/// Repository for configuration entries within one partition.
pub struct ConfigRepository<'a> {
    store: &'a PartitionStore,
    partition: &'a PartitionId,
}

impl<'a> ConfigRepository<'a> {
    /// Create a new repository scoped to the given partition.
    pub fn new(store: &'a PartitionStore, partition: &'a PartitionId) -> Self {
        Self { store, partition }
    }

    fn schema(&self) -> Alias {
        Alias::new(self.partition.schema_name())
    }

    /// Read a configuration value, falling back to the key's documented
    /// default when nothing has been stored yet.
    pub async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let stmt = Query::select()
            .column(ConfigEntries::Value)
            .from((self.schema(), ConfigEntries::Table))
            .and_where(Expr::col(ConfigEntries::Key).eq(key))
            .to_owned();

        let stored = self
            .store
            .connection()
            .query_one(self.store.backend().build(&stmt))
            .await
            .map_err(RepositoryError::database_error)?
            .map(|row| row.try_get::<String>("", "value"))
            .transpose()
            .map_err(RepositoryError::database_error)?;

        Ok(stored.or_else(|| default_for(key).map(str::to_string)))
    }

    /// Insert or replace the value stored under `key`.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        if key.trim().is_empty() {
            return Err(RepositoryError::validation_error(
                "Config key cannot be empty",
            ));
        }

        let stmt = Query::insert()
            .into_table((self.schema(), ConfigEntries::Table))
            .columns([ConfigEntries::Key, ConfigEntries::Value])
            .values_panic([key.into(), value.into()])
            .on_conflict(
                OnConflict::column(ConfigEntries::Key)
                    .update_column(ConfigEntries::Value)
                    .to_owned(),
            )
            .to_owned();

        self.store
            .connection()
            .execute(self.store.backend().build(&stmt))
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }
}

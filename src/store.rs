//! # Partition Store
//!
//! Provisions and scopes access to per-tenant namespaces inside the shared
//! relational store. On Postgres a partition is a schema; on the SQLite test
//! backend it is an attached in-memory database. Either way the namespace
//! name comes only from the resolved [`PartitionId`], is validated against
//! the resolver's shape, and is identifier-quoted before it reaches any
//! statement text.

use sea_orm::sea_query::{Alias, ColumnDef, Expr, Table, TableCreateStatement};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, Statement,
    TransactionTrait,
};

use crate::error::RepositoryError;
use crate::models::category::Categories;
use crate::models::config_entry::ConfigEntries;
use crate::models::operator::Operators;
use crate::models::product::Products;
use crate::models::sale::Sales;
use crate::models::stock_entry::StockEntries;
use crate::partition::{PartitionId, is_valid_schema_name, quote_ident};
use crate::seeds::{self, PartitionSeeds};

/// Store handle shared by all tenant operations.
#[derive(Clone)]
pub struct PartitionStore {
    db: DatabaseConnection,
    seeds: PartitionSeeds,
}

impl PartitionStore {
    /// Create a store over the given connection pool.
    pub fn new(db: DatabaseConnection, seeds: PartitionSeeds) -> Self {
        Self { db, seeds }
    }

    pub(crate) fn backend(&self) -> DbBackend {
        self.db.get_database_backend()
    }

    /// Shared connection for single-statement partition operations. The
    /// namespace still travels inside builder-quoted table references.
    pub(crate) fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Begin a transaction for operations against `partition`.
    ///
    /// The namespace name is re-validated on every entry; anything that does
    /// not look like a resolver-produced identifier is rejected before a
    /// single statement runs.
    pub async fn begin(
        &self,
        partition: &PartitionId,
    ) -> Result<DatabaseTransaction, RepositoryError> {
        self.ensure_supported()?;
        ensure_valid_namespace(partition)?;

        self.db
            .begin()
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Idempotently provision the partition: namespace, tables, seed rows.
    ///
    /// Safe to call redundantly and concurrently for the same partition —
    /// namespace and table creation use `IF NOT EXISTS` semantics, and the
    /// seed pass is both count-guarded and conflict-tolerant.
    pub async fn initialize(&self, partition: &PartitionId) -> Result<(), RepositoryError> {
        self.ensure_supported()?;
        ensure_valid_namespace(partition)?;

        self.ensure_namespace(partition).await?;

        let schema = Alias::new(partition.schema_name());
        for stmt in partition_tables(&schema) {
            self.db
                .execute(self.backend().build(&stmt))
                .await
                .map_err(RepositoryError::database_error)?;
        }

        let txn = self.begin(partition).await?;
        seeds::seed_partition(&txn, self.backend(), &schema, &self.seeds).await?;
        txn.commit().await.map_err(RepositoryError::database_error)?;

        tracing::debug!(partition = %partition, "Partition provisioned");
        Ok(())
    }

    fn ensure_supported(&self) -> Result<(), RepositoryError> {
        match self.backend() {
            DbBackend::Postgres | DbBackend::Sqlite => Ok(()),
            DbBackend::MySql => Err(RepositoryError::UnsupportedBackend("mysql")),
        }
    }

    /// Create the namespace itself if it does not exist yet.
    async fn ensure_namespace(&self, partition: &PartitionId) -> Result<(), RepositoryError> {
        let quoted = quote_ident(partition.schema_name());

        match self.backend() {
            DbBackend::Postgres => {
                self.db
                    .execute(Statement::from_string(
                        DbBackend::Postgres,
                        format!("CREATE SCHEMA IF NOT EXISTS {quoted}"),
                    ))
                    .await
                    .map_err(RepositoryError::database_error)?;
            }
            DbBackend::Sqlite => {
                if !self.sqlite_namespace_attached(partition).await? {
                    let attach = self
                        .db
                        .execute(Statement::from_string(
                            DbBackend::Sqlite,
                            format!("ATTACH DATABASE ':memory:' AS {quoted}"),
                        ))
                        .await;

                    // A concurrent initialize may have attached it between the
                    // check and the ATTACH; re-check before giving up.
                    if attach.is_err() && !self.sqlite_namespace_attached(partition).await? {
                        attach.map_err(RepositoryError::database_error)?;
                    }
                }
            }
            DbBackend::MySql => return Err(RepositoryError::UnsupportedBackend("mysql")),
        }

        Ok(())
    }

    async fn sqlite_namespace_attached(
        &self,
        partition: &PartitionId,
    ) -> Result<bool, RepositoryError> {
        let rows = self
            .db
            .query_all(Statement::from_string(
                DbBackend::Sqlite,
                "PRAGMA database_list".to_string(),
            ))
            .await
            .map_err(RepositoryError::database_error)?;

        for row in rows {
            if let Ok(name) = row.try_get::<String>("", "name")
                && name == partition.schema_name()
            {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

fn ensure_valid_namespace(partition: &PartitionId) -> Result<(), RepositoryError> {
    if is_valid_schema_name(partition.schema_name()) {
        Ok(())
    } else {
        Err(RepositoryError::validation_error(format!(
            "invalid partition namespace '{}'",
            partition.schema_name()
        )))
    }
}

/// DDL for the six partition entity tables.
///
/// Unique keys are declared inline and all statements are `IF NOT EXISTS`,
/// so redundant provisioning runs are no-ops on both backends. Referential
/// policy between the tables is enforced by the repositories (restrict on
/// delete), not by declared constraints.
fn partition_tables(schema: &Alias) -> Vec<TableCreateStatement> {
    vec![
        Table::create()
            .table((schema.clone(), Operators::Table))
            .if_not_exists()
            .col(ColumnDef::new(Operators::Id).uuid().not_null().primary_key())
            .col(
                ColumnDef::new(Operators::Username)
                    .text()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Operators::Password).text().not_null())
            .col(ColumnDef::new(Operators::Role).text().not_null())
            .to_owned(),
        Table::create()
            .table((schema.clone(), Categories::Table))
            .if_not_exists()
            .col(
                ColumnDef::new(Categories::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Categories::Name)
                    .text()
                    .not_null()
                    .unique_key(),
            )
            .to_owned(),
        Table::create()
            .table((schema.clone(), Products::Table))
            .if_not_exists()
            .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Products::Name).text().not_null())
            .col(ColumnDef::new(Products::Price).big_integer().not_null())
            .col(
                ColumnDef::new(Products::Quantity)
                    .integer()
                    .not_null()
                    .default(0)
                    .check(Expr::col(Products::Quantity).gte(0)),
            )
            .col(ColumnDef::new(Products::CategoryId).uuid().not_null())
            .col(ColumnDef::new(Products::ImagePath).text().null())
            .to_owned(),
        Table::create()
            .table((schema.clone(), StockEntries::Table))
            .if_not_exists()
            .col(
                ColumnDef::new(StockEntries::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(StockEntries::ProductId).uuid().not_null())
            .col(ColumnDef::new(StockEntries::Quantity).integer().not_null())
            .col(
                ColumnDef::new(StockEntries::EnteredAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned(),
        Table::create()
            .table((schema.clone(), Sales::Table))
            .if_not_exists()
            .col(ColumnDef::new(Sales::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Sales::ProductId).uuid().not_null())
            .col(ColumnDef::new(Sales::Quantity).integer().not_null())
            .col(ColumnDef::new(Sales::UnitPrice).big_integer().not_null())
            .col(
                ColumnDef::new(Sales::SoldAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned(),
        Table::create()
            .table((schema.clone(), ConfigEntries::Table))
            .if_not_exists()
            .col(
                ColumnDef::new(ConfigEntries::Key)
                    .text()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(ConfigEntries::Value).text().not_null())
            .to_owned(),
    ]
}


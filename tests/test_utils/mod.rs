//! Test utilities for partition store testing.
//!
//! Tests run against an in-memory SQLite database with the registry
//! migrations applied. The pool is pinned to a single connection so that
//! attached partition namespaces stay visible across the whole test.

use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use posgate::partition::PartitionId;
use posgate::seeds::PartitionSeeds;
use posgate::store::PartitionStore;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds a partition store over the given connection with test seeds.
#[allow(dead_code)]
pub fn test_store(db: &DatabaseConnection) -> PartitionStore {
    PartitionStore::new(
        db.clone(),
        PartitionSeeds {
            admin_password: "admin".to_string(),
        },
    )
}

/// Resolves and provisions a partition for the given license key.
#[allow(dead_code)]
pub async fn provisioned_partition(store: &PartitionStore, key: &str) -> Result<PartitionId> {
    let partition = PartitionId::resolve(key);
    store.initialize(&partition).await?;
    Ok(partition)
}

/// Counts rows in a partition table directly.
#[allow(dead_code)]
pub async fn count_rows(
    db: &DatabaseConnection,
    partition: &PartitionId,
    table: &str,
) -> Result<i64> {
    let stmt = Statement::from_string(
        db.get_database_backend(),
        format!(
            "SELECT COUNT(*) AS n FROM \"{}\".\"{}\"",
            partition.schema_name(),
            table
        ),
    );

    let row = db
        .query_one(stmt)
        .await?
        .ok_or_else(|| anyhow::anyhow!("count query returned no row"))?;

    Ok(row.try_get::<i64>("", "n")?)
}

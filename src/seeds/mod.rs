//! Partition seeding functionality
//!
//! Seeds a freshly provisioned partition with its default operator, category,
//! and configuration rows. Seeding is guarded twice: it only runs while the
//! operator set is empty, and every insert tolerates conflicts, so redundant
//! or concurrent provisioning runs never duplicate the defaults.

use sea_orm::sea_query::{Alias, Expr, OnConflict, Query};
use sea_orm::{ConnectionTrait, DbBackend};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::category::Categories;
use crate::models::config_entry::ConfigEntries;
use crate::models::operator::Operators;
use crate::repositories::config_entry::{DEFAULT_EXCHANGE_RATE, EXCHANGE_RATE_KEY};

/// Username of the operator seeded into every new partition.
pub const SEED_ADMIN_USERNAME: &str = "admin";

/// Role of the seeded operator.
pub const SEED_ADMIN_ROLE: &str = "admin";

/// Name of the category seeded into every new partition.
pub const SEED_CATEGORY_NAME: &str = "General";

/// Configurable seed values for a new partition.
#[derive(Debug, Clone)]
pub struct PartitionSeeds {
    /// Password assigned to the seeded `admin` operator.
    pub admin_password: String,
}

/// Seed the partition defaults if the operator set is currently empty.
pub async fn seed_partition<C: ConnectionTrait>(
    conn: &C,
    backend: DbBackend,
    schema: &Alias,
    seeds: &PartitionSeeds,
) -> Result<(), RepositoryError> {
    let count_stmt = Query::select()
        .expr_as(Expr::col(Operators::Id).count(), Alias::new("operator_count"))
        .from((schema.clone(), Operators::Table))
        .to_owned();

    let operator_count: i64 = conn
        .query_one(backend.build(&count_stmt))
        .await
        .map_err(RepositoryError::database_error)?
        .map(|row| row.try_get("", "operator_count"))
        .transpose()
        .map_err(RepositoryError::database_error)?
        .unwrap_or(0);

    if operator_count > 0 {
        log::debug!("Partition already seeded, skipping");
        return Ok(());
    }

    log::info!("Seeding partition defaults");

    let admin = Query::insert()
        .into_table((schema.clone(), Operators::Table))
        .columns([
            Operators::Id,
            Operators::Username,
            Operators::Password,
            Operators::Role,
        ])
        .values_panic([
            Uuid::new_v4().into(),
            SEED_ADMIN_USERNAME.into(),
            seeds.admin_password.clone().into(),
            SEED_ADMIN_ROLE.into(),
        ])
        .on_conflict(
            OnConflict::column(Operators::Username)
                .do_nothing()
                .to_owned(),
        )
        .to_owned();

    let category = Query::insert()
        .into_table((schema.clone(), Categories::Table))
        .columns([Categories::Id, Categories::Name])
        .values_panic([Uuid::new_v4().into(), SEED_CATEGORY_NAME.into()])
        .on_conflict(OnConflict::column(Categories::Name).do_nothing().to_owned())
        .to_owned();

    let exchange_rate = Query::insert()
        .into_table((schema.clone(), ConfigEntries::Table))
        .columns([ConfigEntries::Key, ConfigEntries::Value])
        .values_panic([EXCHANGE_RATE_KEY.into(), DEFAULT_EXCHANGE_RATE.into()])
        .on_conflict(OnConflict::column(ConfigEntries::Key).do_nothing().to_owned())
        .to_owned();

    for stmt in [admin, category, exchange_rate] {
        conn.execute(backend.build(&stmt))
            .await
            .map_err(RepositoryError::database_error)?;
    }

    Ok(())
}

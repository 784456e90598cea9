//! Database migrations for the Posgate API.
//!
//! Migrations cover the shared license registry only; per-tenant partition
//! tables are provisioned at runtime because their namespaces are dynamic.

pub use sea_orm_migration::prelude::*;

mod m2026_01_10_000001_create_licenses;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m2026_01_10_000001_create_licenses::Migration)]
    }
}

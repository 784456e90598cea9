//! # Stock Repository
//!
//! Inbound stock intake and the stock journal report. An intake is one
//! transaction: the product's quantity increment and the journal append
//! commit together or not at all.

use chrono::Utc;
use metrics::counter;
use sea_orm::sea_query::{Alias, Expr, Order, Query};
use sea_orm::{ConnectionTrait, FromQueryResult};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::product::Products;
use crate::models::stock_entry::{StockEntries, StockEntry, StockJournalRow};
use crate::partition::PartitionId;
use crate::store::PartitionStore;

/// Repository for the stock ledger within one partition.
pub struct StockRepository<'a> {
    store: &'a PartitionStore,
    partition: &'a PartitionId,
}

impl<'a> StockRepository<'a> {
    /// Create a new repository scoped to the given partition.
    pub fn new(store: &'a PartitionStore, partition: &'a PartitionId) -> Self {
        Self { store, partition }
    }

    fn schema(&self) -> Alias {
        Alias::new(self.partition.schema_name())
    }

    /// Record inbound stock: increment the product's quantity and append a
    /// journal entry atomically.
    pub async fn record_intake(
        &self,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<StockEntry, RepositoryError> {
        if quantity <= 0 {
            return Err(RepositoryError::validation_error(
                "Intake quantity must be positive",
            ));
        }

        let txn = self.store.begin(self.partition).await?;
        let backend = self.store.backend();

        let increment = Query::update()
            .table((self.schema(), Products::Table))
            .value(
                Products::Quantity,
                Expr::col(Products::Quantity).add(quantity),
            )
            .and_where(Expr::col(Products::Id).eq(product_id))
            .to_owned();

        let result = txn
            .execute(backend.build(&increment))
            .await
            .map_err(RepositoryError::database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Product not found".to_string()));
        }

        let entry = StockEntry {
            id: Uuid::new_v4(),
            product_id,
            quantity,
            entered_at: Utc::now(),
        };

        let append = Query::insert()
            .into_table((self.schema(), StockEntries::Table))
            .columns([
                StockEntries::Id,
                StockEntries::ProductId,
                StockEntries::Quantity,
                StockEntries::EnteredAt,
            ])
            .values_panic([
                entry.id.into(),
                entry.product_id.into(),
                entry.quantity.into(),
                entry.entered_at.into(),
            ])
            .to_owned();

        txn.execute(backend.build(&append))
            .await
            .map_err(RepositoryError::database_error)?;
        txn.commit().await.map_err(RepositoryError::database_error)?;

        counter!("posgate_stock_intake_total").increment(1);
        Ok(entry)
    }

    /// The full stock journal joined with product names, newest first.
    pub async fn journal(&self) -> Result<Vec<StockJournalRow>, RepositoryError> {
        let stmt = Query::select()
            .column((StockEntries::Table, StockEntries::Id))
            .column((StockEntries::Table, StockEntries::ProductId))
            .expr_as(
                Expr::col((Products::Table, Products::Name)),
                Alias::new("product_name"),
            )
            .column((StockEntries::Table, StockEntries::Quantity))
            .column((StockEntries::Table, StockEntries::EnteredAt))
            .from((self.schema(), StockEntries::Table))
            .inner_join(
                (self.schema(), Products::Table),
                Expr::col((StockEntries::Table, StockEntries::ProductId))
                    .equals((Products::Table, Products::Id)),
            )
            .order_by((StockEntries::Table, StockEntries::EnteredAt), Order::Desc)
            .to_owned();

        StockJournalRow::find_by_statement(self.store.backend().build(&stmt))
            .all(self.store.connection())
            .await
            .map_err(RepositoryError::database_error)
    }
}

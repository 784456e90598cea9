//! # Sale Repository
//!
//! The outbound sales ledger. A sale is one transaction around a guarded
//! conditional decrement: the sufficiency check and the stock mutation are
//! the same statement, so two concurrent sales on one product can never
//! jointly oversell, whichever of them loses the race.

use chrono::{Days, NaiveDate, NaiveTime, Utc};
use metrics::counter;
use sea_orm::sea_query::{Alias, Expr, Order, Query};
use sea_orm::{ConnectionTrait, FromQueryResult};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::product::{Product, Products};
use crate::models::sale::{Sale, SaleReportRow, Sales};
use crate::partition::PartitionId;
use crate::store::PartitionStore;

/// Outcome of a sale attempt. Insufficient stock is an expected business
/// result, not an error.
#[derive(Debug, Clone)]
pub enum SaleOutcome {
    /// The sale committed; the ledger row carries the snapshotted unit price.
    Completed(Sale),
    /// The requested quantity exceeded the stock on hand; nothing changed.
    InsufficientStock { requested: i32, available: i32 },
}

/// Repository for the sales ledger within one partition.
pub struct SaleRepository<'a> {
    store: &'a PartitionStore,
    partition: &'a PartitionId,
}

impl<'a> SaleRepository<'a> {
    /// Create a new repository scoped to the given partition.
    pub fn new(store: &'a PartitionStore, partition: &'a PartitionId) -> Self {
        Self { store, partition }
    }

    fn schema(&self) -> Alias {
        Alias::new(self.partition.schema_name())
    }

    /// Attempt to sell `quantity` units of a product.
    ///
    /// The unit price is read and snapshotted in the same transaction that
    /// decrements stock, so later catalog price changes never rewrite the
    /// ledger.
    pub async fn sell(
        &self,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<SaleOutcome, RepositoryError> {
        if quantity <= 0 {
            return Err(RepositoryError::validation_error(
                "Sale quantity must be positive",
            ));
        }

        let txn = self.store.begin(self.partition).await?;
        let backend = self.store.backend();

        let product = self
            .fetch_product(&txn, product_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Product not found".to_string()))?;

        let decrement = Query::update()
            .table((self.schema(), Products::Table))
            .value(
                Products::Quantity,
                Expr::col(Products::Quantity).sub(quantity),
            )
            .and_where(Expr::col(Products::Id).eq(product_id))
            .and_where(Expr::col(Products::Quantity).gte(quantity))
            .to_owned();

        let result = txn
            .execute(backend.build(&decrement))
            .await
            .map_err(RepositoryError::database_error)?;

        if result.rows_affected() == 0 {
            // Lost the race or plain short on stock. Re-read the quantity so
            // the reported availability reflects what is actually left.
            let available = self
                .fetch_product(&txn, product_id)
                .await?
                .map(|p| p.quantity)
                .unwrap_or(0);
            txn.rollback()
                .await
                .map_err(RepositoryError::database_error)?;

            counter!("posgate_sales_total", "outcome" => "insufficient_stock").increment(1);
            return Ok(SaleOutcome::InsufficientStock {
                requested: quantity,
                available,
            });
        }

        let sale = Sale {
            id: Uuid::new_v4(),
            product_id,
            quantity,
            unit_price: product.price,
            sold_at: Utc::now(),
        };

        let append = Query::insert()
            .into_table((self.schema(), Sales::Table))
            .columns([
                Sales::Id,
                Sales::ProductId,
                Sales::Quantity,
                Sales::UnitPrice,
                Sales::SoldAt,
            ])
            .values_panic([
                sale.id.into(),
                sale.product_id.into(),
                sale.quantity.into(),
                sale.unit_price.into(),
                sale.sold_at.into(),
            ])
            .to_owned();

        txn.execute(backend.build(&append))
            .await
            .map_err(RepositoryError::database_error)?;
        txn.commit().await.map_err(RepositoryError::database_error)?;

        counter!("posgate_sales_total", "outcome" => "completed").increment(1);
        Ok(SaleOutcome::Completed(sale))
    }

    /// Sales between `date_from` and `date_to` (both inclusive), joined with
    /// product names and line totals, newest first.
    pub async fn report(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<SaleReportRow>, RepositoryError> {
        if date_from > date_to {
            return Err(RepositoryError::validation_error(
                "Report range start must not be after its end",
            ));
        }

        let range_start = date_from.and_time(NaiveTime::MIN).and_utc();
        let range_end = date_to
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN)
            .and_utc();

        let stmt = Query::select()
            .column((Sales::Table, Sales::Id))
            .column((Sales::Table, Sales::ProductId))
            .expr_as(
                Expr::col((Products::Table, Products::Name)),
                Alias::new("product_name"),
            )
            .column((Sales::Table, Sales::Quantity))
            .column((Sales::Table, Sales::UnitPrice))
            .expr_as(
                Expr::col((Sales::Table, Sales::Quantity))
                    .mul(Expr::col((Sales::Table, Sales::UnitPrice))),
                Alias::new("total"),
            )
            .column((Sales::Table, Sales::SoldAt))
            .from((self.schema(), Sales::Table))
            .inner_join(
                (self.schema(), Products::Table),
                Expr::col((Sales::Table, Sales::ProductId))
                    .equals((Products::Table, Products::Id)),
            )
            .and_where(Expr::col((Sales::Table, Sales::SoldAt)).gte(range_start))
            .and_where(Expr::col((Sales::Table, Sales::SoldAt)).lt(range_end))
            .order_by((Sales::Table, Sales::SoldAt), Order::Desc)
            .to_owned();

        SaleReportRow::find_by_statement(self.store.backend().build(&stmt))
            .all(self.store.connection())
            .await
            .map_err(RepositoryError::database_error)
    }

    async fn fetch_product<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: Uuid,
    ) -> Result<Option<Product>, RepositoryError> {
        let stmt = Query::select()
            .columns([
                Products::Id,
                Products::Name,
                Products::Price,
                Products::Quantity,
                Products::CategoryId,
                Products::ImagePath,
            ])
            .from((self.schema(), Products::Table))
            .and_where(Expr::col(Products::Id).eq(product_id))
            .to_owned();

        Product::find_by_statement(self.store.backend().build(&stmt))
            .one(conn)
            .await
            .map_err(RepositoryError::database_error)
    }
}

//! # Product Repository
//!
//! Catalog product CRUD within one partition. Stock quantity is owned by the
//! ledger operations (intake and sale); catalog updates never touch it.
//! Deleting a product with ledger history is refused.

use sea_orm::sea_query::{Alias, DynIden, Expr, IntoIden, Order, Query};
use sea_orm::{ConnectionTrait, FromQueryResult};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::category::Categories;
use crate::models::product::{Product, Products};
use crate::models::sale::Sales;
use crate::models::stock_entry::StockEntries;
use crate::partition::PartitionId;
use crate::store::PartitionStore;

/// Request data for creating a new product
#[derive(Debug, Clone)]
pub struct CreateProductRequest {
    pub name: String,
    /// Unit price in minor units.
    pub price: i64,
    /// Opening stock level.
    pub quantity: i32,
    pub category_id: Uuid,
    pub image_path: Option<String>,
}

/// Request data for updating a product; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub category_id: Option<Uuid>,
    pub image_path: Option<Option<String>>,
}

/// Repository for products within one partition.
pub struct ProductRepository<'a> {
    store: &'a PartitionStore,
    partition: &'a PartitionId,
}

impl<'a> ProductRepository<'a> {
    /// Create a new repository scoped to the given partition.
    pub fn new(store: &'a PartitionStore, partition: &'a PartitionId) -> Self {
        Self { store, partition }
    }

    fn schema(&self) -> Alias {
        Alias::new(self.partition.schema_name())
    }

    const COLUMNS: [Products; 6] = [
        Products::Id,
        Products::Name,
        Products::Price,
        Products::Quantity,
        Products::CategoryId,
        Products::ImagePath,
    ];

    fn validate(request: &CreateProductRequest) -> Result<(), RepositoryError> {
        if request.name.trim().is_empty() {
            return Err(RepositoryError::validation_error(
                "Product name cannot be empty",
            ));
        }
        if request.price < 0 {
            return Err(RepositoryError::validation_error(
                "Product price cannot be negative",
            ));
        }
        if request.quantity < 0 {
            return Err(RepositoryError::validation_error(
                "Product quantity cannot be negative",
            ));
        }
        Ok(())
    }

    /// Create a new product under an existing category.
    pub async fn create(
        &self,
        request: CreateProductRequest,
    ) -> Result<Product, RepositoryError> {
        Self::validate(&request)?;

        let txn = self.store.begin(self.partition).await?;
        let backend = self.store.backend();

        if !self
            .category_exists(&txn, request.category_id)
            .await?
        {
            return Err(RepositoryError::NotFound("Category not found".to_string()));
        }

        let product = Product {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            price: request.price,
            quantity: request.quantity,
            category_id: request.category_id,
            image_path: request.image_path,
        };

        let stmt = Query::insert()
            .into_table((self.schema(), Products::Table))
            .columns(Self::COLUMNS)
            .values_panic([
                product.id.into(),
                product.name.clone().into(),
                product.price.into(),
                product.quantity.into(),
                product.category_id.into(),
                product.image_path.clone().into(),
            ])
            .to_owned();

        txn.execute(backend.build(&stmt))
            .await
            .map_err(RepositoryError::database_error)?;
        txn.commit().await.map_err(RepositoryError::database_error)?;

        Ok(product)
    }

    /// Fetch a product by id.
    pub async fn get(&self, id: Uuid) -> Result<Product, RepositoryError> {
        let stmt = Query::select()
            .columns(Self::COLUMNS)
            .from((self.schema(), Products::Table))
            .and_where(Expr::col(Products::Id).eq(id))
            .to_owned();

        Product::find_by_statement(self.store.backend().build(&stmt))
            .one(self.store.connection())
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::NotFound("Product not found".to_string()))
    }

    /// List products, optionally filtered to one category, ordered by name.
    pub async fn list(&self, category_id: Option<Uuid>) -> Result<Vec<Product>, RepositoryError> {
        let mut stmt = Query::select()
            .columns(Self::COLUMNS)
            .from((self.schema(), Products::Table))
            .order_by(Products::Name, Order::Asc)
            .to_owned();

        if let Some(category_id) = category_id {
            stmt.and_where(Expr::col(Products::CategoryId).eq(category_id));
        }

        Product::find_by_statement(self.store.backend().build(&stmt))
            .all(self.store.connection())
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Apply a partial update to a product's catalog fields.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateProductRequest,
    ) -> Result<Product, RepositoryError> {
        if let Some(name) = &request.name
            && name.trim().is_empty()
        {
            return Err(RepositoryError::validation_error(
                "Product name cannot be empty",
            ));
        }
        if let Some(price) = request.price
            && price < 0
        {
            return Err(RepositoryError::validation_error(
                "Product price cannot be negative",
            ));
        }

        let txn = self.store.begin(self.partition).await?;
        let backend = self.store.backend();

        if let Some(category_id) = request.category_id
            && !self.category_exists(&txn, category_id).await?
        {
            return Err(RepositoryError::NotFound("Category not found".to_string()));
        }

        let mut stmt = Query::update()
            .table((self.schema(), Products::Table))
            .and_where(Expr::col(Products::Id).eq(id))
            .to_owned();

        let mut dirty = false;
        if let Some(name) = &request.name {
            stmt.value(Products::Name, name.trim());
            dirty = true;
        }
        if let Some(price) = request.price {
            stmt.value(Products::Price, price);
            dirty = true;
        }
        if let Some(category_id) = request.category_id {
            stmt.value(Products::CategoryId, category_id);
            dirty = true;
        }
        if let Some(image_path) = &request.image_path {
            stmt.value(Products::ImagePath, image_path.clone());
            dirty = true;
        }

        if dirty {
            let result = txn
                .execute(backend.build(&stmt))
                .await
                .map_err(RepositoryError::database_error)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound("Product not found".to_string()));
            }
        }

        let fetch = Query::select()
            .columns(Self::COLUMNS)
            .from((self.schema(), Products::Table))
            .and_where(Expr::col(Products::Id).eq(id))
            .to_owned();

        let product = Product::find_by_statement(backend.build(&fetch))
            .one(&txn)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::NotFound("Product not found".to_string()))?;

        txn.commit().await.map_err(RepositoryError::database_error)?;
        Ok(product)
    }

    /// Delete a product that has no ledger history.
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let txn = self.store.begin(self.partition).await?;
        let backend = self.store.backend();

        let sale_refs = self
            .count_references(&txn, Sales::Table.into_iden(), Sales::ProductId.into_iden(), id)
            .await?;
        if sale_refs > 0 {
            return Err(RepositoryError::Conflict(
                "Product is referenced by sales".to_string(),
            ));
        }

        let journal_refs = self
            .count_references(
                &txn,
                StockEntries::Table.into_iden(),
                StockEntries::ProductId.into_iden(),
                id,
            )
            .await?;
        if journal_refs > 0 {
            return Err(RepositoryError::Conflict(
                "Product is referenced by stock journal entries".to_string(),
            ));
        }

        let delete_stmt = Query::delete()
            .from_table((self.schema(), Products::Table))
            .and_where(Expr::col(Products::Id).eq(id))
            .to_owned();

        let result = txn
            .execute(backend.build(&delete_stmt))
            .await
            .map_err(RepositoryError::database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Product not found".to_string()));
        }

        txn.commit().await.map_err(RepositoryError::database_error)?;
        Ok(())
    }

    async fn count_references<C: ConnectionTrait>(
        &self,
        conn: &C,
        table: DynIden,
        product_column: DynIden,
        id: Uuid,
    ) -> Result<i64, RepositoryError> {
        let stmt = Query::select()
            .expr_as(
                Expr::col(product_column.clone()).count(),
                Alias::new("reference_count"),
            )
            .from((self.schema(), table))
            .and_where(Expr::col(product_column).eq(id))
            .to_owned();

        let count = conn
            .query_one(self.store.backend().build(&stmt))
            .await
            .map_err(RepositoryError::database_error)?
            .map(|row| row.try_get("", "reference_count"))
            .transpose()
            .map_err(RepositoryError::database_error)?
            .unwrap_or(0);

        Ok(count)
    }

    async fn category_exists<C: ConnectionTrait>(
        &self,
        conn: &C,
        category_id: Uuid,
    ) -> Result<bool, RepositoryError> {
        let stmt = Query::select()
            .column(Categories::Id)
            .from((self.schema(), Categories::Table))
            .and_where(Expr::col(Categories::Id).eq(category_id))
            .to_owned();

        let row = conn
            .query_one(self.store.backend().build(&stmt))
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(row.is_some())
    }
}

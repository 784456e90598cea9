//! # Category Repository
//!
//! Catalog category CRUD within one partition. Deleting a category that
//! still owns products is refused rather than orphaning or cascading.

use sea_orm::sea_query::{Alias, Expr, Order, Query};
use sea_orm::{ConnectionTrait, FromQueryResult};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::category::{Categories, Category};
use crate::models::product::Products;
use crate::partition::PartitionId;
use crate::store::PartitionStore;

/// Repository for categories within one partition.
pub struct CategoryRepository<'a> {
    store: &'a PartitionStore,
    partition: &'a PartitionId,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new repository scoped to the given partition.
    pub fn new(store: &'a PartitionStore, partition: &'a PartitionId) -> Self {
        Self { store, partition }
    }

    fn schema(&self) -> Alias {
        Alias::new(self.partition.schema_name())
    }

    /// Create a new category. Names are unique within the partition.
    pub async fn create(&self, name: &str) -> Result<Category, RepositoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::validation_error(
                "Category name cannot be empty",
            ));
        }

        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };

        let stmt = Query::insert()
            .into_table((self.schema(), Categories::Table))
            .columns([Categories::Id, Categories::Name])
            .values_panic([category.id.into(), category.name.clone().into()])
            .to_owned();

        self.store
            .connection()
            .execute(self.store.backend().build(&stmt))
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(category)
    }

    /// Fetch a category by id.
    pub async fn get(&self, id: Uuid) -> Result<Category, RepositoryError> {
        let stmt = Query::select()
            .columns([Categories::Id, Categories::Name])
            .from((self.schema(), Categories::Table))
            .and_where(Expr::col(Categories::Id).eq(id))
            .to_owned();

        Category::find_by_statement(self.store.backend().build(&stmt))
            .one(self.store.connection())
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::NotFound("Category not found".to_string()))
    }

    /// List all categories, ordered by name.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let stmt = Query::select()
            .columns([Categories::Id, Categories::Name])
            .from((self.schema(), Categories::Table))
            .order_by(Categories::Name, Order::Asc)
            .to_owned();

        Category::find_by_statement(self.store.backend().build(&stmt))
            .all(self.store.connection())
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Rename a category.
    pub async fn rename(&self, id: Uuid, name: &str) -> Result<Category, RepositoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::validation_error(
                "Category name cannot be empty",
            ));
        }

        let stmt = Query::update()
            .table((self.schema(), Categories::Table))
            .value(Categories::Name, name)
            .and_where(Expr::col(Categories::Id).eq(id))
            .to_owned();

        let result = self
            .store
            .connection()
            .execute(self.store.backend().build(&stmt))
            .await
            .map_err(RepositoryError::database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Category not found".to_string()));
        }

        Ok(Category {
            id,
            name: name.to_string(),
        })
    }

    /// Delete a category that no product references.
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let txn = self.store.begin(self.partition).await?;
        let backend = self.store.backend();

        let count_stmt = Query::select()
            .expr_as(Expr::col(Products::Id).count(), Alias::new("product_count"))
            .from((self.schema(), Products::Table))
            .and_where(Expr::col(Products::CategoryId).eq(id))
            .to_owned();

        let product_count: i64 = txn
            .query_one(backend.build(&count_stmt))
            .await
            .map_err(RepositoryError::database_error)?
            .map(|row| row.try_get("", "product_count"))
            .transpose()
            .map_err(RepositoryError::database_error)?
            .unwrap_or(0);

        if product_count > 0 {
            return Err(RepositoryError::Conflict(
                "Category still has products".to_string(),
            ));
        }

        let delete_stmt = Query::delete()
            .from_table((self.schema(), Categories::Table))
            .and_where(Expr::col(Categories::Id).eq(id))
            .to_owned();

        let result = txn
            .execute(backend.build(&delete_stmt))
            .await
            .map_err(RepositoryError::database_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("Category not found".to_string()));
        }

        txn.commit().await.map_err(RepositoryError::database_error)?;
        Ok(())
    }
}

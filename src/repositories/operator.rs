//! # Operator Repository
//!
//! Tenant-local operator accounts and their flat credential check. The
//! external contract is exact-match success/failure; the comparison itself
//! runs in constant time.

use sea_orm::sea_query::{Alias, Expr, Order, Query};
use sea_orm::{ConnectionTrait, FromQueryResult};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::operator::{Operator, Operators};
use crate::partition::PartitionId;
use crate::store::PartitionStore;

/// Repository for operator accounts within one partition.
pub struct OperatorRepository<'a> {
    store: &'a PartitionStore,
    partition: &'a PartitionId,
}

impl<'a> OperatorRepository<'a> {
    /// Create a new repository scoped to the given partition.
    pub fn new(store: &'a PartitionStore, partition: &'a PartitionId) -> Self {
        Self { store, partition }
    }

    fn schema(&self) -> Alias {
        Alias::new(self.partition.schema_name())
    }

    /// Check operator credentials.
    ///
    /// Returns `Ok(None)` on unknown username or password mismatch; a
    /// mismatch is an expected outcome, not an error.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Operator>, RepositoryError> {
        let stmt = Query::select()
            .columns([
                Operators::Id,
                Operators::Username,
                Operators::Password,
                Operators::Role,
            ])
            .from((self.schema(), Operators::Table))
            .and_where(Expr::col(Operators::Username).eq(username))
            .to_owned();

        let operator = Operator::find_by_statement(self.store.backend().build(&stmt))
            .one(self.store.connection())
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(operator.filter(|op| {
            bool::from(op.password.as_bytes().ct_eq(password.as_bytes()))
        }))
    }

    /// Create a new operator account.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> Result<Operator, RepositoryError> {
        if username.trim().is_empty() {
            return Err(RepositoryError::validation_error(
                "Operator username cannot be empty",
            ));
        }
        if password.is_empty() {
            return Err(RepositoryError::validation_error(
                "Operator password cannot be empty",
            ));
        }

        let operator = Operator {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        };

        let stmt = Query::insert()
            .into_table((self.schema(), Operators::Table))
            .columns([
                Operators::Id,
                Operators::Username,
                Operators::Password,
                Operators::Role,
            ])
            .values_panic([
                operator.id.into(),
                operator.username.clone().into(),
                operator.password.clone().into(),
                operator.role.clone().into(),
            ])
            .to_owned();

        self.store
            .connection()
            .execute(self.store.backend().build(&stmt))
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(operator)
    }

    /// List all operator accounts, ordered by username.
    pub async fn list(&self) -> Result<Vec<Operator>, RepositoryError> {
        let stmt = Query::select()
            .columns([
                Operators::Id,
                Operators::Username,
                Operators::Password,
                Operators::Role,
            ])
            .from((self.schema(), Operators::Table))
            .order_by(Operators::Username, Order::Asc)
            .to_owned();

        Operator::find_by_statement(self.store.backend().build(&stmt))
            .all(self.store.connection())
            .await
            .map_err(RepositoryError::database_error)
    }
}

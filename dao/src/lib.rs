use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub mod appointment;
pub mod service_offering;
pub mod working_hours;

#[derive(Error, Debug)]
pub enum DaoError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Could not parse timestamp: {0}")]
    TimestampParseError(#[from] time::error::Parse),

    #[error("Unknown enum value in database: {0}")]
    EnumValueError(Arc<str>),

    #[error("Invalid day of week in database: {0}")]
    DayOfWeekValueError(i64),
}

/// Marker for a database transaction handed through DAO calls.  All reads
/// and writes of one service operation share the same transaction.
pub trait Transaction: Clone + Send + Sync + 'static {}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MockTransaction;
impl Transaction for MockTransaction {}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait TransactionDao {
    type Transaction: Transaction;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError>;
    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError>;
    async fn commit(&self, tx: Self::Transaction) -> Result<(), DaoError>;
}

#[automock]
#[async_trait]
pub trait PermissionDao {
    async fn has_privilege(&self, user: &str, privilege: &str) -> Result<bool, DaoError>;
    async fn grant_privilege(
        &self,
        user: &str,
        privilege: &str,
        process: &str,
    ) -> Result<(), DaoError>;
}

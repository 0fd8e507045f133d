use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppointmentStatusEntity {
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatusEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(value: &str) -> Result<Self, DaoError> {
        match value {
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(DaoError::EnumValueError(value.into())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppointmentEntity {
    pub id: Uuid,
    pub user: Arc<str>,
    pub service_id: Uuid,
    pub start_time: PrimitiveDateTime,
    pub end_time: PrimitiveDateTime,
    pub status: AppointmentStatusEntity,
    pub created: PrimitiveDateTime,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait AppointmentDao {
    type Transaction: crate::Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[AppointmentEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AppointmentEntity>, DaoError>;
    async fn find_by_user(
        &self,
        user: &str,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError>;

    /// Confirmed, non-deleted appointments whose start time lies in
    /// `[from, until]`.  Ordered ascending by start time.
    async fn find_confirmed_between(
        &self,
        from: PrimitiveDateTime,
        until: PrimitiveDateTime,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError>;

    async fn create(
        &self,
        entity: &AppointmentEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &AppointmentEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}

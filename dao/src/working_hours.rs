use std::sync::Arc;

use async_trait::async_trait;
use bookease_utils::DayOfWeek;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

/// One calendar row per day of week.  A missing row and `available = false`
/// both mean the business is closed that day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingHoursEntity {
    pub id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub available: bool,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait WorkingHoursDao {
    type Transaction: crate::Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[WorkingHoursEntity]>, DaoError>;
    async fn find_by_day_of_week(
        &self,
        day_of_week: DayOfWeek,
        tx: Self::Transaction,
    ) -> Result<Option<WorkingHoursEntity>, DaoError>;
    async fn upsert(
        &self,
        entity: &WorkingHoursEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}

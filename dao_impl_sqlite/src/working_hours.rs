use std::sync::Arc;

use async_trait::async_trait;
use bookease_utils::DayOfWeek;
use dao::{
    working_hours::{WorkingHoursDao, WorkingHoursEntity},
    DaoError,
};
use sqlx::{query, query_as};
use time::{format_description::BorrowedFormatItem, macros::format_description, Time};
use uuid::Uuid;

use crate::{ResultDbErrorExt, TransactionImpl};

const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

#[derive(Debug, sqlx::FromRow)]
struct WorkingHoursDb {
    id: Vec<u8>,
    day_of_week: i64,
    start_time: String,
    end_time: String,
    available: bool,
    update_version: Vec<u8>,
}

impl TryFrom<&WorkingHoursDb> for WorkingHoursEntity {
    type Error = DaoError;
    fn try_from(working_hours: &WorkingHoursDb) -> Result<Self, Self::Error> {
        let day_of_week = u8::try_from(working_hours.day_of_week)
            .ok()
            .and_then(DayOfWeek::from_number)
            .ok_or(DaoError::DayOfWeekValueError(working_hours.day_of_week))?;
        Ok(Self {
            id: Uuid::from_slice(&working_hours.id).map_db_error()?,
            day_of_week,
            start_time: Time::parse(&working_hours.start_time, TIME_FORMAT)?,
            end_time: Time::parse(&working_hours.end_time, TIME_FORMAT)?,
            available: working_hours.available,
            version: Uuid::from_slice(&working_hours.update_version).map_db_error()?,
        })
    }
}

pub struct WorkingHoursDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl WorkingHoursDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl WorkingHoursDao for WorkingHoursDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[WorkingHoursEntity]>, DaoError> {
        query_as::<_, WorkingHoursDb>(
            r"SELECT id, day_of_week, start_time, end_time, available, update_version FROM working_hours ORDER BY day_of_week",
        )
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(WorkingHoursEntity::try_from)
        .collect::<Result<Arc<[WorkingHoursEntity]>, DaoError>>()
    }

    async fn find_by_day_of_week(
        &self,
        day_of_week: DayOfWeek,
        tx: Self::Transaction,
    ) -> Result<Option<WorkingHoursEntity>, DaoError> {
        query_as::<_, WorkingHoursDb>(
            r"SELECT id, day_of_week, start_time, end_time, available, update_version FROM working_hours WHERE day_of_week = ?",
        )
        .bind(i64::from(day_of_week.to_number()))
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(WorkingHoursEntity::try_from)
        .transpose()
    }

    async fn upsert(
        &self,
        entity: &WorkingHoursEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let start_time = entity.start_time.format(TIME_FORMAT).map_db_error()?;
        let end_time = entity.end_time.format(TIME_FORMAT).map_db_error()?;
        query(
            r"INSERT INTO working_hours (id, day_of_week, start_time, end_time, available, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?)
              ON CONFLICT (day_of_week) DO UPDATE SET start_time = excluded.start_time, end_time = excluded.end_time, available = excluded.available, update_version = excluded.update_version, update_process = excluded.update_process",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(i64::from(entity.day_of_week.to_number()))
        .bind(start_time)
        .bind(end_time)
        .bind(entity.available)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    appointment::{AppointmentDao, AppointmentEntity, AppointmentStatusEntity},
    DaoError,
};
use sqlx::{query, query_as};
use time::{format_description::well_known::Iso8601, PrimitiveDateTime};
use uuid::Uuid;

use crate::{ResultDbErrorExt, TransactionImpl};

#[derive(Debug, sqlx::FromRow)]
struct AppointmentDb {
    id: Vec<u8>,
    user_name: String,
    service_id: Vec<u8>,
    start_time: String,
    end_time: String,
    status: String,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

impl TryFrom<&AppointmentDb> for AppointmentEntity {
    type Error = DaoError;
    fn try_from(appointment: &AppointmentDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&appointment.id).map_db_error()?,
            user: appointment.user_name.as_str().into(),
            service_id: Uuid::from_slice(&appointment.service_id).map_db_error()?,
            start_time: PrimitiveDateTime::parse(&appointment.start_time, &Iso8601::DATE_TIME)?,
            end_time: PrimitiveDateTime::parse(&appointment.end_time, &Iso8601::DATE_TIME)?,
            status: AppointmentStatusEntity::from_str(&appointment.status)?,
            created: PrimitiveDateTime::parse(&appointment.created, &Iso8601::DATE_TIME)?,
            deleted: appointment
                .deleted
                .as_ref()
                .map(|deleted| PrimitiveDateTime::parse(deleted, &Iso8601::DATE_TIME))
                .transpose()?,
            version: Uuid::from_slice(&appointment.update_version).map_db_error()?,
        })
    }
}

const SELECT_COLUMNS: &str = r"SELECT id, user_name, service_id, start_time, end_time, status, created, deleted, update_version FROM appointment";

pub struct AppointmentDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl AppointmentDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl AppointmentDao for AppointmentDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[AppointmentEntity]>, DaoError> {
        query_as::<_, AppointmentDb>(&format!(
            "{SELECT_COLUMNS} WHERE deleted IS NULL ORDER BY start_time DESC"
        ))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AppointmentEntity::try_from)
        .collect::<Result<Arc<[AppointmentEntity]>, DaoError>>()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AppointmentEntity>, DaoError> {
        query_as::<_, AppointmentDb>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.as_bytes().to_vec())
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(AppointmentEntity::try_from)
            .transpose()
    }

    async fn find_by_user(
        &self,
        user: &str,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError> {
        query_as::<_, AppointmentDb>(&format!(
            "{SELECT_COLUMNS} WHERE user_name = ? AND deleted IS NULL ORDER BY start_time DESC"
        ))
        .bind(user)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AppointmentEntity::try_from)
        .collect::<Result<Arc<[AppointmentEntity]>, DaoError>>()
    }

    async fn find_confirmed_between(
        &self,
        from: PrimitiveDateTime,
        until: PrimitiveDateTime,
        tx: Self::Transaction,
    ) -> Result<Arc<[AppointmentEntity]>, DaoError> {
        // Timestamps are stored as fixed-width ISO 8601 strings, so string
        // comparison matches chronological comparison.
        let from = from.format(&Iso8601::DATE_TIME).map_db_error()?;
        let until = until.format(&Iso8601::DATE_TIME).map_db_error()?;
        query_as::<_, AppointmentDb>(&format!(
            "{SELECT_COLUMNS} WHERE status = 'confirmed' AND deleted IS NULL AND start_time >= ? AND start_time <= ? ORDER BY start_time"
        ))
        .bind(from)
        .bind(until)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AppointmentEntity::try_from)
        .collect::<Result<Arc<[AppointmentEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &AppointmentEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let start_time = entity
            .start_time
            .format(&Iso8601::DATE_TIME)
            .map_db_error()?;
        let end_time = entity.end_time.format(&Iso8601::DATE_TIME).map_db_error()?;
        let created = entity.created.format(&Iso8601::DATE_TIME).map_db_error()?;
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()
            .map_db_error()?;
        query(
            r"INSERT INTO appointment (id, user_name, service_id, start_time, end_time, status, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.user.as_ref())
        .bind(entity.service_id.as_bytes().to_vec())
        .bind(start_time)
        .bind(end_time)
        .bind(entity.status.as_str())
        .bind(created)
        .bind(deleted)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &AppointmentEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let start_time = entity
            .start_time
            .format(&Iso8601::DATE_TIME)
            .map_db_error()?;
        let end_time = entity.end_time.format(&Iso8601::DATE_TIME).map_db_error()?;
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()
            .map_db_error()?;
        query(
            r"UPDATE appointment SET start_time = ?, end_time = ?, status = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?",
        )
        .bind(start_time)
        .bind(end_time)
        .bind(entity.status.as_str())
        .bind(deleted)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .bind(entity.id.as_bytes().to_vec())
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }
}

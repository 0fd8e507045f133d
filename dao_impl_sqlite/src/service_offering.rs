use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    service_offering::{ServiceOfferingDao, ServiceOfferingEntity},
    DaoError,
};
use sqlx::{query, query_as};
use time::{format_description::well_known::Iso8601, PrimitiveDateTime};
use uuid::Uuid;

use crate::{ResultDbErrorExt, TransactionImpl};

#[derive(Debug, sqlx::FromRow)]
struct ServiceOfferingDb {
    id: Vec<u8>,
    name: String,
    description: Option<String>,
    duration_minutes: i64,
    price: f64,
    address: Option<String>,
    image_url: Option<String>,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

impl TryFrom<&ServiceOfferingDb> for ServiceOfferingEntity {
    type Error = DaoError;
    fn try_from(offering: &ServiceOfferingDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&offering.id).map_db_error()?,
            name: offering.name.as_str().into(),
            description: offering.description.as_ref().map(|s| s.as_str().into()),
            duration_minutes: offering.duration_minutes as u32,
            price: offering.price,
            address: offering.address.as_ref().map(|s| s.as_str().into()),
            image_url: offering.image_url.as_ref().map(|s| s.as_str().into()),
            created: PrimitiveDateTime::parse(&offering.created, &Iso8601::DATE_TIME)?,
            deleted: offering
                .deleted
                .as_ref()
                .map(|deleted| PrimitiveDateTime::parse(deleted, &Iso8601::DATE_TIME))
                .transpose()?,
            version: Uuid::from_slice(&offering.update_version).map_db_error()?,
        })
    }
}

const SELECT_COLUMNS: &str = r"SELECT id, name, description, duration_minutes, price, address, image_url, created, deleted, update_version FROM service_offering";

pub struct ServiceOfferingDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl ServiceOfferingDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl ServiceOfferingDao for ServiceOfferingDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[ServiceOfferingEntity]>, DaoError> {
        query_as::<_, ServiceOfferingDb>(&format!(
            "{SELECT_COLUMNS} WHERE deleted IS NULL ORDER BY created DESC"
        ))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(ServiceOfferingEntity::try_from)
        .collect::<Result<Arc<[ServiceOfferingEntity]>, DaoError>>()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ServiceOfferingEntity>, DaoError> {
        query_as::<_, ServiceOfferingDb>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.as_bytes().to_vec())
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(ServiceOfferingEntity::try_from)
            .transpose()
    }

    async fn create(
        &self,
        entity: &ServiceOfferingEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let created = entity.created.format(&Iso8601::DATE_TIME).map_db_error()?;
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()
            .map_db_error()?;
        query(
            r"INSERT INTO service_offering (id, name, description, duration_minutes, price, address, image_url, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.as_bytes().to_vec())
        .bind(entity.name.as_ref())
        .bind(entity.description.as_ref().map(|s| s.as_ref()))
        .bind(i64::from(entity.duration_minutes))
        .bind(entity.price)
        .bind(entity.address.as_ref().map(|s| s.as_ref()))
        .bind(entity.image_url.as_ref().map(|s| s.as_ref()))
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
        entity: &ServiceOfferingEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let deleted = entity
            .deleted
            .as_ref()
            .map(|deleted| deleted.format(&Iso8601::DATE_TIME))
            .transpose()
            .map_db_error()?;
        query(
            r"UPDATE service_offering SET name = ?, description = ?, duration_minutes = ?, price = ?, address = ?, image_url = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?",
        )
        .bind(entity.name.as_ref())
        .bind(entity.description.as_ref().map(|s| s.as_ref()))
        .bind(i64::from(entity.duration_minutes))
        .bind(entity.price)
        .bind(entity.address.as_ref().map(|s| s.as_ref()))
        .bind(entity.image_url.as_ref().map(|s| s.as_ref()))
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

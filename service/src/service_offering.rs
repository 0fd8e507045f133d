use std::sync::Arc;

use async_trait::async_trait;
use bookease_utils::derive_from_reference;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::ServiceError;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOffering {
    pub id: Uuid,
    pub name: Arc<str>,
    pub description: Option<Arc<str>>,
    pub duration_minutes: u32,
    pub price: f64,
    pub address: Option<Arc<str>>,
    pub image_url: Option<Arc<str>>,
    pub created: Option<PrimitiveDateTime>,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&dao::service_offering::ServiceOfferingEntity> for ServiceOffering {
    fn from(entity: &dao::service_offering::ServiceOfferingEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            description: entity.description.clone(),
            duration_minutes: entity.duration_minutes,
            price: entity.price,
            address: entity.address.clone(),
            image_url: entity.image_url.clone(),
            created: Some(entity.created),
            deleted: entity.deleted,
            version: entity.version,
        }
    }
}
derive_from_reference!(
    dao::service_offering::ServiceOfferingEntity,
    ServiceOffering
);

impl TryFrom<&ServiceOffering> for dao::service_offering::ServiceOfferingEntity {
    type Error = ServiceError;
    fn try_from(offering: &ServiceOffering) -> Result<Self, Self::Error> {
        Ok(Self {
            id: offering.id,
            name: offering.name.clone(),
            description: offering.description.clone(),
            duration_minutes: offering.duration_minutes,
            price: offering.price,
            address: offering.address.clone(),
            image_url: offering.image_url.clone(),
            created: offering.created.ok_or(ServiceError::InternalError)?,
            deleted: offering.deleted,
            version: offering.version,
        })
    }
}

#[automock]
#[async_trait]
pub trait ServiceOfferingService {
    async fn get_all(&self) -> Result<Arc<[ServiceOffering]>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<ServiceOffering, ServiceError>;
    async fn create(&self, offering: &ServiceOffering)
        -> Result<ServiceOffering, ServiceError>;
    async fn update(&self, offering: &ServiceOffering)
        -> Result<ServiceOffering, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), ServiceError>;
}

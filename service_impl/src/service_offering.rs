use std::sync::Arc;

use async_trait::async_trait;
use service::{
    permission::ADMIN_PRIVILEGE,
    service_offering::{ServiceOffering, ServiceOfferingService},
    ServiceError, ValidationFailureItem,
};
use uuid::Uuid;

const SERVICE_OFFERING_SERVICE_PROCESS: &str = "service-offering-service";

fn validate_offering(offering: &ServiceOffering) -> Result<(), ServiceError> {
    let mut validation = Vec::with_capacity(4);
    if offering.name.trim().is_empty() {
        validation.push(ValidationFailureItem::MissingField("name".into()));
    }
    if offering.duration_minutes == 0 {
        validation.push(ValidationFailureItem::InvalidValue(
            "duration_minutes".into(),
        ));
    }
    if offering.price < 0.0 {
        validation.push(ValidationFailureItem::InvalidValue("price".into()));
    }
    if !validation.is_empty() {
        return Err(ServiceError::ValidationError(validation.into()));
    }
    Ok(())
}

pub struct ServiceOfferingServiceImpl<
    ServiceOfferingDao,
    PermissionService,
    ClockService,
    UuidService,
    TransactionDao,
> where
    ServiceOfferingDao: dao::service_offering::ServiceOfferingDao + Send + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
    TransactionDao:
        dao::TransactionDao<Transaction = ServiceOfferingDao::Transaction> + Send + Sync,
{
    pub service_offering_dao: Arc<ServiceOfferingDao>,
    pub permission_service: Arc<PermissionService>,
    pub clock_service: Arc<ClockService>,
    pub uuid_service: Arc<UuidService>,
    pub transaction_dao: Arc<TransactionDao>,
}

#[async_trait]
impl<ServiceOfferingDao, PermissionService, ClockService, UuidService, TransactionDao>
    ServiceOfferingService
    for ServiceOfferingServiceImpl<
        ServiceOfferingDao,
        PermissionService,
        ClockService,
        UuidService,
        TransactionDao,
    >
where
    ServiceOfferingDao: dao::service_offering::ServiceOfferingDao + Send + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
    TransactionDao:
        dao::TransactionDao<Transaction = ServiceOfferingDao::Transaction> + Send + Sync,
{
    async fn get_all(&self) -> Result<Arc<[ServiceOffering]>, ServiceError> {
        // The catalog is public, no permission check.
        let tx = self.transaction_dao.use_transaction(None).await?;
        let offerings = self
            .service_offering_dao
            .all(tx.clone())
            .await?
            .iter()
            .map(ServiceOffering::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(offerings)
    }

    async fn get(&self, id: Uuid) -> Result<ServiceOffering, ServiceError> {
        let tx = self.transaction_dao.use_transaction(None).await?;
        let offering = self
            .service_offering_dao
            .find_by_id(id, tx.clone())
            .await?
            .as_ref()
            .map(ServiceOffering::from)
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(offering)
    }

    async fn create(
        &self,
        offering: &ServiceOffering,
    ) -> Result<ServiceOffering, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE)
            .await?;

        if offering.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if offering.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        validate_offering(offering)?;

        let new_offering = ServiceOffering {
            id: self.uuid_service.new_uuid("service-offering-id"),
            version: self.uuid_service.new_uuid("service-offering-version"),
            created: Some(self.clock_service.date_time_now()),
            ..offering.clone()
        };

        let tx = self.transaction_dao.use_transaction(None).await?;
        self.service_offering_dao
            .create(
                &(&new_offering).try_into()?,
                SERVICE_OFFERING_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;

        Ok(new_offering)
    }

    async fn update(
        &self,
        offering: &ServiceOffering,
    ) -> Result<ServiceOffering, ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE)
            .await?;
        validate_offering(offering)?;

        let tx = self.transaction_dao.use_transaction(None).await?;
        let existing = self
            .service_offering_dao
            .find_by_id(offering.id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(offering.id))?;

        let updated = ServiceOffering {
            created: Some(existing.created),
            version: self.uuid_service.new_uuid("service-offering-version"),
            ..offering.clone()
        };
        self.service_offering_dao
            .update(
                &(&updated).try_into()?,
                SERVICE_OFFERING_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE)
            .await?;

        let tx = self.transaction_dao.use_transaction(None).await?;
        let mut entity = self
            .service_offering_dao
            .find_by_id(id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(id))?;

        entity.deleted = Some(self.clock_service.date_time_now());
        entity.version = self.uuid_service.new_uuid("service-offering-version");
        self.service_offering_dao
            .update(&entity, SERVICE_OFFERING_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use service::{
    appointment::{Appointment, AppointmentService, AppointmentStatus, BookingRequest},
    permission::ADMIN_PRIVILEGE,
    ServiceError,
};
use time::PrimitiveDateTime;
use uuid::Uuid;

const APPOINTMENT_SERVICE_PROCESS: &str = "appointment-service";

pub struct AppointmentServiceImpl<
    AppointmentDao,
    ServiceOfferingDao,
    AvailabilityService,
    PermissionService,
    ClockService,
    UuidService,
    TransactionDao,
> where
    AppointmentDao: dao::appointment::AppointmentDao + Send + Sync,
    ServiceOfferingDao: dao::service_offering::ServiceOfferingDao<Transaction = AppointmentDao::Transaction>
        + Send
        + Sync,
    AvailabilityService: service::availability::AvailabilityService<Transaction = AppointmentDao::Transaction>
        + Send
        + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = AppointmentDao::Transaction> + Send + Sync,
{
    pub appointment_dao: Arc<AppointmentDao>,
    pub service_offering_dao: Arc<ServiceOfferingDao>,
    pub availability_service: Arc<AvailabilityService>,
    pub permission_service: Arc<PermissionService>,
    pub clock_service: Arc<ClockService>,
    pub uuid_service: Arc<UuidService>,
    pub transaction_dao: Arc<TransactionDao>,
}

impl<
        AppointmentDao,
        ServiceOfferingDao,
        AvailabilityService,
        PermissionService,
        ClockService,
        UuidService,
        TransactionDao,
    >
    AppointmentServiceImpl<
        AppointmentDao,
        ServiceOfferingDao,
        AvailabilityService,
        PermissionService,
        ClockService,
        UuidService,
        TransactionDao,
    >
where
    AppointmentDao: dao::appointment::AppointmentDao + Send + Sync,
    ServiceOfferingDao: dao::service_offering::ServiceOfferingDao<Transaction = AppointmentDao::Transaction>
        + Send
        + Sync,
    AvailabilityService: service::availability::AvailabilityService<Transaction = AppointmentDao::Transaction>
        + Send
        + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = AppointmentDao::Transaction> + Send + Sync,
{
    /// Admins may act on any appointment, everyone else only on their own.
    async fn check_access(
        &self,
        appointment: &dao::appointment::AppointmentEntity,
    ) -> Result<(), ServiceError> {
        if self
            .permission_service
            .has_permission(ADMIN_PRIVILEGE)
            .await?
        {
            return Ok(());
        }
        let current_user = self.permission_service.current_user().await?;
        if appointment.user.as_ref() == current_user.as_ref() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }

    async fn find_appointment(
        &self,
        id: Uuid,
        tx: AppointmentDao::Transaction,
    ) -> Result<dao::appointment::AppointmentEntity, ServiceError> {
        self.appointment_dao
            .find_by_id(id, tx)
            .await?
            .ok_or(ServiceError::EntityNotFound(id))
    }
}

#[async_trait]
impl<
        AppointmentDao,
        ServiceOfferingDao,
        AvailabilityService,
        PermissionService,
        ClockService,
        UuidService,
        TransactionDao,
    > AppointmentService
    for AppointmentServiceImpl<
        AppointmentDao,
        ServiceOfferingDao,
        AvailabilityService,
        PermissionService,
        ClockService,
        UuidService,
        TransactionDao,
    >
where
    AppointmentDao: dao::appointment::AppointmentDao + Send + Sync,
    ServiceOfferingDao: dao::service_offering::ServiceOfferingDao<Transaction = AppointmentDao::Transaction>
        + Send
        + Sync,
    AvailabilityService: service::availability::AvailabilityService<Transaction = AppointmentDao::Transaction>
        + Send
        + Sync,
    PermissionService: service::permission::PermissionService + Send + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    UuidService: service::uuid_service::UuidService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = AppointmentDao::Transaction> + Send + Sync,
{
    async fn get_all(&self) -> Result<Arc<[Appointment]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(None).await?;
        let entities = if self
            .permission_service
            .has_permission(ADMIN_PRIVILEGE)
            .await?
        {
            self.appointment_dao.all(tx.clone()).await?
        } else {
            let current_user = self.permission_service.current_user().await?;
            self.appointment_dao
                .find_by_user(current_user.as_ref(), tx.clone())
                .await?
        };
        let appointments = entities.iter().map(Appointment::from).collect();
        self.transaction_dao.commit(tx).await?;
        Ok(appointments)
    }

    async fn get(&self, id: Uuid) -> Result<Appointment, ServiceError> {
        let tx = self.transaction_dao.use_transaction(None).await?;
        let entity = self.find_appointment(id, tx.clone()).await?;
        self.check_access(&entity).await?;
        self.transaction_dao.commit(tx).await?;
        Ok(Appointment::from(&entity))
    }

    async fn book(&self, request: &BookingRequest) -> Result<Appointment, ServiceError> {
        let user = self.permission_service.current_user().await?;

        // Validation and insert share one transaction so a concurrent
        // booking for the same slot cannot slip in between.
        let tx = self.transaction_dao.use_transaction(None).await?;
        let offering = self
            .service_offering_dao
            .find_by_id(request.service_id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(request.service_id))?;

        let interval = self
            .availability_service
            .validate_booking(
                request.start_time,
                offering.duration_minutes,
                None,
                Some(tx.clone()),
            )
            .await?;

        let appointment = Appointment {
            id: self.uuid_service.new_uuid("appointment-id"),
            user,
            service_id: offering.id,
            start_time: interval.start,
            end_time: interval.end,
            status: AppointmentStatus::Confirmed,
            created: Some(self.clock_service.date_time_now()),
            deleted: None,
            version: self.uuid_service.new_uuid("appointment-version"),
        };
        self.appointment_dao
            .create(
                &(&appointment).try_into()?,
                APPOINTMENT_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;

        tracing::info!(
            "Booked appointment {} for service {} at {}",
            appointment.id,
            appointment.service_id,
            appointment.start_time
        );
        Ok(appointment)
    }

    async fn reschedule(
        &self,
        id: Uuid,
        new_start_time: PrimitiveDateTime,
    ) -> Result<Appointment, ServiceError> {
        let tx = self.transaction_dao.use_transaction(None).await?;
        let mut entity = self.find_appointment(id, tx.clone()).await?;
        self.check_access(&entity).await?;

        let offering = self
            .service_offering_dao
            .find_by_id(entity.service_id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(entity.service_id))?;

        // The appointment's own slot must not block its new time, so it is
        // excluded from the conflict set by id.
        let interval = self
            .availability_service
            .validate_booking(
                new_start_time,
                offering.duration_minutes,
                Some(id),
                Some(tx.clone()),
            )
            .await?;

        entity.start_time = interval.start;
        entity.end_time = interval.end;
        entity.version = self.uuid_service.new_uuid("appointment-version");
        self.appointment_dao
            .update(&entity, APPOINTMENT_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;

        Ok(Appointment::from(&entity))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, ServiceError> {
        let tx = self.transaction_dao.use_transaction(None).await?;
        let mut entity = self.find_appointment(id, tx.clone()).await?;
        self.check_access(&entity).await?;

        entity.status = status.into();
        entity.version = self.uuid_service.new_uuid("appointment-version");
        self.appointment_dao
            .update(&entity, APPOINTMENT_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;

        Ok(Appointment::from(&entity))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(None).await?;
        let mut entity = self.find_appointment(id, tx.clone()).await?;
        self.check_access(&entity).await?;

        entity.deleted = Some(self.clock_service.date_time_now());
        entity.version = self.uuid_service.new_uuid("appointment-version");
        self.appointment_dao
            .update(&entity, APPOINTMENT_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}

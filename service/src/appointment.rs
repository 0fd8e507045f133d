use std::sync::Arc;

use async_trait::async_trait;
use bookease_utils::derive_from_reference;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Only confirmed appointments constrain the availability calendar.
    /// Cancelled and completed ones free their slot permanently.
    pub fn blocks_availability(&self) -> bool {
        matches!(self, AppointmentStatus::Confirmed)
    }
}

impl From<dao::appointment::AppointmentStatusEntity> for AppointmentStatus {
    fn from(status: dao::appointment::AppointmentStatusEntity) -> Self {
        match status {
            dao::appointment::AppointmentStatusEntity::Confirmed => Self::Confirmed,
            dao::appointment::AppointmentStatusEntity::Cancelled => Self::Cancelled,
            dao::appointment::AppointmentStatusEntity::Completed => Self::Completed,
        }
    }
}
impl From<AppointmentStatus> for dao::appointment::AppointmentStatusEntity {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Confirmed => Self::Confirmed,
            AppointmentStatus::Cancelled => Self::Cancelled,
            AppointmentStatus::Completed => Self::Completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: Uuid,
    pub user: Arc<str>,
    pub service_id: Uuid,
    pub start_time: PrimitiveDateTime,
    pub end_time: PrimitiveDateTime,
    pub status: AppointmentStatus,
    pub created: Option<PrimitiveDateTime>,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

impl From<&dao::appointment::AppointmentEntity> for Appointment {
    fn from(entity: &dao::appointment::AppointmentEntity) -> Self {
        Self {
            id: entity.id,
            user: entity.user.clone(),
            service_id: entity.service_id,
            start_time: entity.start_time,
            end_time: entity.end_time,
            status: entity.status.into(),
            created: Some(entity.created),
            deleted: entity.deleted,
            version: entity.version,
        }
    }
}
derive_from_reference!(dao::appointment::AppointmentEntity, Appointment);

impl TryFrom<&Appointment> for dao::appointment::AppointmentEntity {
    type Error = ServiceError;
    fn try_from(appointment: &Appointment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: appointment.id,
            user: appointment.user.clone(),
            service_id: appointment.service_id,
            start_time: appointment.start_time,
            end_time: appointment.end_time,
            status: appointment.status.into(),
            created: appointment.created.ok_or(ServiceError::InternalError)?,
            deleted: appointment.deleted,
            version: appointment.version,
        })
    }
}

/// What a client supplies to book a slot.  The end time is derived from the
/// service offering's duration, never taken from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub service_id: Uuid,
    pub start_time: PrimitiveDateTime,
}

#[automock]
#[async_trait]
pub trait AppointmentService {
    /// All appointments for admins, the current user's own otherwise.
    async fn get_all(&self) -> Result<Arc<[Appointment]>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Appointment, ServiceError>;
    async fn book(&self, request: &BookingRequest) -> Result<Appointment, ServiceError>;
    async fn reschedule(
        &self,
        id: Uuid,
        new_start_time: PrimitiveDateTime,
    ) -> Result<Appointment, ServiceError>;
    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<(), ServiceError>;
}

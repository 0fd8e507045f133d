use std::sync::Arc;

use async_trait::async_trait;
use bookease_utils::{derive_from_reference, DayOfWeek};
use mockall::automock;
use uuid::Uuid;

use crate::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingHours {
    pub id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: time::Time,
    pub end_time: time::Time,
    pub available: bool,
    pub version: Uuid,
}

impl From<&dao::working_hours::WorkingHoursEntity> for WorkingHours {
    fn from(entity: &dao::working_hours::WorkingHoursEntity) -> Self {
        Self {
            id: entity.id,
            day_of_week: entity.day_of_week,
            start_time: entity.start_time,
            end_time: entity.end_time,
            available: entity.available,
            version: entity.version,
        }
    }
}
derive_from_reference!(dao::working_hours::WorkingHoursEntity, WorkingHours);

impl From<&WorkingHours> for dao::working_hours::WorkingHoursEntity {
    fn from(working_hours: &WorkingHours) -> Self {
        Self {
            id: working_hours.id,
            day_of_week: working_hours.day_of_week,
            start_time: working_hours.start_time,
            end_time: working_hours.end_time,
            available: working_hours.available,
            version: working_hours.version,
        }
    }
}

#[automock]
#[async_trait]
pub trait WorkingHoursService {
    async fn get_all(&self) -> Result<Arc<[WorkingHours]>, ServiceError>;

    /// Create or replace the window for the entity's day of week.
    async fn upsert(&self, working_hours: &WorkingHours)
        -> Result<WorkingHours, ServiceError>;
}

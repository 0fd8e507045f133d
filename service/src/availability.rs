use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::{Date, PrimitiveDateTime};
use uuid::Uuid;

use crate::ServiceError;

/// Spacing between consecutive slot starts when the caller does not supply
/// a buffer.
pub const DEFAULT_BUFFER_MINUTES: u32 = 15;

/// Half-open interval `[start, end)`.  Touching endpoints do not overlap,
/// which allows back-to-back bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
}

impl TimeInterval {
    pub fn new(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }
}

#[automock(type Transaction = dao::MockTransaction;)]
#[async_trait]
pub trait AvailabilityService {
    type Transaction: dao::Transaction;

    /// Bookable start times for the given date and service, ascending.
    /// A closed day yields an empty list, not an error.
    async fn available_slots(
        &self,
        date: Date,
        service_id: Uuid,
        buffer_minutes: Option<u32>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[PrimitiveDateTime]>, ServiceError>;

    /// Checks that `[start_time, start_time + duration)` is still free and
    /// not in the past.  `excluding` removes one appointment (by id) from
    /// the conflict set, used when that appointment is being rescheduled.
    async fn validate_booking(
        &self,
        start_time: PrimitiveDateTime,
        duration_minutes: u32,
        excluding: Option<Uuid>,
        tx: Option<Self::Transaction>,
    ) -> Result<TimeInterval, ServiceError>;
}

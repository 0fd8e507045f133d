use std::sync::Arc;

use async_trait::async_trait;
use bookease_utils::DayOfWeek;
use service::{
    availability::{AvailabilityService, TimeInterval, DEFAULT_BUFFER_MINUTES},
    ServiceError,
};
use time::{Date, Duration, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Candidate start times between `window_start` and `window_end`.  The
/// cadence is `duration + buffer` minutes and a candidate is only emitted
/// while its full cadence still fits into the window.
pub fn generate_slots(
    window_start: PrimitiveDateTime,
    window_end: PrimitiveDateTime,
    duration_minutes: u32,
    buffer_minutes: u32,
) -> Vec<PrimitiveDateTime> {
    let step = Duration::minutes(i64::from(duration_minutes) + i64::from(buffer_minutes));
    let mut slots = Vec::new();
    let mut current = window_start;
    while current + step <= window_end {
        slots.push(current);
        current += step;
    }
    slots
}

/// True when any booked interval overlaps the candidate.  Half-open
/// semantics, so a booking ending exactly at the candidate start does not
/// conflict.
pub fn has_conflict(candidate: &TimeInterval, booked: &[TimeInterval]) -> bool {
    booked.iter().any(|interval| interval.overlaps(candidate))
}

/// Full-day bounds used to fetch the day's appointments.  Deliberately wider
/// than the working window so a stale booking outside working hours still
/// blocks its slot.
fn day_bounds(date: Date) -> (PrimitiveDateTime, PrimitiveDateTime) {
    (
        PrimitiveDateTime::new(date, Time::MIDNIGHT),
        PrimitiveDateTime::new(date, Time::MAX),
    )
}

pub struct AvailabilityServiceImpl<
    ServiceOfferingDao,
    WorkingHoursDao,
    AppointmentDao,
    ClockService,
    TransactionDao,
> where
    AppointmentDao: dao::appointment::AppointmentDao + Send + Sync,
    ServiceOfferingDao: dao::service_offering::ServiceOfferingDao<Transaction = AppointmentDao::Transaction>
        + Send
        + Sync,
    WorkingHoursDao:
        dao::working_hours::WorkingHoursDao<Transaction = AppointmentDao::Transaction>
            + Send
            + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = AppointmentDao::Transaction> + Send + Sync,
{
    pub service_offering_dao: Arc<ServiceOfferingDao>,
    pub working_hours_dao: Arc<WorkingHoursDao>,
    pub appointment_dao: Arc<AppointmentDao>,
    pub clock_service: Arc<ClockService>,
    pub transaction_dao: Arc<TransactionDao>,
}

#[async_trait]
impl<ServiceOfferingDao, WorkingHoursDao, AppointmentDao, ClockService, TransactionDao>
    AvailabilityService
    for AvailabilityServiceImpl<
        ServiceOfferingDao,
        WorkingHoursDao,
        AppointmentDao,
        ClockService,
        TransactionDao,
    >
where
    AppointmentDao: dao::appointment::AppointmentDao + Send + Sync,
    ServiceOfferingDao: dao::service_offering::ServiceOfferingDao<Transaction = AppointmentDao::Transaction>
        + Send
        + Sync,
    WorkingHoursDao:
        dao::working_hours::WorkingHoursDao<Transaction = AppointmentDao::Transaction>
            + Send
            + Sync,
    ClockService: service::clock::ClockService + Send + Sync,
    TransactionDao: dao::TransactionDao<Transaction = AppointmentDao::Transaction> + Send + Sync,
{
    type Transaction = AppointmentDao::Transaction;

    async fn available_slots(
        &self,
        date: Date,
        service_id: Uuid,
        buffer_minutes: Option<u32>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[PrimitiveDateTime]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let offering = self
            .service_offering_dao
            .find_by_id(service_id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(service_id))?;
        let buffer_minutes = buffer_minutes.unwrap_or(DEFAULT_BUFFER_MINUTES);

        let day_of_week = DayOfWeek::from(date.weekday());
        let window = self
            .working_hours_dao
            .find_by_day_of_week(day_of_week, tx.clone())
            .await?;

        // A missing row and an unavailable one both mean "closed that day".
        let slots: Vec<PrimitiveDateTime> = match window {
            Some(window) if window.available => {
                let window_start = PrimitiveDateTime::new(date, window.start_time);
                let window_end = PrimitiveDateTime::new(date, window.end_time);
                let (day_start, day_end) = day_bounds(date);
                let booked: Vec<TimeInterval> = self
                    .appointment_dao
                    .find_confirmed_between(day_start, day_end, tx.clone())
                    .await?
                    .iter()
                    .map(|appointment| {
                        TimeInterval::new(appointment.start_time, appointment.end_time)
                    })
                    .collect();
                let now = self.clock_service.date_time_now();
                let duration = Duration::minutes(i64::from(offering.duration_minutes));
                generate_slots(
                    window_start,
                    window_end,
                    offering.duration_minutes,
                    buffer_minutes,
                )
                .into_iter()
                .filter(|slot| *slot >= now)
                .filter(|slot| !has_conflict(&TimeInterval::new(*slot, *slot + duration), &booked))
                .collect()
            }
            _ => Vec::new(),
        };

        self.transaction_dao.commit(tx).await?;
        Ok(slots.into())
    }

    async fn validate_booking(
        &self,
        start_time: PrimitiveDateTime,
        duration_minutes: u32,
        excluding: Option<Uuid>,
        tx: Option<Self::Transaction>,
    ) -> Result<TimeInterval, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let end_time = start_time + Duration::minutes(i64::from(duration_minutes));
        let candidate = TimeInterval::new(start_time, end_time);

        let (day_start, day_end) = day_bounds(start_time.date());
        let booked: Vec<TimeInterval> = self
            .appointment_dao
            .find_confirmed_between(day_start, day_end, tx.clone())
            .await?
            .iter()
            .filter(|appointment| excluding != Some(appointment.id))
            .map(|appointment| TimeInterval::new(appointment.start_time, appointment.end_time))
            .collect();

        let ret = if has_conflict(&candidate, &booked) {
            Err(ServiceError::SlotNotAvailable(start_time))
        } else if start_time < self.clock_service.date_time_now() {
            Err(ServiceError::BookingInPast(start_time))
        } else {
            Ok(candidate)
        };

        self.transaction_dao.commit(tx).await?;
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_slots_stay_inside_window() {
        let window_start = datetime!(2025-06-02 09:00);
        let window_end = datetime!(2025-06-02 18:00);
        let duration = 30;
        let buffer = 15;
        let slots = generate_slots(window_start, window_end, duration, buffer);
        assert!(!slots.is_empty());
        for slot in &slots {
            assert!(*slot >= window_start);
            assert!(
                *slot + Duration::minutes(i64::from(duration + buffer)) <= window_end,
                "slot {} does not fit the window",
                slot
            );
        }
    }

    #[test]
    fn test_cadence_monday_nine_to_six() {
        // 30 minute service with a 15 minute buffer: slots every 45 minutes.
        let slots = generate_slots(
            datetime!(2025-06-02 09:00),
            datetime!(2025-06-02 18:00),
            30,
            15,
        );
        assert_eq!(slots.first(), Some(&datetime!(2025-06-02 09:00)));
        assert_eq!(slots.get(1), Some(&datetime!(2025-06-02 09:45)));
        // 17:15 is the last start whose duration and buffer still fit.
        assert_eq!(slots.last(), Some(&datetime!(2025-06-02 17:15)));
        assert_eq!(slots.len(), 12);
    }

    #[test]
    fn test_step_larger_than_window_yields_no_slots() {
        let slots = generate_slots(
            datetime!(2025-06-02 09:00),
            datetime!(2025-06-02 09:30),
            30,
            15,
        );
        assert!(slots.is_empty());
    }

    #[test]
    fn test_exact_fit_emits_single_slot() {
        let slots = generate_slots(
            datetime!(2025-06-02 09:00),
            datetime!(2025-06-02 09:45),
            30,
            15,
        );
        assert_eq!(slots, vec![datetime!(2025-06-02 09:00)]);
    }

    #[test]
    fn test_zero_buffer_packs_back_to_back() {
        let slots = generate_slots(
            datetime!(2025-06-02 09:00),
            datetime!(2025-06-02 10:00),
            30,
            0,
        );
        assert_eq!(
            slots,
            vec![datetime!(2025-06-02 09:00), datetime!(2025-06-02 09:30)]
        );
    }

    #[test]
    fn test_generation_is_restartable() {
        let args = (
            datetime!(2025-06-02 09:00),
            datetime!(2025-06-02 18:00),
            30,
            15,
        );
        let first = generate_slots(args.0, args.1, args.2, args.3);
        let second = generate_slots(args.0, args.1, args.2, args.3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_conflict_against_booked_set() {
        let booked = vec![
            TimeInterval::new(datetime!(2025-06-02 10:00), datetime!(2025-06-02 10:30)),
            TimeInterval::new(datetime!(2025-06-02 14:00), datetime!(2025-06-02 15:00)),
        ];
        let overlapping =
            TimeInterval::new(datetime!(2025-06-02 10:15), datetime!(2025-06-02 10:45));
        let touching = TimeInterval::new(datetime!(2025-06-02 10:30), datetime!(2025-06-02 11:00));
        let free = TimeInterval::new(datetime!(2025-06-02 11:00), datetime!(2025-06-02 11:30));
        assert!(has_conflict(&overlapping, &booked));
        assert!(!has_conflict(&touching, &booked));
        assert!(!has_conflict(&free, &booked));
        assert!(!has_conflict(&free, &[]));
    }

    #[test]
    fn test_conflict_ignores_booked_order() {
        let ordered = vec![
            TimeInterval::new(datetime!(2025-06-02 10:00), datetime!(2025-06-02 10:30)),
            TimeInterval::new(datetime!(2025-06-02 14:00), datetime!(2025-06-02 15:00)),
        ];
        let reversed: Vec<TimeInterval> = ordered.iter().rev().copied().collect();
        let candidate =
            TimeInterval::new(datetime!(2025-06-02 14:30), datetime!(2025-06-02 15:30));
        assert_eq!(
            has_conflict(&candidate, &ordered),
            has_conflict(&candidate, &reversed)
        );
    }

    #[test]
    fn test_day_bounds_span_whole_day() {
        let (start, end) = day_bounds(time::macros::date!(2025 - 06 - 02));
        assert_eq!(start, datetime!(2025-06-02 00:00));
        assert!(end > datetime!(2025-06-02 23:59));
    }
}

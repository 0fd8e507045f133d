use bookease_utils::DayOfWeek;
use rest::RestStateDef;
use service::appointment::{AppointmentService, AppointmentStatus, BookingRequest};
use service::availability::AvailabilityService;
use service::service_offering::{ServiceOffering, ServiceOfferingService};
use service::working_hours::{WorkingHours, WorkingHoursService};
use service::ServiceError;
use time::macros::{date, datetime, time};
use uuid::Uuid;

use crate::integration_test::TestSetup;
use crate::RestStateImpl;

async fn seed_offering_and_hours(rest_state: &RestStateImpl) -> ServiceOffering {
    let offering = rest_state
        .service_offering_service()
        .create(&ServiceOffering {
            id: Uuid::nil(),
            name: "Haircut".into(),
            description: Some("Wash, cut and style".into()),
            duration_minutes: 30,
            price: 35.0,
            address: None,
            image_url: None,
            created: None,
            deleted: None,
            version: Uuid::nil(),
        })
        .await
        .expect("Could not create service offering");
    rest_state
        .working_hours_service()
        .upsert(&WorkingHours {
            id: Uuid::nil(),
            day_of_week: DayOfWeek::Monday,
            start_time: time!(09:00),
            end_time: time!(18:00),
            available: true,
            version: Uuid::nil(),
        })
        .await
        .expect("Could not create working hours");
    offering
}

#[tokio::test]
async fn test_booking_flow_end_to_end() {
    let test_setup = TestSetup::new().await;
    let rest_state = &test_setup.rest_state;
    let offering = seed_offering_and_hours(rest_state).await;

    // 2030-01-07 is a Monday.
    let day = date!(2030 - 01 - 07);
    let slots = rest_state
        .availability_service()
        .available_slots(day, offering.id, None, None)
        .await
        .unwrap();
    assert_eq!(slots.len(), 12);
    assert_eq!(slots.first(), Some(&datetime!(2030-01-07 09:00)));
    assert_eq!(slots.last(), Some(&datetime!(2030-01-07 17:15)));

    let appointment = rest_state
        .appointment_service()
        .book(&BookingRequest {
            service_id: offering.id,
            start_time: datetime!(2030-01-07 10:00),
        })
        .await
        .unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    assert_eq!(appointment.end_time, datetime!(2030-01-07 10:30));
    assert_eq!(appointment.user.as_ref(), "DEVUSER");

    let slots = rest_state
        .availability_service()
        .available_slots(day, offering.id, None, None)
        .await
        .unwrap();
    assert!(!slots.contains(&datetime!(2030-01-07 10:00)));
    // 09:45 would still be running at 10:00, so it is gone too.
    assert!(!slots.contains(&datetime!(2030-01-07 09:45)));
    // 10:30 starts exactly when the booking ends and stays bookable.
    assert!(slots.contains(&datetime!(2030-01-07 10:30)));

    let result = rest_state
        .appointment_service()
        .book(&BookingRequest {
            service_id: offering.id,
            start_time: datetime!(2030-01-07 10:00),
        })
        .await;
    assert!(matches!(result, Err(ServiceError::SlotNotAvailable(_))));
}

#[tokio::test]
async fn test_closed_day_has_no_slots() {
    let test_setup = TestSetup::new().await;
    let rest_state = &test_setup.rest_state;
    let offering = seed_offering_and_hours(rest_state).await;

    // No working hours stored for Sunday 2030-01-06.
    let slots = rest_state
        .availability_service()
        .available_slots(date!(2030 - 01 - 06), offering.id, None, None)
        .await
        .unwrap();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn test_reschedule_and_cancel() {
    let test_setup = TestSetup::new().await;
    let rest_state = &test_setup.rest_state;
    let offering = seed_offering_and_hours(rest_state).await;

    let appointment = rest_state
        .appointment_service()
        .book(&BookingRequest {
            service_id: offering.id,
            start_time: datetime!(2030-01-07 10:30),
        })
        .await
        .unwrap();

    let moved = rest_state
        .appointment_service()
        .reschedule(appointment.id, datetime!(2030-01-07 11:15))
        .await
        .unwrap();
    assert_eq!(moved.start_time, datetime!(2030-01-07 11:15));
    assert_eq!(moved.end_time, datetime!(2030-01-07 11:45));

    // The appointment does not conflict with itself.
    let same = rest_state
        .appointment_service()
        .reschedule(moved.id, datetime!(2030-01-07 11:15))
        .await
        .unwrap();
    assert_eq!(same.start_time, datetime!(2030-01-07 11:15));

    // Cancelling frees the slot for someone else.
    let cancelled = rest_state
        .appointment_service()
        .update_status(moved.id, AppointmentStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    let slots = rest_state
        .availability_service()
        .available_slots(date!(2030 - 01 - 07), offering.id, None, None)
        .await
        .unwrap();
    assert!(slots.contains(&datetime!(2030-01-07 11:15)));

    rest_state
        .appointment_service()
        .book(&BookingRequest {
            service_id: offering.id,
            start_time: datetime!(2030-01-07 11:15),
        })
        .await
        .expect("Cancelled slot must be bookable again");
}

#[tokio::test]
async fn test_booking_in_the_past_is_rejected() {
    let test_setup = TestSetup::new().await;
    let rest_state = &test_setup.rest_state;
    let offering = seed_offering_and_hours(rest_state).await;

    let result = rest_state
        .appointment_service()
        .book(&BookingRequest {
            service_id: offering.id,
            // 2018-01-01 was a Monday.
            start_time: datetime!(2018-01-01 10:00),
        })
        .await;
    assert!(matches!(result, Err(ServiceError::BookingInPast(_))));
}

#[tokio::test]
async fn test_unknown_service_has_no_availability() {
    let test_setup = TestSetup::new().await;
    let rest_state = &test_setup.rest_state;
    seed_offering_and_hours(rest_state).await;

    let unknown = Uuid::new_v4();
    let result = rest_state
        .availability_service()
        .available_slots(date!(2030 - 01 - 07), unknown, None, None)
        .await;
    assert!(matches!(result, Err(ServiceError::EntityNotFound(id)) if id == unknown));
}

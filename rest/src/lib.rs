use std::sync::Arc;

mod appointment;
mod availability;
mod health;
mod service_offering;
mod working_hours;

use axum::{body::Body, response::Response, Router};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Service error")]
    ServiceError(#[from] service::ServiceError),

    #[error("Inconsistent id. Got {0} in path but {1} in body")]
    InconsistentId(Uuid, Uuid),

    #[error("Could not parse date or time: {0}")]
    DateTimeParseError(#[from] time::error::Parse),

    #[error("Invalid day of week: {0}")]
    InvalidDayOfWeek(u8),

    #[error("Could not format timestamp: {0}")]
    FormatError(#[from] time::error::Format),
}

fn error_handler(result: Result<Response, RestError>) -> Response {
    match result {
        Ok(response) => response,
        Err(err @ RestError::InconsistentId(_, _)) => Response::builder()
            .status(400)
            .body(Body::new(err.to_string()))
            .unwrap(),
        Err(err @ RestError::DateTimeParseError(_)) => Response::builder()
            .status(400)
            .body(Body::new(err.to_string()))
            .unwrap(),
        Err(err @ RestError::InvalidDayOfWeek(_)) => Response::builder()
            .status(422)
            .body(Body::new(err.to_string()))
            .unwrap(),
        Err(RestError::FormatError(_)) => {
            Response::builder().status(500).body(Body::empty()).unwrap()
        }
        Err(RestError::ServiceError(service::ServiceError::Forbidden)) => {
            Response::builder().status(403).body(Body::empty()).unwrap()
        }
        Err(RestError::ServiceError(service::ServiceError::DatabaseQueryError(e))) => {
            Response::builder()
                .status(500)
                .body(Body::new(e.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(service::ServiceError::EntityNotFound(id))) => {
            Response::builder()
                .status(404)
                .body(Body::new(id.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::SlotNotAvailable(_))) => {
            Response::builder()
                .status(409)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::BookingInPast(_))) => {
            Response::builder()
                .status(400)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::ValidationError(_))) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::IdSetOnCreate)) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::VersionSetOnCreate)) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::TimeOrderWrong(_, _))) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(service::ServiceError::InternalError)) => {
            Response::builder().status(500).body(Body::empty()).unwrap()
        }
    }
}

pub trait RestStateDef: Clone + Send + Sync + 'static {
    type ServiceOfferingService: service::service_offering::ServiceOfferingService
        + Send
        + Sync
        + 'static;
    type WorkingHoursService: service::working_hours::WorkingHoursService + Send + Sync + 'static;
    type AvailabilityService: service::availability::AvailabilityService + Send + Sync + 'static;
    type AppointmentService: service::appointment::AppointmentService + Send + Sync + 'static;

    fn service_offering_service(&self) -> Arc<Self::ServiceOfferingService>;
    fn working_hours_service(&self) -> Arc<Self::WorkingHoursService>;
    fn availability_service(&self) -> Arc<Self::AvailabilityService>;
    fn appointment_service(&self) -> Arc<Self::AppointmentService>;
}

pub async fn start_server<RestState: RestStateDef>(rest_state: RestState, bind_address: &str) {
    let app = Router::new()
        .nest("/health", health::generate_route())
        .nest("/service", service_offering::generate_route())
        .nest("/working-hours", working_hours::generate_route())
        .nest("/availability", availability::generate_route())
        .nest("/appointment", appointment::generate_route())
        .with_state(rest_state);
    tracing::info!("Listening on {}", bind_address);
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .expect("Could not bind server");
    axum::serve(listener, app)
        .await
        .expect("Could not start server");
}

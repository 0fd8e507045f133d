use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    response::Response,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use service::appointment::{Appointment, AppointmentService, AppointmentStatus, BookingRequest};
use time::{format_description::well_known::Iso8601, OffsetDateTime, PrimitiveDateTime};
use uuid::Uuid;

use crate::{error_handler, RestError, RestStateDef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatusTO {
    Confirmed,
    Cancelled,
    Completed,
}

impl From<AppointmentStatus> for AppointmentStatusTO {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Confirmed => Self::Confirmed,
            AppointmentStatus::Cancelled => Self::Cancelled,
            AppointmentStatus::Completed => Self::Completed,
        }
    }
}
impl From<AppointmentStatusTO> for AppointmentStatus {
    fn from(status: AppointmentStatusTO) -> Self {
        match status {
            AppointmentStatusTO::Confirmed => Self::Confirmed,
            AppointmentStatusTO::Cancelled => Self::Cancelled,
            AppointmentStatusTO::Completed => Self::Completed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentTO {
    pub id: Uuid,
    pub user: Arc<str>,
    pub service_id: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub status: AppointmentStatusTO,
    #[serde(default)]
    pub created: Option<String>,
    pub version: Uuid,
}

impl TryFrom<&Appointment> for AppointmentTO {
    type Error = RestError;
    fn try_from(appointment: &Appointment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: appointment.id,
            user: appointment.user.clone(),
            service_id: appointment.service_id,
            start_time: appointment.start_time.format(&Iso8601::DATE_TIME)?,
            end_time: appointment.end_time.format(&Iso8601::DATE_TIME)?,
            status: appointment.status.into(),
            created: appointment
                .created
                .map(|created| created.format(&Iso8601::DATE_TIME))
                .transpose()?,
            version: appointment.version,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub service_id: Uuid,
    pub start_time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointmentRequest {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub status: Option<AppointmentStatusTO>,
}

/// Accepts timestamps with or without a UTC offset.  Offsets are converted
/// to UTC before the offset is dropped.
fn parse_date_time(value: &str) -> Result<PrimitiveDateTime, RestError> {
    if let Ok(date_time) = OffsetDateTime::parse(value, &Iso8601::DEFAULT) {
        let utc = date_time.to_offset(time::UtcOffset::UTC);
        return Ok(PrimitiveDateTime::new(utc.date(), utc.time()));
    }
    Ok(PrimitiveDateTime::parse(value, &Iso8601::DATE_TIME)?)
}

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_appointments::<RestState>))
        .route("/", post(book_appointment::<RestState>))
        .route("/{id}", get(get_appointment::<RestState>))
        .route("/{id}", put(update_appointment::<RestState>))
        .route("/{id}", delete(delete_appointment::<RestState>))
}

pub async fn get_all_appointments<RestState: RestStateDef>(
    rest_state: State<RestState>,
) -> Response {
    error_handler(
        (async {
            let appointments = rest_state
                .appointment_service()
                .get_all()
                .await?
                .iter()
                .map(AppointmentTO::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&appointments).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn get_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let appointment =
                AppointmentTO::try_from(&rest_state.appointment_service().get(id).await?)?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&appointment).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn book_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Response {
    error_handler(
        (async {
            let booking = BookingRequest {
                service_id: request.service_id,
                start_time: parse_date_time(&request.start_time)?,
            };
            let appointment =
                AppointmentTO::try_from(&rest_state.appointment_service().book(&booking).await?)?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&appointment).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn update_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateAppointmentRequest>,
) -> Response {
    error_handler(
        (async {
            let mut appointment = rest_state.appointment_service().get(id).await?;
            if let Some(start_time) = update.start_time.as_deref() {
                appointment = rest_state
                    .appointment_service()
                    .reschedule(id, parse_date_time(start_time)?)
                    .await?;
            }
            if let Some(status) = update.status {
                appointment = rest_state
                    .appointment_service()
                    .update_status(id, status.into())
                    .await?;
            }
            let appointment = AppointmentTO::try_from(&appointment)?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&appointment).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn delete_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            rest_state.appointment_service().delete(id).await?;
            Ok(Response::builder()
                .status(204)
                .body(Body::empty())
                .unwrap())
        })
        .await,
    )
}

use axum::{
    body::Body,
    extract::{Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use service::availability::AvailabilityService;
use service::service_offering::ServiceOfferingService;
use time::{
    format_description::{well_known::Iso8601, BorrowedFormatItem},
    macros::format_description,
    Date,
};
use uuid::Uuid;

use crate::{error_handler, RestStateDef};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub service_id: Uuid,
    pub date: String,
    #[serde(default)]
    pub buffer_minutes: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AvailableSlotTO {
    pub time: String,
    pub datetime: String,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityTO {
    pub date: String,
    pub service_id: Uuid,
    pub service_duration: u32,
    pub available_slots: Vec<AvailableSlotTO>,
}

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new().route("/", get(get_availability::<RestState>))
}

pub async fn get_availability<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Query(query): Query<AvailabilityQuery>,
) -> Response {
    error_handler(
        (async {
            let date = Date::parse(&query.date, DATE_FORMAT)?;
            let offering = rest_state
                .service_offering_service()
                .get(query.service_id)
                .await?;
            let slots = rest_state
                .availability_service()
                .available_slots(date, query.service_id, query.buffer_minutes, None)
                .await?;
            let available_slots = slots
                .iter()
                .map(|slot| {
                    Ok(AvailableSlotTO {
                        time: slot.time().format(TIME_FORMAT)?,
                        datetime: slot.format(&Iso8601::DATE_TIME)?,
                    })
                })
                .collect::<Result<Vec<_>, crate::RestError>>()?;
            let availability = AvailabilityTO {
                date: query.date,
                service_id: query.service_id,
                service_duration: offering.duration_minutes,
                available_slots,
            };
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&availability).unwrap()))
                .unwrap())
        })
        .await,
    )
}

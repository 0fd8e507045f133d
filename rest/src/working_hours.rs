use axum::{
    body::Body,
    extract::State,
    response::Response,
    routing::{get, put},
    Json, Router,
};
use bookease_utils::DayOfWeek;
use serde::{Deserialize, Serialize};
use service::working_hours::{WorkingHours, WorkingHoursService};
use time::{format_description::BorrowedFormatItem, macros::format_description, Time};
use uuid::Uuid;

use crate::{error_handler, RestError, RestStateDef};

const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHoursTO {
    #[serde(default)]
    pub id: Uuid,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    pub available: bool,
    #[serde(default)]
    pub version: Uuid,
}

impl TryFrom<&WorkingHours> for WorkingHoursTO {
    type Error = RestError;
    fn try_from(working_hours: &WorkingHours) -> Result<Self, Self::Error> {
        Ok(Self {
            id: working_hours.id,
            day_of_week: working_hours.day_of_week.to_number(),
            start_time: working_hours.start_time.format(TIME_FORMAT)?,
            end_time: working_hours.end_time.format(TIME_FORMAT)?,
            available: working_hours.available,
            version: working_hours.version,
        })
    }
}

impl TryFrom<&WorkingHoursTO> for WorkingHours {
    type Error = RestError;
    fn try_from(working_hours: &WorkingHoursTO) -> Result<Self, Self::Error> {
        Ok(Self {
            id: working_hours.id,
            day_of_week: DayOfWeek::from_number(working_hours.day_of_week)
                .ok_or(RestError::InvalidDayOfWeek(working_hours.day_of_week))?,
            start_time: Time::parse(&working_hours.start_time, TIME_FORMAT)?,
            end_time: Time::parse(&working_hours.end_time, TIME_FORMAT)?,
            available: working_hours.available,
            version: working_hours.version,
        })
    }
}

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_working_hours::<RestState>))
        .route("/", put(upsert_working_hours::<RestState>))
}

pub async fn get_all_working_hours<RestState: RestStateDef>(
    rest_state: State<RestState>,
) -> Response {
    error_handler(
        (async {
            let working_hours = rest_state
                .working_hours_service()
                .get_all()
                .await?
                .iter()
                .map(WorkingHoursTO::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&working_hours).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn upsert_working_hours<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Json(working_hours): Json<WorkingHoursTO>,
) -> Response {
    error_handler(
        (async {
            let working_hours = WorkingHoursTO::try_from(
                &rest_state
                    .working_hours_service()
                    .upsert(&WorkingHours::try_from(&working_hours)?)
                    .await?,
            )?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&working_hours).unwrap()))
                .unwrap())
        })
        .await,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_round_trip() {
        let to = WorkingHoursTO {
            id: Uuid::nil(),
            day_of_week: 0,
            start_time: "09:00".to_string(),
            end_time: "18:00".to_string(),
            available: true,
            version: Uuid::nil(),
        };
        let model = WorkingHours::try_from(&to).unwrap();
        assert_eq!(model.day_of_week, DayOfWeek::Monday);
        assert_eq!(model.start_time, time::macros::time!(09:00));
        let back = WorkingHoursTO::try_from(&model).unwrap();
        assert_eq!(back.start_time, "09:00");
        assert_eq!(back.end_time, "18:00");
    }

    #[test]
    fn test_invalid_day_of_week() {
        let to = WorkingHoursTO {
            id: Uuid::nil(),
            day_of_week: 7,
            start_time: "09:00".to_string(),
            end_time: "18:00".to_string(),
            available: true,
            version: Uuid::nil(),
        };
        assert!(matches!(
            WorkingHours::try_from(&to),
            Err(RestError::InvalidDayOfWeek(7))
        ));
    }
}

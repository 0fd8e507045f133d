use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    response::Response,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use service::service_offering::{ServiceOffering, ServiceOfferingService};
use time::format_description::well_known::Iso8601;
use uuid::Uuid;

use crate::{error_handler, RestError, RestStateDef};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOfferingTO {
    #[serde(default)]
    pub id: Uuid,
    pub name: Arc<str>,
    #[serde(default)]
    pub description: Option<Arc<str>>,
    pub duration_minutes: u32,
    pub price: f64,
    #[serde(default)]
    pub address: Option<Arc<str>>,
    #[serde(default)]
    pub image_url: Option<Arc<str>>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub version: Uuid,
}

impl TryFrom<&ServiceOffering> for ServiceOfferingTO {
    type Error = RestError;
    fn try_from(offering: &ServiceOffering) -> Result<Self, Self::Error> {
        Ok(Self {
            id: offering.id,
            name: offering.name.clone(),
            description: offering.description.clone(),
            duration_minutes: offering.duration_minutes,
            price: offering.price,
            address: offering.address.clone(),
            image_url: offering.image_url.clone(),
            created: offering
                .created
                .map(|created| created.format(&Iso8601::DATE_TIME))
                .transpose()?,
            version: offering.version,
        })
    }
}

impl From<&ServiceOfferingTO> for ServiceOffering {
    fn from(offering: &ServiceOfferingTO) -> Self {
        Self {
            id: offering.id,
            name: offering.name.clone(),
            description: offering.description.clone(),
            duration_minutes: offering.duration_minutes,
            price: offering.price,
            address: offering.address.clone(),
            image_url: offering.image_url.clone(),
            created: None,
            deleted: None,
            version: offering.version,
        }
    }
}

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_service_offerings::<RestState>))
        .route("/", post(create_service_offering::<RestState>))
        .route("/{id}", get(get_service_offering::<RestState>))
        .route("/{id}", put(update_service_offering::<RestState>))
        .route("/{id}", delete(delete_service_offering::<RestState>))
}

pub async fn get_all_service_offerings<RestState: RestStateDef>(
    rest_state: State<RestState>,
) -> Response {
    error_handler(
        (async {
            let offerings = rest_state
                .service_offering_service()
                .get_all()
                .await?
                .iter()
                .map(ServiceOfferingTO::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&offerings).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn get_service_offering<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let offering =
                ServiceOfferingTO::try_from(&rest_state.service_offering_service().get(id).await?)?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&offering).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn create_service_offering<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Json(offering): Json<ServiceOfferingTO>,
) -> Response {
    error_handler(
        (async {
            let offering = ServiceOfferingTO::try_from(
                &rest_state
                    .service_offering_service()
                    .create(&ServiceOffering::from(&offering))
                    .await?,
            )?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&offering).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn update_service_offering<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(id): Path<Uuid>,
    Json(offering): Json<ServiceOfferingTO>,
) -> Response {
    error_handler(
        (async {
            if offering.id != Uuid::nil() && offering.id != id {
                return Err(RestError::InconsistentId(id, offering.id));
            }
            let mut model = ServiceOffering::from(&offering);
            model.id = id;
            let offering = ServiceOfferingTO::try_from(
                &rest_state
                    .service_offering_service()
                    .update(&model)
                    .await?,
            )?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&offering).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn delete_service_offering<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            rest_state.service_offering_service().delete(id).await?;
            Ok(Response::builder()
                .status(204)
                .body(Body::empty())
                .unwrap())
        })
        .await,
    )
}

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

pub mod appointment;
pub mod availability;
pub mod clock;
pub mod permission;
pub mod service_offering;
pub mod uuid_service;
pub mod working_hours;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailureItem {
    MissingField(Arc<str>),
    InvalidValue(Arc<str>),
}

impl Display for ValidationFailureItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationFailureItem::MissingField(field) => write!(f, "Missing field: {}", field),
            ValidationFailureItem::InvalidValue(field) => write!(f, "Invalid value: {}", field),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] dao::DaoError),

    #[error("Forbidden")]
    Forbidden,

    #[error("Entity {0} not found")]
    EntityNotFound(Uuid),

    #[error("Validation error: {0:?}")]
    ValidationError(Arc<[ValidationFailureItem]>),

    #[error("ID cannot be set on create")]
    IdSetOnCreate,

    #[error("Version cannot be set on create")]
    VersionSetOnCreate,

    #[error("The slot starting at {0} is no longer available")]
    SlotNotAvailable(time::PrimitiveDateTime),

    #[error("Cannot book an appointment in the past: {0}")]
    BookingInPast(time::PrimitiveDateTime),

    #[error("Time {0} must be before time {1}")]
    TimeOrderWrong(time::Time, time::Time),

    #[error("Internal error")]
    InternalError,
}

use models::errors::ModelError;
use sea_orm::DbErr;
use thiserror::Error;

/// Coarse classification used at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Duplicate,
    Store,
    Timeout,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid date format: {0}")]
    InvalidDateFormat(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("device already exists: {0}")]
    DuplicateDevice(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn db(e: DbErr) -> Self { Self::Db(e.to_string()) }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::MissingField(_)
            | ServiceError::InvalidDateFormat(_)
            | ServiceError::Validation(_)
            | ServiceError::Model(ModelError::Validation(_)) => ErrorKind::Validation,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::DuplicateDevice(_) => ErrorKind::Duplicate,
            ServiceError::Db(_) | ServiceError::Model(ModelError::Db(_)) => ErrorKind::Store,
            ServiceError::Timeout(_) => ErrorKind::Timeout,
        }
    }
}

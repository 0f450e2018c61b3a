//! API error types
//!
//! API errors are pass-through: engine and store failures keep their
//! own code, kind and rule. Only request-shape problems originate
//! here.

use thiserror::Error;

use crate::lifecycle::LifecycleError;
use crate::store::StoreError;

/// API-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Malformed JSON or fields that do not fit the operation
    RabbitryInvalidRequest,
    /// `op` names no operation
    RabbitryUnknownOperation,
    /// Result could not be encoded
    RabbitryEncoding,
}

impl ApiErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::RabbitryInvalidRequest => "RABBITRY_INVALID_REQUEST",
            ApiErrorCode::RabbitryUnknownOperation => "RABBITRY_UNKNOWN_OPERATION",
            ApiErrorCode::RabbitryEncoding => "RABBITRY_ENCODING",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("failed to encode result: {0}")]
    Encoding(String),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

impl ApiError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        ApiError::InvalidRequest(reason.into())
    }

    pub fn unknown_operation(op: impl Into<String>) -> Self {
        ApiError::UnknownOperation(op.into())
    }

    /// Returns the error code, passed through from the engine when it
    /// originated there.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => ApiErrorCode::RabbitryInvalidRequest.code(),
            ApiError::UnknownOperation(_) => ApiErrorCode::RabbitryUnknownOperation.code(),
            ApiError::Encoding(_) => ApiErrorCode::RabbitryEncoding.code(),
            ApiError::Lifecycle(e) => e.code(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "InvalidRequest",
            ApiError::UnknownOperation(_) => "UnknownOperation",
            ApiError::Encoding(_) => "Encoding",
            ApiError::Lifecycle(e) => e.kind(),
        }
    }

    pub fn rule(&self) -> Option<String> {
        match self {
            ApiError::Lifecycle(e) => e.rule(),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Lifecycle(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Lifecycle(LifecycleError::from(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Encoding(e.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

//! API response types
//!
//! JSON response formatting for all operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ApiError;

/// Emitted when a response itself cannot be encoded.
const ENCODING_FAILURE: &str = r#"{"status":"error","code":"RABBITRY_ENCODING","kind":"Encoding","message":"response could not be encoded"}"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub status: String,
    pub data: Value,
}

impl SuccessResponse {
    pub fn new(data: Value) -> Self {
        Self {
            status: "ok".to_string(),
            data,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| ENCODING_FAILURE.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub kind: String,
    /// Violated rule, for validation and precondition failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    pub message: String,
}

impl ErrorResponse {
    pub fn from_error(err: &ApiError) -> Self {
        Self {
            status: "error".to_string(),
            code: err.code().to_string(),
            kind: err.kind().to_string(),
            rule: err.rule(),
            message: err.message(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| ENCODING_FAILURE.to_string())
    }
}

#[derive(Debug, Clone)]
pub enum Response {
    Success(SuccessResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response::Success(SuccessResponse::new(data))
    }

    pub fn error(err: &ApiError) -> Self {
        Response::Error(ErrorResponse::from_error(err))
    }

    pub fn to_json(&self) -> String {
        match self {
            Response::Success(r) => r.to_json(),
            Response::Error(r) => r.to_json(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }
}

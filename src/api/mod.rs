//! API Layer for rabbitry
//!
//! One JSON object in, one JSON object out. The `op` field selects an
//! engine operation, a read, or a report.
//!
//! # Response shapes
//!
//! - `{"status":"ok","data":...}`
//! - `{"status":"error","code":...,"kind":...,"rule":...,"message":...}`
//!
//! Error codes from the engine pass through unchanged.

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiErrorCode, ApiResult};
pub use handler::{ApiHandler, Processed};
pub use request::Request;
pub use response::{ErrorResponse, Response, SuccessResponse};

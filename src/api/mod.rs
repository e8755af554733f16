//! REST API module.
//!
//! Every handler answers with the `{ data, errors }` envelope: `errors` is
//! null on success and `data` is null on failure.

mod activities;
mod adventures;
mod gear;
mod participants;
mod planner;
mod resorts;
mod session;
mod users;

pub use activities::*;
pub use adventures::*;
pub use gear::*;
pub use participants::*;
pub use planner::*;
pub use resorts::*;
pub use session::*;
pub use users::*;

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, ErrorDetails};

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub errors: Option<Vec<ErrorDetails>>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data, errors: None }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// JSON body extractor whose rejection uses the error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejection uses the error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Unwrap a lookup result or report the record as missing.
fn found<T>(record: Option<T>, label: &str, id: &str) -> Result<T, AppError> {
    record.ok_or_else(|| AppError::NotFound(format!("{} {} not found", label, id)))
}

/// Lists pass `limit` through, but only positive values.
fn check_limit(limit: Option<i64>) -> Result<Option<i64>, AppError> {
    match limit {
        Some(n) if n <= 0 => Err(AppError::Validation(
            "limit must be a positive number".to_string(),
        )),
        other => Ok(other),
    }
}

/// Parse an optional enum filter from the query string.
fn parse_filter<T>(value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr<Err = AppError>,
{
    value.map(str::parse).transpose()
}

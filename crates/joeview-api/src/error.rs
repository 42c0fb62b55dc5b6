//! Maps domain `AppError` to HTTP responses.

pub use joeview_core::error::{ApiErrorResponse, UNKNOWN_ERROR_DETAILS};

#[cfg(test)]
use axum::http::StatusCode;
#[cfg(test)]
use axum::response::IntoResponse;
#[cfg(test)]
use joeview_core::error::AppError;

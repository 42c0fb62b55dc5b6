//! Converts handler panics into the generic server error body.

use std::any::Any;

use axum::response::{IntoResponse, Response};

use joeview_core::error::AppError;

use crate::error::UNKNOWN_ERROR_DETAILS;
use crate::handlers::admin::users::UNEXPECTED_ERROR;

/// Response for a request whose handler panicked.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        UNKNOWN_ERROR_DETAILS.to_string()
    };

    tracing::error!(panic = %details, "Handler panicked");

    AppError::internal(UNEXPECTED_ERROR)
        .with_details(details)
        .into_response()
}

//! Errors raised while talking to the REST gateway.

use serde::Deserialize;
use thiserror::Error;

use joeview_core::error::{AppError, ErrorKind};

/// A failed gateway request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response.
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The gateway answered with an error status.
    #[error("gateway returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the gateway (or the status reason).
        message: String,
        /// Gateway or database error code, e.g. `42P01`.
        code: Option<String>,
        /// Extra detail from the database, if any.
        details: Option<String>,
        /// Hint from the database, if any.
        hint: Option<String>,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode gateway response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GatewayError {
    /// The underlying message, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Transport(err) => err.to_string(),
            Self::Api { message, .. } => message.clone(),
            Self::Decode(err) => err.to_string(),
        }
    }

    /// Build an API error from a status and raw response body.
    pub(crate) fn from_body(status: reqwest::StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => Self::Api {
                status: status.as_u16(),
                message: parsed
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| status_text(status)),
                code: parsed.code,
                details: parsed.details,
                hint: parsed.hint,
            },
            Err(_) => Self::Api {
                status: status.as_u16(),
                message: if body.trim().is_empty() {
                    status_text(status)
                } else {
                    body.trim().to_string()
                },
                code: None,
                details: None,
                hint: None,
            },
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        let message = err.message();
        AppError::with_source(ErrorKind::Database, format!("Data store error: {message}"), err)
            .with_details(message)
    }
}

/// Error body returned by the gateway.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

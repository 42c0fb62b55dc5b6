//! # joeview-api
//!
//! HTTP API layer for the JoeView admin API built on Axum.
//!
//! Provides the admin and health endpoints, middleware (CORS, request
//! logging, compression, panic recovery), extractors, DTOs and the mapping
//! from `AppError` to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;

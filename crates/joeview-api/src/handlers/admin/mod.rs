//! Admin-only handlers.

pub mod users;

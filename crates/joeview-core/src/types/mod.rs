//! Core type definitions used across the JoeView workspace.

pub mod filter;
pub mod pagination;
pub mod sorting;

pub use filter::{Filter, FilterField, FilterOp};
pub use pagination::{PageRequest, PageResponse};
pub use sorting::{SortDirection, SortField};

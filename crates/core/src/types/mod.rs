//! Core types for the retail API.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod list;

pub use id::*;
pub use list::{DEFAULT_LIMIT, ListQuery, ListQueryError, ListResult};

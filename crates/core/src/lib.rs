//! Retail Core - Shared types library.
//!
//! This crate provides common types used across the retail API components:
//! - `api` - REST backend (repositories, auth, HTTP surface)
//! - `integration-tests` - End-to-end HTTP tests
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and list pagination types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

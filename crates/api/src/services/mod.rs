//! Business logic services.
//!
//! - `auth` - Registration, login, and signed access tokens

pub mod auth;

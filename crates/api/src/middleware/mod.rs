//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. `TimeoutLayer` (per-request deadline)
//! 5. Access gate (per route group)

pub mod gate;
pub mod request_id;

pub use gate::{
    AuthClaims, BearerPolicy, OptionalClaims, bearer_optional, bearer_required,
    require_shared_secret,
};
pub use request_id::request_id_middleware;

//! End-to-end tests for the retail API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the API against a migrated database
//! cargo run -p retail-api
//!
//! # Run the ignored end-to-end tests
//! API_BASE_URL=http://127.0.0.1:8080 API_SECRET_KEY=... \
//!     cargo test -p retail-integration-tests -- --ignored
//! ```

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

/// Shared secret for the sales routes, read from the same variable the server uses.
#[must_use]
pub fn shared_secret() -> Option<String> {
    std::env::var("API_SECRET_KEY").ok()
}

/// Header carrying the shared secret.
#[must_use]
pub fn secret_header() -> String {
    std::env::var("API_SECRET_HEADER").unwrap_or_else(|_| "Password".to_string())
}

/// Response envelope as seen by a client.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub message: String,
    pub error_code: u16,
    pub data: Value,
}

/// Read a response as `(status, envelope)`.
///
/// # Errors
///
/// Returns the `reqwest` error if the body is not an envelope.
pub async fn envelope(response: Response) -> Result<(StatusCode, Envelope), reqwest::Error> {
    let status = response.status();
    let body = response.json::<Envelope>().await?;
    Ok((status, body))
}

/// A login unlikely to collide with earlier runs.
#[must_use]
pub fn unique_login(prefix: &str) -> String {
    format!("{prefix}-{}", retail_core::new_id().simple())
}

/// Plain HTTP client.
///
/// # Errors
///
/// Returns the `reqwest` error if the client cannot be built.
pub fn client() -> Result<Client, reqwest::Error> {
    Client::builder().build()
}

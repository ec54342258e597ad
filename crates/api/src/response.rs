//! Uniform response envelope.
//!
//! Every response body, success or error, has the shape
//! `{ "message": string, "error_code": int, "data": any }` where `error_code`
//! repeats the HTTP status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Response body wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T = serde_json::Value> {
    pub message: String,
    pub error_code: u16,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            error_code: status.as_u16(),
            data,
        }
    }
}

impl Envelope {
    /// An envelope with `data: null`.
    #[must_use]
    pub fn empty(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, message, serde_json::Value::Null)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.error_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_envelope_status_matches_error_code() {
        let response = Envelope::new(
            StatusCode::CREATED,
            "create category",
            serde_json::json!({ "id": "x" }),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error_code"], 201);
        assert_eq!(json["message"], "create category");
        assert_eq!(json["data"]["id"], "x");
    }

    #[test]
    fn test_empty_envelope_has_null_data() {
        let envelope = Envelope::empty(StatusCode::NOT_FOUND, "Not found");
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["error_code"], 404);
    }
}

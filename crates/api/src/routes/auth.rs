//! Authentication route handlers.
//!
//! Handles login and registration, both answering with an access token.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;

use retail_core::UserId;

use super::crud::json_body;
use crate::error::Result;
use crate::models::{Login, Registration};
use crate::response::Envelope;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Login response data.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Registration response data.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
    pub access_token: String,
}

/// Exchange a login and password for an access token.
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Login>, JsonRejection>,
) -> Result<Envelope<LoginResponse>> {
    let body = json_body(payload)?;
    let auth = AuthService::new(state.pool(), state.tokens());

    let (user, access_token) = auth.login(&body.login, &body.password).await?;
    tracing::info!(user_id = %user.user_id, "User logged in");

    Ok(Envelope::new(
        StatusCode::CREATED,
        "login",
        LoginResponse { access_token },
    ))
}

/// Create an account and return its first access token.
///
/// POST /register
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Registration>, JsonRejection>,
) -> Result<Envelope<RegisterResponse>> {
    let registration = json_body(payload)?;
    let auth = AuthService::new(state.pool(), state.tokens());

    let (user_id, access_token) = auth.register(&registration).await?;

    Ok(Envelope::new(
        StatusCode::CREATED,
        "register",
        RegisterResponse {
            user_id,
            access_token,
        },
    ))
}

//! Access gate: shared-secret and bearer-token policies.
//!
//! Each policy is a `from_fn_with_state` middleware applied per route group.
//! Verified token claims are inserted into request extensions and read back
//! with the [`AuthClaims`] / [`OptionalClaims`] extractors.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{AuthError, Claims, TokenService};
use crate::state::AppState;

/// What to do when a route sees no `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerPolicy {
    /// Reject with `401`.
    Required,
    /// Let the request through without claims.
    Optional,
}

/// Reject requests whose shared-secret header is absent or wrong.
///
/// # Errors
///
/// Returns `AuthError::Forbidden` (403).
pub async fn require_shared_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = &state.config().auth;
    check_shared_secret(
        request.headers(),
        &auth.secret_header,
        secrecy::ExposeSecret::expose_secret(&auth.secret_key),
    )?;
    Ok(next.run(request).await)
}

/// Bearer gate that rejects requests without a token.
///
/// # Errors
///
/// Returns `AuthError::MissingToken` (401) or a token error (403).
pub async fn bearer_required(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    bearer_gate(&state, BearerPolicy::Required, request, next).await
}

/// Bearer gate that lets requests without a token through.
///
/// # Errors
///
/// Returns a token error (403) when a token is present but invalid.
pub async fn bearer_optional(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    bearer_gate(&state, BearerPolicy::Optional, request, next).await
}

async fn bearer_gate(
    state: &AppState,
    policy: BearerPolicy,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(claims) = check_bearer(request.headers(), state.tokens(), policy)? {
        crate::error::set_sentry_user(&claims.sub);
        request.extensions_mut().insert(claims);
    }
    Ok(next.run(request).await)
}

/// Compare the shared-secret header against `expected`.
///
/// # Errors
///
/// Returns `AuthError::Forbidden` if the header is absent, not UTF-8, or wrong.
pub fn check_shared_secret(
    headers: &HeaderMap,
    header_name: &str,
    expected: &str,
) -> Result<(), AuthError> {
    let provided = headers
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::Forbidden)?;

    if constant_time_compare(provided, expected) {
        Ok(())
    } else {
        tracing::debug!(header = header_name, "Shared secret mismatch");
        Err(AuthError::Forbidden)
    }
}

/// Verify the `Authorization` header according to `policy`.
///
/// Returns `Ok(None)` only when the header is absent and the policy is
/// [`BearerPolicy::Optional`].
///
/// # Errors
///
/// Returns `AuthError::MissingToken` when absent under `Required`.
/// Returns `AuthError::InvalidToken` / `ExpiredToken` when present but invalid.
pub fn check_bearer(
    headers: &HeaderMap,
    tokens: &TokenService,
    policy: BearerPolicy,
) -> Result<Option<Claims>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return match policy {
            BearerPolicy::Required => Err(AuthError::MissingToken),
            BearerPolicy::Optional => Ok(None),
        };
    };

    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;
    tokens.verify(extract_bearer(value)).map(Some)
}

/// Accept both `Bearer <token>` and a bare `<token>`.
#[must_use]
pub fn extract_bearer(value: &str) -> &str {
    let value = value.trim();
    match (value.get(..7), value.get(7..)) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer ") => {
            token.trim_start()
        }
        _ => value,
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

/// Extractor for the claims verified by a bearer gate.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(AuthClaims(claims): AuthClaims) -> impl IntoResponse {
///     claims.sub.to_string()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Self)
            .ok_or(AppError::Auth(AuthError::MissingToken))
    }
}

/// Extractor for claims that may be absent under [`BearerPolicy::Optional`].
#[derive(Debug, Clone)]
pub struct OptionalClaims(pub Option<Claims>);

impl<S> FromRequestParts<S> for OptionalClaims
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Claims>().cloned()))
    }
}

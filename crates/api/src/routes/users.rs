//! User profile route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};

use retail_core::{ListQuery, ListResult};

use super::crud::{ListParams, parse_id};
use crate::db::{RepositoryError, UserKey, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{AuthClaims, OptionalClaims};
use crate::models::User;
use crate::response::Envelope;
use crate::state::AppState;

fn user_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("User".to_string()),
        other => AppError::Database(other),
    }
}

/// GET /user/{id}
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Envelope<User>> {
    let id = parse_id::<User>(&id)?;
    let user = UserRepository::new(state.pool())
        .get(&UserKey::Id(id))
        .await
        .map_err(user_not_found)?;

    Ok(Envelope::new(StatusCode::OK, "get user by id", user))
}

/// GET /v2/user
///
/// Open to anonymous callers; a presented token must still be valid.
pub async fn list(
    State(state): State<AppState>,
    OptionalClaims(claims): OptionalClaims,
    Query(params): Query<ListParams>,
) -> Result<Envelope<ListResult<User>>> {
    let query = ListQuery::try_from(params)?;
    let result = UserRepository::new(state.pool()).get_list(&query).await?;

    tracing::debug!(
        caller = ?claims.map(|c| c.sub),
        count = result.count,
        "Listed users"
    );
    Ok(Envelope::new(StatusCode::OK, "get list user", result))
}

/// GET /v2/me
pub async fn me(State(state): State<AppState>, AuthClaims(claims): AuthClaims) -> Result<Envelope<User>> {
    let user = UserRepository::new(state.pool())
        .get(&UserKey::Id(claims.sub))
        .await
        .map_err(user_not_found)?;

    Ok(Envelope::new(StatusCode::OK, "get me", user))
}

//! Generic CRUD handlers, instantiated once per [`Entity`].
//!
//! ```text
//! POST   /{entity}        - Create, returns the stored row
//! GET    /{entity}        - List (?offset=&limit=&search=)
//! GET    /{entity}/{id}   - Get by id
//! PUT    /{entity}/{id}   - Full replace
//! PATCH  /{entity}/{id}   - Partial update
//! DELETE /{entity}/{id}   - Delete
//! ```

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::get,
};
use serde::Deserialize;

use retail_core::{ListQuery, ListResult};

use crate::db::{Entity, Repository};
use crate::error::{AppError, Result};
use crate::response::Envelope;
use crate::state::AppState;

/// Raw list parameters; validated by [`ListQuery::parse`].
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl TryFrom<ListParams> for ListQuery {
    type Error = AppError;

    fn try_from(params: ListParams) -> Result<Self> {
        Ok(Self::parse(
            params.offset.as_deref(),
            params.limit.as_deref(),
            params.search.as_deref(),
        )?)
    }
}

/// Every CRUD route for `E`.
pub fn entity_routes<E: Entity>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<E>).post(create::<E>))
        .route(
            "/{id}",
            get(show::<E>)
                .put(update::<E>)
                .patch(patch::<E>)
                .delete(remove::<E>),
        )
}

/// Parse a path segment into a typed id.
pub(crate) fn parse_id<E: Entity>(raw: &str) -> Result<E::Id> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid {} id: {raw}", E::NAME)))
}

/// Unwrap a JSON body, keeping rejections inside the envelope.
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Map `NotFound` to a message naming the entity.
fn not_found<E: Entity>(err: crate::db::RepositoryError) -> AppError {
    match err {
        crate::db::RepositoryError::NotFound => AppError::NotFound(capitalize(E::NAME)),
        other => AppError::Database(other),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

pub async fn create<E: Entity>(
    State(state): State<AppState>,
    payload: std::result::Result<Json<E::Input>, JsonRejection>,
) -> Result<Envelope<E>> {
    let input = json_body(payload)?;
    let repo = Repository::<E>::new(state.pool());

    let id = repo.create(&input).await?;
    let row = repo.get_by_id(id).await.map_err(not_found::<E>)?;

    Ok(Envelope::new(
        axum::http::StatusCode::CREATED,
        format!("create {}", E::NAME),
        row,
    ))
}

pub async fn show<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<E>> {
    let id = parse_id::<E>(&id)?;
    let row = Repository::<E>::new(state.pool())
        .get_by_id(id)
        .await
        .map_err(not_found::<E>)?;

    Ok(Envelope::new(
        axum::http::StatusCode::OK,
        format!("get {} by id", E::NAME),
        row,
    ))
}

pub async fn list<E: Entity>(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Envelope<ListResult<E>>> {
    let query = ListQuery::try_from(params)?;
    let result = Repository::<E>::new(state.pool()).get_list(&query).await?;

    Ok(Envelope::new(
        axum::http::StatusCode::OK,
        format!("get list {}", E::NAME),
        result,
    ))
}

pub async fn update<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<E::Input>, JsonRejection>,
) -> Result<Envelope<E>> {
    let id = parse_id::<E>(&id)?;
    let input = json_body(payload)?;
    let row = Repository::<E>::new(state.pool())
        .update(id, &input)
        .await
        .map_err(not_found::<E>)?;

    Ok(Envelope::new(
        axum::http::StatusCode::OK,
        format!("update {}", E::NAME),
        row,
    ))
}

pub async fn patch<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<E::Patch>, JsonRejection>,
) -> Result<Envelope<E>> {
    let id = parse_id::<E>(&id)?;
    let patch = json_body(payload)?;
    let row = Repository::<E>::new(state.pool())
        .update_partial(id, &patch)
        .await
        .map_err(not_found::<E>)?;

    Ok(Envelope::new(
        axum::http::StatusCode::OK,
        format!("patch {}", E::NAME),
        row,
    ))
}

pub async fn remove<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope> {
    let id = parse_id::<E>(&id)?;
    Repository::<E>::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found::<E>)?;

    Ok(Envelope::empty(
        axum::http::StatusCode::OK,
        format!("delete {}", E::NAME),
    ))
}

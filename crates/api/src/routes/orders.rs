//! Order aggregates and order items.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Serialize;

use retail_core::OrderId;

use super::crud;
use crate::db::{OrderRepository, Repository, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::{
    ORDER_STATUS_RANGE, Order, OrderInput, OrderItem, OrderItemInput, OrderPatch,
};
use crate::response::Envelope;
use crate::state::AppState;

/// Order total response data.
#[derive(Debug, Serialize)]
pub struct TotalSum {
    pub order_id: OrderId,
    pub total_sum: Decimal,
}

/// Order routes: CRUD with `order_status` checked on writes, plus
/// `/{id}/total_sum`.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(crud::list::<Order>).post(create_order))
        .route(
            "/{id}",
            get(crud::show::<Order>)
                .put(update_order)
                .patch(patch_order)
                .delete(crud::remove::<Order>),
        )
        .route("/{id}/total_sum", get(total_sum))
}

/// Order item routes: create, delete, get and list.
pub fn order_item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(crud::list::<OrderItem>).post(create_item))
        .route(
            "/{id}",
            get(crud::show::<OrderItem>).delete(crud::remove::<OrderItem>),
        )
}

/// POST /order
pub async fn create_order(
    state: State<AppState>,
    payload: std::result::Result<Json<OrderInput>, JsonRejection>,
) -> Result<Envelope<Order>> {
    let input = crud::json_body(payload)?;
    validate_status(input.order_status)?;
    crud::create::<Order>(state, Ok(Json(input))).await
}

/// PUT /order/{id}
pub async fn update_order(
    state: State<AppState>,
    id: Path<String>,
    payload: std::result::Result<Json<OrderInput>, JsonRejection>,
) -> Result<Envelope<Order>> {
    let input = crud::json_body(payload)?;
    validate_status(input.order_status)?;
    crud::update::<Order>(state, id, Ok(Json(input))).await
}

/// PATCH /order/{id}
pub async fn patch_order(
    state: State<AppState>,
    id: Path<String>,
    payload: std::result::Result<Json<OrderPatch>, JsonRejection>,
) -> Result<Envelope<Order>> {
    let patch = crud::json_body(payload)?;
    if let Some(status) = patch.order_status {
        validate_status(status)?;
    }
    crud::patch::<Order>(state, id, Ok(Json(patch))).await
}

fn validate_status(status: i32) -> Result<()> {
    if ORDER_STATUS_RANGE.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "order_status must be between {} and {}",
            ORDER_STATUS_RANGE.start(),
            ORDER_STATUS_RANGE.end()
        )))
    }
}

/// GET /order/{id}/total_sum
pub async fn total_sum(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<TotalSum>> {
    let order_id = crud::parse_id::<Order>(&id)?;
    let total_sum = OrderRepository::new(state.pool())
        .total_sum(order_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Order".to_string()),
            other => AppError::Database(other),
        })?;

    Ok(Envelope::new(
        StatusCode::OK,
        "order total sum",
        TotalSum {
            order_id,
            total_sum,
        },
    ))
}

/// POST /order_item
///
/// Rejects quantities below one and discounts outside `0..=1` before
/// touching the store.
pub async fn create_item(
    State(state): State<AppState>,
    payload: std::result::Result<Json<OrderItemInput>, JsonRejection>,
) -> Result<Envelope<OrderItem>> {
    let input = crud::json_body(payload)?;
    validate_item(&input)?;

    let repo = Repository::<OrderItem>::new(state.pool());
    let id = repo.create(&input).await?;
    let item = repo.get_by_id(id).await?;

    tracing::info!(order_id = %input.order_id, order_item_id = %id, "Order item added");
    Ok(Envelope::new(StatusCode::CREATED, "create order item", item))
}

fn validate_item(input: &OrderItemInput) -> Result<()> {
    if input.quantity < 1 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }
    if input.discount < Decimal::ZERO || input.discount > Decimal::ONE {
        return Err(AppError::BadRequest(
            "discount must be between 0 and 1".to_string(),
        ));
    }
    if input.list_price < Decimal::ZERO {
        return Err(AppError::BadRequest("list_price must not be negative".to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use retail_core::ProductId;

    use super::*;
    use crate::state::test_state;

    fn item(quantity: i32, discount: &str) -> OrderItemInput {
        OrderItemInput {
            order_id: OrderId::generate(),
            product_id: ProductId::generate(),
            quantity,
            list_price: "100".parse().unwrap(),
            discount: discount.parse().unwrap(),
        }
    }

    #[test]
    fn test_validate_item() {
        assert!(validate_item(&item(1, "0.2")).is_ok());
        assert!(validate_item(&item(0, "0")).is_err());
        assert!(validate_item(&item(1, "1.5")).is_err());
        assert!(validate_item(&item(1, "-0.1")).is_err());
    }

    #[test]
    fn test_validate_status() {
        assert!(validate_status(1).is_ok());
        assert!(validate_status(4).is_ok());
        assert!(matches!(validate_status(0), Err(AppError::BadRequest(_))));
        assert!(matches!(validate_status(5), Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_order_status_out_of_range_is_rejected() {
        let body = serde_json::json!({
            "order_status": 9,
            "order_date": "2024-05-01",
            "required_date": "2024-05-03",
            "store_id": retail_core::StoreId::generate(),
            "staff_id": retail_core::StaffId::generate(),
        });
        let create = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let patch = Request::builder()
            .method("PATCH")
            .uri(format!("/{}", OrderId::generate()))
            .header("content-type", "application/json")
            .body(Body::from(r#"{"order_status": 0}"#))
            .unwrap();

        for request in [create, patch] {
            let response = order_routes()
                .with_state(test_state())
                .oneshot(request)
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_total_sum_rejects_bad_id() {
        let response = order_routes()
            .with_state(test_state())
            .oneshot(
                Request::builder()
                    .uri("/abc/total_sum")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

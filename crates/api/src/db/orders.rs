//! Order queries beyond generic CRUD.

use rust_decimal::Decimal;
use sqlx::PgPool;

use retail_core::OrderId;

use super::RepositoryError;

/// Repository for order aggregates.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Sum of `quantity * list_price * (1 - discount)` over an order's items.
    ///
    /// An order without items totals zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn total_sum(&self, order_id: OrderId) -> Result<Decimal, RepositoryError> {
        let total: Option<Decimal> = sqlx::query_scalar(
            r"
            SELECT COALESCE(SUM(i.quantity * i.list_price * (1 - i.discount)), 0)
            FROM orders o
            LEFT JOIN order_items i ON i.order_id = o.order_id
            WHERE o.order_id = $1
            GROUP BY o.order_id
            ",
        )
        .bind(order_id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        total.ok_or(RepositoryError::NotFound)
    }
}

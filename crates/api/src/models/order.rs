//! Orders and their line items.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use retail_core::{CustomerId, OrderId, OrderItemId, ProductId, StaffId, StoreId};

use super::{non_null, present};

/// Valid values of `Order::order_status`.
pub const ORDER_STATUS_RANGE: std::ops::RangeInclusive<i32> = 1..=4;

/// A sales order. `customer_id` is absent for walk-in sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Order {
    pub order_id: OrderId,
    pub customer_id: Option<CustomerId>,
    pub order_status: i32,
    pub order_date: NaiveDate,
    pub required_date: NaiveDate,
    pub shipped_date: Option<NaiveDate>,
    pub store_id: StoreId,
    pub staff_id: StaffId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderInput {
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    pub order_status: i32,
    pub order_date: NaiveDate,
    pub required_date: NaiveDate,
    #[serde(default)]
    pub shipped_date: Option<NaiveDate>,
    pub store_id: StoreId,
    pub staff_id: StaffId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    #[serde(default, deserialize_with = "present")]
    pub customer_id: Option<Option<CustomerId>>,
    #[serde(default, deserialize_with = "non_null")]
    pub order_status: Option<i32>,
    #[serde(default, deserialize_with = "non_null")]
    pub order_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "non_null")]
    pub required_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "present")]
    pub shipped_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "non_null")]
    pub store_id: Option<StoreId>,
    #[serde(default, deserialize_with = "non_null")]
    pub staff_id: Option<StaffId>,
}

/// One product line of an order. `discount` is a fraction in `0..=1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub order_item_id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub list_price: Decimal,
    pub discount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub list_price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderItemPatch {
    #[serde(default, deserialize_with = "non_null")]
    pub product_id: Option<ProductId>,
    #[serde(default, deserialize_with = "non_null")]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "non_null")]
    pub list_price: Option<Decimal>,
    #[serde(default, deserialize_with = "non_null")]
    pub discount: Option<Decimal>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_item_discount_defaults_to_zero() {
        let input: OrderItemInput = serde_json::from_value(serde_json::json!({
            "order_id": OrderId::generate(),
            "product_id": ProductId::generate(),
            "quantity": 2,
            "list_price": "499.99",
        }))
        .unwrap();

        assert_eq!(input.discount, Decimal::ZERO);
        assert_eq!(input.list_price, "499.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_order_patch_clears_shipped_date() {
        let patch: OrderPatch =
            serde_json::from_str(r#"{"order_status":4,"shipped_date":null}"#).unwrap();

        assert_eq!(patch.order_status, Some(4));
        assert_eq!(patch.shipped_date, Some(None));
        assert_eq!(patch.customer_id, None);
    }

    #[test]
    fn test_order_status_range() {
        assert!(ORDER_STATUS_RANGE.contains(&1));
        assert!(ORDER_STATUS_RANGE.contains(&4));
        assert!(!ORDER_STATUS_RANGE.contains(&5));
    }
}

//! Catalog: categories, brands, products and per-store stock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use retail_core::{BrandId, CategoryId, ProductId, StockId, StoreId};

use super::non_null;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub category_id: CategoryId,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub category_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    #[serde(default, deserialize_with = "non_null")]
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Brand {
    pub brand_id: BrandId,
    pub brand_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandInput {
    pub brand_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrandPatch {
    #[serde(default, deserialize_with = "non_null")]
    pub brand_name: Option<String>,
}

/// A product sold by every store; `list_price` is the catalog price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub product_id: ProductId,
    pub product_name: String,
    pub brand_id: BrandId,
    pub category_id: CategoryId,
    pub model_year: i32,
    pub list_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub product_name: String,
    pub brand_id: BrandId,
    pub category_id: CategoryId,
    pub model_year: i32,
    pub list_price: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    #[serde(default, deserialize_with = "non_null")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub brand_id: Option<BrandId>,
    #[serde(default, deserialize_with = "non_null")]
    pub category_id: Option<CategoryId>,
    #[serde(default, deserialize_with = "non_null")]
    pub model_year: Option<i32>,
    #[serde(default, deserialize_with = "non_null")]
    pub list_price: Option<Decimal>,
}

/// Quantity of one product held by one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Stock {
    pub stock_id: StockId,
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockInput {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub quantity: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockPatch {
    #[serde(default, deserialize_with = "non_null")]
    pub store_id: Option<StoreId>,
    #[serde(default, deserialize_with = "non_null")]
    pub product_id: Option<ProductId>,
    #[serde(default, deserialize_with = "non_null")]
    pub quantity: Option<i32>,
}

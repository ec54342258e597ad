//! Domain models for the API.
//!
//! Each entity has three shapes:
//! - the stored record (`sqlx::FromRow` + `Serialize`), returned to clients
//! - an input (`Deserialize`) used for create and full replace
//! - a patch (`Deserialize`) where every field is optional
//!
//! Patch fields for nullable columns are `Option<Option<T>>`: an absent key
//! leaves the column alone, an explicit `null` clears it. Patch fields for
//! `NOT NULL` columns are `Option<T>` and reject an explicit `null`.

pub mod catalog;
pub mod code;
pub mod customer;
pub mod order;
pub mod store;
pub mod user;

use serde::{Deserialize, Deserializer, de::Error as _};

pub use catalog::{
    Brand, BrandInput, BrandPatch, Category, CategoryInput, CategoryPatch, Product, ProductInput,
    ProductPatch, Stock, StockInput, StockPatch,
};
pub use code::{Code, CodeInput, CodePatch, DiscountType};
pub use customer::{Customer, CustomerInput, CustomerPatch};
pub use order::{
    ORDER_STATUS_RANGE, Order, OrderInput, OrderItem, OrderItemInput, OrderItemPatch, OrderPatch,
};
pub use store::{Staff, StaffInput, StaffPatch, Store, StoreInput, StorePatch};
pub use user::{Login, NewUser, Registration, User, UserPatch};

/// Deserialize a present key (including `null`) as `Some(..)`.
///
/// Use with `#[serde(default)]` so that an absent key stays `None`.
pub fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize a present key as `Some(..)`, rejecting an explicit `null`.
///
/// Use with `#[serde(default)]` on patch fields whose column cannot be
/// cleared.
pub fn non_null<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    match Option::<T>::deserialize(deserializer)? {
        Some(value) => Ok(Some(value)),
        None => Err(D::Error::custom(
            "null is not allowed for this field; omit it to leave it unchanged",
        )),
    }
}

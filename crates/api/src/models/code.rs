//! Discount codes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use retail_core::CodeId;

use super::{non_null, present};
use crate::db::SqlValue;

/// How `Code::discount` is applied to an order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Subtract `discount` from the total.
    Fixed,
    /// Subtract `discount` percent of the total.
    Percent,
}

impl DiscountType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Percent => "percent",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "percent" => Ok(Self::Percent),
            other => Err(format!("unknown discount type: {other}")),
        }
    }
}

impl TryFrom<String> for DiscountType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiscountType> for SqlValue {
    fn from(value: DiscountType) -> Self {
        Self::Text(Some(value.as_str().to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Code {
    pub code_id: CodeId,
    pub code_name: String,
    pub discount: Decimal,
    #[sqlx(try_from = "String")]
    pub discount_type: DiscountType,
    pub valid_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeInput {
    pub code_name: String,
    pub discount: Decimal,
    pub discount_type: DiscountType,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodePatch {
    #[serde(default, deserialize_with = "non_null")]
    pub code_name: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub discount: Option<Decimal>,
    #[serde(default, deserialize_with = "non_null")]
    pub discount_type: Option<DiscountType>,
    #[serde(default, deserialize_with = "present")]
    pub valid_until: Option<Option<NaiveDate>>,
}

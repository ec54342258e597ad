//! Pagination request/response pair shared by every list operation.

use serde::Serialize;
use thiserror::Error;

/// Page size applied when the caller omits `limit` or passes `0`.
pub const DEFAULT_LIMIT: u32 = 10;

/// Errors produced while validating raw pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListQueryError {
    #[error("invalid offset: {0}")]
    InvalidOffset(String),
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
}

/// A validated list request.
///
/// `offset` and `limit` are non-negative by construction. `limit` is always
/// the effective page size (the default has already been applied).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub offset: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            search: None,
        }
    }
}

impl ListQuery {
    /// Build a query from raw (string) request parameters.
    ///
    /// Empty strings are treated as absent. A blank search term is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ListQueryError` if `offset` or `limit` is not a non-negative integer.
    pub fn parse(
        offset: Option<&str>,
        limit: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self, ListQueryError> {
        let offset = match offset.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| ListQueryError::InvalidOffset(raw.to_owned()))?,
            None => 0,
        };

        let limit = match limit.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| ListQueryError::InvalidLimit(raw.to_owned()))?,
            None => 0,
        };

        Ok(Self::new(offset, limit, search))
    }

    /// Build a query from already-numeric parameters; `limit == 0` means default.
    #[must_use]
    pub fn new(offset: u32, limit: u32, search: Option<&str>) -> Self {
        Self {
            offset,
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        }
    }

    /// Set the search term.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self
    }
}

/// One page of a filtered listing.
///
/// `count` is the size of the full filtered set, independent of the page window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResult<T> {
    pub count: i64,
    pub items: Vec<T>,
}

//! Pagination parameters for gateway list endpoints.
//!
//! The gateway pages with an opaque cursor: callers pass the `start` of
//! the next page themselves. Nothing here loops over pages.

use serde::{Deserialize, Serialize};

use crate::request::QueryParams;

/// Query parameters shared by every list operation.
///
/// - `start` is sent only when non-empty
/// - `limit` is sent only when positive
/// - `asc` is sent as an empty-valued flag when true
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Opaque cursor where the page starts.
    #[serde(default)]
    pub start: String,
    /// Maximum number of items; zero or negative means server default.
    #[serde(default)]
    pub limit: i64,
    /// Sort ascending instead of descending.
    #[serde(default)]
    pub asc: bool,
}

impl ListOptions {
    /// Create options with the given values.
    #[must_use]
    pub fn new(start: impl Into<String>, limit: i64, asc: bool) -> Self {
        Self {
            start: start.into(),
            limit,
            asc,
        }
    }

    /// Set the cursor.
    #[must_use]
    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = start.into();
        self
    }

    /// Set the page size.
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Sort ascending.
    #[must_use]
    pub fn ascending(mut self) -> Self {
        self.asc = true;
        self
    }

    /// Append these options to `query`.
    pub fn apply(&self, query: &mut QueryParams) {
        if !self.start.is_empty() {
            query.add("start", self.start.as_str());
        }
        if self.limit > 0 {
            query.add("limit", self.limit.to_string());
        }
        if self.asc {
            query.add("asc", "");
        }
    }

    /// Build a fresh query holding only these options.
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        self.apply(&mut query);
        query
    }
}

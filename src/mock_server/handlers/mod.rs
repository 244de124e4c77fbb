//! HTTP request handlers for the mock server.
//!
//! Error responses carry a plain-text body, the way the gateway answers.

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;

use super::state::{MockError, MockState};

pub mod orgs;
pub mod projects;
pub mod remote_sources;
pub mod runs;
pub mod users;

pub use orgs::*;
pub use projects::*;
pub use remote_sources::*;
pub use runs::*;
pub use users::*;

/// State shared by all handlers.
pub type SharedState = Arc<RwLock<MockState>>;

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            MockError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            MockError::AlreadyExists(m) => (StatusCode::CONFLICT, m),
            MockError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
        };
        (status, message).into_response()
    }
}

/// Pagination parameters of list endpoints.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub start: String,
    pub limit: i64,
    pub asc: bool,
}

impl PageQuery {
    /// Read `start`, `limit` and `asc` from raw query pairs.
    ///
    /// `asc` counts as set whatever its value. An unparsable `limit` is a
    /// bad request.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, MockError> {
        let mut page = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "start" => page.start = value.clone(),
                "limit" => {
                    page.limit = value
                        .parse()
                        .map_err(|_| MockError::BadRequest(format!("invalid limit {value:?}")))?;
                }
                "asc" => page.asc = true,
                _ => {}
            }
        }
        Ok(page)
    }

    /// Select the requested page of key-sorted `items`.
    pub fn apply<T>(&self, items: Vec<(String, T)>) -> Vec<T> {
        super::state::paginate(items, &self.start, self.limit, self.asc)
    }
}

/// Collect every value of `key` from raw query pairs.
pub fn values_of(pairs: &[(String, String)], key: &str) -> Vec<String> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .collect()
}

//! Request descriptors for the gateway API.
//!
//! An [`ApiRequest`] is built per call, handed to
//! [`AgolaClient::execute`](crate::AgolaClient::execute) and consumed by it.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;

use crate::error::{AgolaError, Result};

/// Headers sent with every request unless the caller overrides them.
pub fn json_content() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Copy `extra` over `target`, replacing every value of each key present in `extra`.
pub(crate) fn overlay_headers(target: &mut HeaderMap, extra: &HeaderMap) {
    for name in extra.keys() {
        target.remove(name);
        for value in extra.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }
}

/// Join path segments under `/`.
///
/// Segments may themselves contain `/`. Empty and `.` segments are dropped
/// and `..` removes the previous segment, so the result never contains a
/// double slash or a trailing slash.
///
/// ```
/// use agolapi::join_path;
///
/// assert_eq!(join_path(["user", "", "projects"]), "/user/projects");
/// assert_eq!(join_path(["/projects", "org", "acme", "app"]), "/projects/org/acme/app");
/// ```
pub fn join_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parts: Vec<String> = Vec::new();
    for segment in segments {
        for part in segment.as_ref().split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                other => parts.push(other.to_string()),
            }
        }
    }
    format!("/{}", parts.join("/"))
}

/// Percent-encode a single identifier so it stays one path segment.
///
/// `.` and `..` are rejected: URL parsing resolves them even when
/// percent-encoded, which would address a different resource.
///
/// ```
/// use agolapi::escape_segment;
///
/// assert_eq!(escape_segment("org/acme").unwrap(), "org%2Facme");
/// assert!(escape_segment("..").is_err());
/// ```
pub fn escape_segment(segment: &str) -> Result<String> {
    if matches!(segment, "." | "..") {
        return Err(AgolaError::InvalidIdentifier(segment.to_string()));
    }
    Ok(urlencoding::encode(segment).into_owned())
}

/// Ordered query parameters.
///
/// Keys are encoded in sorted order; the values of a repeated key keep the
/// order in which they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `key`. An empty value still emits `key=`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Append every value of `values` under the same `key`.
    pub fn extend<I, S>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.add(key, value);
        }
        self
    }

    /// All values recorded for `key`.
    pub fn get(&self, key: &str) -> &[String] {
        self.params.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if `key` has at least one value.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Returns true if no parameter was added.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Encode as an `application/x-www-form-urlencoded` query string.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.params {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

/// A single request against the gateway API.
///
/// `path` is relative to the versioned API prefix. New requests carry the
/// [`json_content`] headers.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: QueryParams,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a request for `method` and `path`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            headers: json_content(),
            body: None,
        }
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Create a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Create a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Replace the query parameters.
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Set a header, replacing any previous value.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Overlay a set of headers; keys present in `headers` replace existing values.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        overlay_headers(&mut self.headers, &headers);
        self
    }

    /// Set the raw request body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `body` as JSON and use it as the request body.
    ///
    /// # Errors
    ///
    /// Returns [`AgolaError::Marshal`] if `body` cannot be serialized.
    pub fn with_json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(AgolaError::Marshal)?;
        Ok(self.with_body(bytes))
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path relative to the API prefix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The query parameters.
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// The caller headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The request body, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub(crate) fn into_parts(self) -> (Method, String, QueryParams, HeaderMap, Option<Vec<u8>>) {
        (self.method, self.path, self.query, self.headers, self.body)
    }
}

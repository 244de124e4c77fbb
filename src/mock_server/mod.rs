//! Mock Agola gateway for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Agola
//! gateway API for integration and end-to-end testing. Unlike wiremock which
//! mocks at the HTTP level per-test, this server maintains state across
//! requests, enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use agolapi::mock_server::MockServer;
//! use agolapi::{AgolaClient, CreateOrgRequest};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = AgolaClient::new(server.url(), "test-token").unwrap();
//!
//!     // Server comes with default fixtures
//!     let project = client.get_project("org/acme/site").await.unwrap();
//!     assert_eq!(project.data.name, "site");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures, MockRun};
pub use server::MockServer;
pub use state::{paginate, MockError, MockState};

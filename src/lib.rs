//! Agola gateway API client library.
//!
//! A Rust library for the Agola CI/CD gateway REST API. Every operation
//! goes through one request pipeline: build an authenticated request
//! under `/api/v1alpha`, classify the response by status, then decode
//! the JSON body into a typed result.
//!
//! # Quick Start
//!
//! ```no_run
//! use agolapi::{AgolaClient, CreateOrgRequest, ListOptions};
//!
//! #[tokio::main]
//! async fn main() -> agolapi::Result<()> {
//!     // Create client from environment variables
//!     let client = AgolaClient::from_env()?;
//!
//!     // First ten projects of the authenticated user, oldest first
//!     let page = client
//!         .get_current_user_projects(&ListOptions::default().limit(10).ascending())
//!         .await?;
//!     println!("Found {} projects", page.data.projects.len());
//!
//!     // Create an organization
//!     let org = client
//!         .create_org(&CreateOrgRequest { name: "acme".to_string() })
//!         .await?;
//!     println!("Created org {} ({})", org.data.name, org.status());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Results and errors
//!
//! Operations with a result body return [`ApiResponse<T>`], holding the
//! decoded `data` and the [`RawResponse`] (status and headers). Operations
//! without one return the [`RawResponse`] alone. Failures are
//! [`AgolaError`] values; those produced after the server answered keep
//! the response, see [`AgolaError::response`].
//!
//! The client never retries and never follows pagination on its own: list
//! operations take [`ListOptions`] and the caller drives the cursor.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `AGOLA_TOKEN` (required) - Your Agola API token
//! - `AGOLA_GATEWAY_URL` (optional) - Gateway URL (defaults to `http://localhost:8000`)

mod client;
mod error;
mod models;
mod pagination;
mod request;
mod response;
mod transport;

pub mod cli;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{AgolaClient, API_PREFIX};
pub use error::{AgolaError, Result};
pub use pagination::ListOptions;
pub use request::{escape_segment, join_path, json_content, ApiRequest, QueryParams};
pub use response::{ApiResponse, RawResponse};
pub use transport::Transport;

// Re-export output formatting
pub use output::PrettyPrint;

// Re-export models
pub use models::{
    // Owner scoping
    OwnerType,
    // Project types
    CreateProjectRequest,
    Project,
    ProjectsResponse,
    // User types
    CreateUserLaRequest,
    CreateUserLaResponse,
    CreateUserRequest,
    CreateUserTokenRequest,
    CreateUserTokenResponse,
    LinkedAccount,
    User,
    UserResponse,
    UsersResponse,
    // Run types
    RunFilter,
    RunPhase,
    RunResponse,
    RunResponseTask,
    RunResult,
    RunsResponse,
    RunsResponseItem,
    // Remote source types
    CreateRemoteSourceRequest,
    RemoteSource,
    RemoteSourceResponse,
    RemoteSourcesResponse,
    // Org types
    CreateOrgRequest,
    OrgResponse,
};

//! Mock Agola gateway server.
//!
//! Provides an axum-based HTTP server that simulates the gateway API under
//! `/api/v1alpha`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers::{self, SharedState};
use super::state::MockState;
use crate::API_PREFIX;

/// A mock Agola gateway for testing.
///
/// The server runs in the background and can be used to test the client
/// against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating an `AgolaClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new().with_current_user(&scenario.current_user);

        for user in scenario.users {
            state = state.with_user(user);
        }

        for org in scenario.orgs {
            state = state.with_org(org);
        }

        for rs in scenario.remote_sources {
            state = state.with_remote_source(rs);
        }

        for project in scenario.projects {
            state = state.with_project(project);
        }

        for run in scenario.runs {
            state = state.with_run(run);
        }

        state
    }

    /// Create the axum router with all routes.
    fn create_router(state: SharedState) -> Router {
        let api = Router::new()
            // Project routes
            .route("/project/:id", get(handlers::get_project))
            .route(
                "/user/projects",
                get(handlers::list_current_user_projects)
                    .put(handlers::create_current_user_project),
            )
            .route(
                "/user/:id/projects",
                get(handlers::list_user_projects).put(handlers::create_user_project),
            )
            .route(
                "/org/:id/projects",
                get(handlers::list_org_projects).put(handlers::create_org_project),
            )
            .route(
                "/projects/:id/:name",
                delete(handlers::delete_current_user_project),
            )
            .route(
                "/projects/:id/:name/:project",
                delete(handlers::delete_project),
            )
            .route("/projects/:id/reconfig", post(handlers::reconfig_project))
            // User routes
            .route("/user/:id", get(handlers::get_user))
            .route(
                "/users",
                get(handlers::list_users).put(handlers::create_user),
            )
            .route("/users/:id", delete(handlers::delete_user))
            .route(
                "/users/:id/linkedaccounts",
                put(handlers::create_linked_account),
            )
            .route(
                "/users/:id/linkedaccounts/:name",
                delete(handlers::delete_linked_account),
            )
            .route("/users/:id/tokens", put(handlers::create_token))
            // Run routes
            .route("/run/:id", get(handlers::get_run))
            .route("/runs", get(handlers::list_runs))
            // Remote source routes
            .route("/remotesource/:id", get(handlers::get_remote_source))
            .route(
                "/remotesources",
                get(handlers::list_remote_sources).put(handlers::create_remote_source),
            )
            .route("/remotesources/:id", delete(handlers::delete_remote_source))
            // Org routes
            .route("/orgs", put(handlers::create_org))
            .route("/orgs/:id", delete(handlers::delete_org))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_token,
            ));

        Router::new()
            .nest(API_PREFIX, api)
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Reject requests without the configured token, if one is configured.
async fn require_token(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let required = state.read().await.required_token.clone();

    if let Some(token) = required {
        let expected = format!("token {token}");
        let sent = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if sent != Some(expected.as_str()) {
            return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
        }
    }

    next.run(request).await
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

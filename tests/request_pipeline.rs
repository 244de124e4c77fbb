//! Request pipeline tests.
//!
//! Uses wiremock to check what the client puts on the wire and how it
//! classifies and decodes what comes back.

mod common;

use std::time::Duration;

use agolapi::{AgolaClient, AgolaError, ApiRequest, CreateOrgRequest, ListOptions, QueryParams};
use common::{client_for, CountingTransport, TEST_TOKEN};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// ============================================================================
// Request building
// ============================================================================

#[tokio::test]
async fn test_list_request_url_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1alpha/user/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "projects": [{"id": "p1", "name": "app"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let page = client
        .get_current_user_projects(&ListOptions::new("", 10, true))
        .await
        .unwrap();

    assert_eq!(page.data.projects.len(), 1);
    assert_eq!(page.status(), StatusCode::OK);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/api/v1alpha/user/projects");
    assert_eq!(requests[0].url.query(), Some("asc=&limit=10"));
}

#[tokio::test]
async fn test_empty_query_has_no_question_mark() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_ok!(client.get_users(&ListOptions::default()).await);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
    assert_eq!(requests[0].url.path(), "/api/v1alpha/users");
}

#[tokio::test]
async fn test_token_header_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("authorization", format!("token {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_ok!(client.get_remote_sources(&ListOptions::default()).await);
}

#[tokio::test]
async fn test_caller_header_overrides_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1alpha/users"))
        .and(header("authorization", "token other"))
        .and(header("x-trace", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = ApiRequest::get("/users")
        .with_header(AUTHORIZATION, HeaderValue::from_static("token other"))
        .with_header(HeaderName::from_static("x-trace"), HeaderValue::from_static("abc"));

    let resp: agolapi::ApiResponse<Vec<serde_json::Value>> =
        client.execute(request).await.unwrap();
    assert!(resp.data.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    let auth: Vec<_> = requests[0].headers.get_all("authorization").iter().collect();
    assert_eq!(auth.len(), 1);
}

#[tokio::test]
async fn test_json_body_and_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1alpha/orgs"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"name": "acme"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": "o1", "name": "acme"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let org = client
        .create_org(&CreateOrgRequest {
            name: "acme".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(org.data.id, "o1");
    assert_eq!(org.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_repeated_query_keys() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut query = QueryParams::new();
    query.add("b", "2").add("a", "x y").add("b", "1");
    let _: agolapi::ApiResponse<Vec<serde_json::Value>> = client
        .execute(ApiRequest::get("things").with_query(query))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/api/v1alpha/things");
    assert_eq!(requests[0].url.query(), Some("a=x+y&b=2&b=1"));
}

#[tokio::test]
async fn test_identifier_is_escaped_as_one_segment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1alpha/project/org%2Facme%2Fsite"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "p1", "name": "site"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let project = client.get_project("org/acme/site").await.unwrap();
    assert_eq!(project.data.name, "site");
}

#[tokio::test]
async fn test_base_url_trailing_slash_ignored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1alpha/orgs/acme"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AgolaClient::new(&format!("{}/", mock_server.uri()), TEST_TOKEN).unwrap();
    let resp = client.delete_org("acme").await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_malformed_base_url_fails_before_sending() {
    let transport = CountingTransport::default();
    let client = AgolaClient::new("not a url", TEST_TOKEN)
        .unwrap()
        .with_transport(transport.clone());

    let err = assert_err!(client.delete_org("acme").await);
    assert!(matches!(err, AgolaError::Url(_)));
    assert!(err.response().is_none());
    assert_eq!(transport.calls(), 0);
}

async fn put_json<B: serde::Serialize>(
    client: &AgolaClient,
    payload: &B,
) -> agolapi::Result<agolapi::ApiResponse<serde_json::Value>> {
    let request = ApiRequest::put("/orgs").with_json(payload)?;
    client.execute(request).await
}

#[tokio::test]
async fn test_unserializable_payload_is_never_sent() {
    use std::collections::HashMap;

    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let transport = CountingTransport::default();
    let client = client_for(&mock_server).with_transport(transport.clone());

    // JSON object keys must be strings
    let mut payload = HashMap::new();
    payload.insert((1u8, 2u8), 3u8);

    let err = assert_err!(put_json(&client, &payload).await);
    assert!(matches!(err, AgolaError::Marshal(_)));
    assert!(err.response().is_none());
    assert_eq!(transport.calls(), 0);

    // The same path works once the payload serializes
    assert_ok!(ApiRequest::put("/orgs").with_json(&serde_json::json!({"name": "acme"})));
}

#[tokio::test]
async fn test_dot_identifiers_are_rejected_before_sending() {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&mock_server)
        .await;

    let transport = CountingTransport::default();
    let client = client_for(&mock_server).with_transport(transport.clone());

    let err = assert_err!(client.delete_user_linked_account("alice", "..").await);
    assert!(matches!(err, AgolaError::InvalidIdentifier(ref id) if id == ".."));
    assert!(err.response().is_none());

    let err = assert_err!(client.delete_user(".").await);
    assert!(matches!(err, AgolaError::InvalidIdentifier(ref id) if id == "."));

    let err = assert_err!(client.delete_org_project("acme", "..").await);
    assert!(matches!(err, AgolaError::InvalidIdentifier(_)));

    assert_err!(client.delete_org("..").await);
    assert_err!(client.get_run(".").await);
    assert_err!(client.reconfig_project("..").await);

    assert_eq!(transport.calls(), 0);
}

// ============================================================================
// Response classification
// ============================================================================

#[tokio::test]
async fn test_error_body_is_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1alpha/orgs/acme"))
        .respond_with(ResponseTemplate::new(404).set_body_string("org not found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.delete_org("acme").await.unwrap_err();

    assert_eq!(err.to_string(), "org not found");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(err.response().is_some());
}

#[tokio::test]
async fn test_single_byte_body_uses_status_line() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_string("\n"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.delete_org("acme").await.unwrap_err();

    assert_eq!(err.to_string(), "404 Not Found");
}

#[tokio::test]
async fn test_empty_error_body_uses_status_line() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_run("r1").await.unwrap_err();

    assert_eq!(err.to_string(), "500 Internal Server Error");
    assert!(matches!(err, AgolaError::Api { .. }));
}

#[tokio::test]
async fn test_nonstandard_reason_phrase_in_status_line() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await.unwrap();
        socket
            .write_all(b"HTTP/1.1 599 Custom\r\ncontent-length: 1\r\nconnection: close\r\n\r\n\n")
            .await
            .unwrap();
    });

    let client = AgolaClient::new(&format!("http://{addr}"), TEST_TOKEN).unwrap();
    let err = client.get_run("r1").await.unwrap_err();

    assert_eq!(err.to_string(), "599 Custom");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(599));
}

#[tokio::test]
async fn test_json_error_body_kept_verbatim() {
    let mock_server = MockServer::start().await;
    let body = r#"{"message":"user alice already exists"}"#;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(409).set_body_string(body))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .create_user(&agolapi::CreateUserRequest {
            user_name: "alice".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), body);
    assert_eq!(err.status(), Some(StatusCode::CONFLICT));
}

#[tokio::test]
async fn test_redirect_status_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_user("u1").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_MODIFIED));
}

// ============================================================================
// Decoding
// ============================================================================

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_user("u1").await.unwrap_err();

    assert!(matches!(err, AgolaError::Decode { .. }));
    assert_eq!(err.status(), Some(StatusCode::OK));
}

#[tokio::test]
async fn test_empty_success_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_run("r1").await.unwrap_err();
    assert!(matches!(err, AgolaError::Decode { .. }));
}

#[tokio::test]
async fn test_unknown_fields_and_trailing_data_ignored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"id": "o1", "name": "acme", "visibility": "public"} {"ignored": true}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let org: agolapi::ApiResponse<agolapi::OrgResponse> =
        client.execute(ApiRequest::get("/orgs/acme")).await.unwrap();
    assert_eq!(org.data.name, "acme");
}

#[tokio::test]
async fn test_delete_ignores_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let resp = assert_ok!(client.delete_user("bob").await);
    assert!(resp.is_success());
}

/// Answers with the request body.
struct Echo;

impl Respond for Echo {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/json")
            .set_body_bytes(request.body.clone())
    }
}

#[tokio::test]
async fn test_payload_echo_decodes_to_equal_value() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1alpha/echo"))
        .respond_with(Echo)
        .mount(&mock_server)
        .await;

    let payload = agolapi::CreateProjectRequest {
        name: "site".to_string(),
        remote_source_name: "gitea".to_string(),
        repo_path: "acme/site".to_string(),
        skip_ssh_host_key_check: true,
    };

    let client = client_for(&mock_server);
    let request = ApiRequest::put("/echo").with_json(&payload).unwrap();
    let echoed: agolapi::ApiResponse<agolapi::CreateProjectRequest> =
        client.execute(request).await.unwrap();

    assert_eq!(echoed.data, payload);
}

// ============================================================================
// Timeouts, cancellation and concurrency
// ============================================================================

#[tokio::test]
async fn test_transport_timeout_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client.set_transport(
        reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap(),
    );

    let err = client.get_users(&ListOptions::default()).await.unwrap_err();
    assert!(err.is_timeout());
    assert!(err.response().is_none());
}

#[tokio::test]
async fn test_dropped_call_is_cancelled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let outcome = tokio::time::timeout(
        Duration::from_millis(100),
        client.get_users(&ListOptions::default()),
    )
    .await;

    assert!(outcome.is_err());
}

#[tokio::test]
async fn test_concurrent_calls_share_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1alpha/run/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "r1",
            "name": "build",
            "phase": "running"
        })))
        .expect(8)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.get_run("r1").await })
        })
        .collect();

    for handle in handles {
        let run = handle.await.unwrap().unwrap();
        assert_eq!(run.data.id, "r1");
    }
}

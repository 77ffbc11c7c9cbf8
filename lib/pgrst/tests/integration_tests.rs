//! Integration tests for `HyperClient` using wiremock.

use std::time::Duration;

use pgrst::{HttpClient, HttpClientExt, HyperClient, Method, Request};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Todo {
    id: u64,
    task: String,
}

fn url(server: &MockServer, path: &str) -> url::Url {
    url::Url::parse(&format!("{}{path}", server.uri())).expect("url")
}

#[tokio::test]
async fn test_get_request() {
    let mock_server = MockServer::start().await;

    let todos = vec![Todo {
        id: 1,
        task: "finish tutorial".to_string(),
    }];

    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&todos))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, url(&mock_server, "/todos"))
        .header("Accept", "application/json")
        .build();

    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
    assert_eq!(response.status(), 200);

    let body: Vec<Todo> = response.json().expect("json");
    assert_eq!(body, todos);
}

#[tokio::test]
async fn test_post_request_with_json_body() {
    let mock_server = MockServer::start().await;

    let input = Todo {
        id: 7,
        task: "water plants".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/todos"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Post, url(&mock_server, "/todos"))
        .json(&input)
        .expect("json body")
        .build();

    let response = client.execute(request).await.expect("response");

    assert_eq!(response.status(), 201);
    assert!(response.body().is_empty());
}

#[tokio::test]
async fn test_error_status_is_a_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "code": "42P01",
            "message": "relation \"public.nope\" does not exist"
        })))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let response = client
        .get(url(&mock_server, "/nope"), Default::default())
        .await
        .expect("response");

    assert!(!response.is_success());
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todos"))
        .and(query_param("done", "eq.false"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let response = client
        .get(
            url(&mock_server, "/todos?done=eq.false&limit=10"),
            Default::default(),
        )
        .await
        .expect("response");

    assert!(response.is_success());
}

#[tokio::test]
async fn test_patch_and_delete_verbs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(204).insert_header("Content-Range", "0-0/1"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();

    let patched = client
        .patch(
            url(&mock_server, "/todos?id=eq.1"),
            Default::default(),
            Some(bytes::Bytes::from_static(br#"{"done":true}"#)),
        )
        .await
        .expect("patch");
    assert_eq!(patched.status(), 204);
    assert_eq!(patched.header("content-range"), Some("0-0/1"));

    let deleted = client
        .delete(url(&mock_server, "/todos?id=eq.1"), Default::default())
        .await
        .expect("delete");
    assert_eq!(deleted.status(), 204);
}

#[tokio::test]
async fn test_default_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("User-Agent", pgrst::DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let response = client
        .get(url(&mock_server, "/"), Default::default())
        .await
        .expect("response");

    assert!(response.is_success());
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .timeout(Duration::from_millis(100))
        .build();

    let err = client
        .get(url(&mock_server, "/slow"), Default::default())
        .await
        .expect_err("should time out");

    assert!(err.is_timeout(), "Expected timeout, got: {err}");
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop a listener to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let client = HyperClient::new();
    let target = url::Url::parse(&format!("http://127.0.0.1:{port}/todos")).expect("url");

    let err = client
        .get(target, Default::default())
        .await
        .expect_err("nothing listens");

    assert!(err.is_connection(), "Expected connection error, got: {err}");
}

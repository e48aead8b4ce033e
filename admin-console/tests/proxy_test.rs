mod common;

use common::{TestApp, UNREACHABLE_BACKEND};
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

async fn only_request(backend: &MockServer) -> Request {
    let mut received = backend
        .received_requests()
        .await
        .expect("request recording is enabled");
    assert_eq!(received.len(), 1, "expected exactly one backend request");
    received.remove(0)
}

#[tokio::test]
async fn get_forwards_path_and_query_string() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/documents/"))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "d-1", "filename": "handbook.pdf"}
        ])))
        .expect(1)
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .get(app.proxy_url("documents/?limit=50&offset=10"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!([{"id": "d-1", "filename": "handbook.pdf"}]));

    let request = only_request(&backend).await;
    assert_eq!(request.url.query(), Some("limit=50&offset=10"));
}

#[tokio::test]
async fn backend_json_text_is_relayed_unchanged() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/chat/history"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"zeta":1,"answer":"a","nested":{"y":true,"b":null}}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .get(app.proxy_url("chat/history"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["content-type"], "application/json");
    assert_eq!(
        response.text().await.unwrap(),
        r#"{"zeta":1,"answer":"a","nested":{"y":true,"b":null}}"#
    );
}

#[tokio::test]
async fn inbound_json_key_order_reaches_backend() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "ok"})))
        .expect(1)
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    Client::new()
        .post(app.proxy_url("chat/query"))
        .header("content-type", "application/json")
        .body(r#"{ "top_k": 4, "query": "q" }"#)
        .send()
        .await
        .unwrap();

    let request = only_request(&backend).await;
    assert_eq!(request.body, br#"{"top_k":4,"query":"q"}"#);
}

#[tokio::test]
async fn oversized_body_is_rejected_before_forwarding() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&backend)
        .await;

    let app = TestApp::spawn_with_body_limit(&backend.uri(), 1024).await;

    let response = Client::new()
        .post(app.proxy_url("notes"))
        .header("content-type", "text/plain")
        .body("x".repeat(4096))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Backend request failed");
    backend.verify().await;
}

#[tokio::test]
async fn nested_wildcard_segments_are_joined() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/documents/d-1/chunks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"chunks": 3})))
        .expect(1)
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .get(app.proxy_url("documents/d-1/chunks"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let request = only_request(&backend).await;
    assert_eq!(request.url.query(), None);
}

#[tokio::test]
async fn authorization_is_the_only_inbound_header_forwarded() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "a@b.c"})))
        .expect(1)
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .get(app.proxy_url("users/me"))
        .header("authorization", "Bearer tok-123")
        .header("cookie", "session=abc")
        .header("x-forwarded-for", "10.0.0.1")
        .header("x-custom", "1")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);

    let request = only_request(&backend).await;
    assert_eq!(request.headers["authorization"], "Bearer tok-123");
    assert!(request.headers.get("cookie").is_none());
    assert!(request.headers.get("x-forwarded-for").is_none());
    assert!(request.headers.get("x-custom").is_none());
}

#[tokio::test]
async fn missing_authorization_is_not_invented() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/documents/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})))
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .get(app.proxy_url("documents/"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    let request = only_request(&backend).await;
    assert!(request.headers.get("authorization").is_none());
}

#[tokio::test]
async fn json_body_is_reserialized_with_json_content_type() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/query"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"query": "재택 근무 규정?", "top_k": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "주 2회 가능합니다.",
            "sources": []
        })))
        .expect(1)
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .post(app.proxy_url("chat/query?debug=1"))
        .header("content-type", "application/json; charset=utf-8")
        .body("{\n  \"query\": \"재택 근무 규정?\",\n  \"top_k\": 4\n}")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["answer"], "주 2회 가능합니다.");

    let request = only_request(&backend).await;
    // POST drops the query string
    assert_eq!(request.url.query(), None);
    assert!(!request.body.contains(&b'\n'));
}

#[tokio::test]
async fn multipart_body_passes_through_unmodified() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/documents/upload"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"task_id": "t-1"})))
        .expect(1)
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let content_type = "multipart/form-data; boundary=----relayBoundary7MA4YWxk";
    let mut body = Vec::new();
    body.extend_from_slice(b"------relayBoundary7MA4YWxk\r\n");
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"scan.bin\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(&[0x00, 0xff, 0xfe, 0x80, 0x7f]);
    body.extend_from_slice(b"\r\n------relayBoundary7MA4YWxk--\r\n");

    let response = Client::new()
        .post(app.proxy_url("documents/upload"))
        .header("authorization", "Bearer tok")
        .header("content-type", content_type)
        .body(body.clone())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 202);
    let accepted: serde_json::Value = response.json().await.unwrap();
    assert_eq!(accepted, json!({"task_id": "t-1"}));

    let request = only_request(&backend).await;
    assert_eq!(request.headers["content-type"], content_type);
    assert_eq!(request.body, body);
}

#[tokio::test]
async fn form_body_passes_through_as_text() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .post(app.proxy_url("auth/login"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("username=admin%40example.com&password=admin123")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let request = only_request(&backend).await;
    assert_eq!(request.body, b"username=admin%40example.com&password=admin123");
}

#[tokio::test]
async fn other_bodies_are_forwarded_as_text() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/notes"))
        .and(header("content-type", "text/plain;charset=UTF-8"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .post(app.proxy_url("notes"))
        .header("content-type", "text/csv")
        .body("a,b\n1,2\n")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let request = only_request(&backend).await;
    assert_eq!(request.body, b"a,b\n1,2\n");
}

#[tokio::test]
async fn backend_errors_pass_through_verbatim() {
    let backend = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/documents/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Document not found"})),
        )
        .expect(1)
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .delete(app.proxy_url("documents/missing?force=true"))
        .header("authorization", "Bearer tok")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"detail": "Document not found"}));

    let request = only_request(&backend).await;
    assert_eq!(request.url.query(), None);
    assert!(request.body.is_empty());
}

#[tokio::test]
async fn empty_backend_body_relays_as_null() {
    let backend = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/documents/d-9"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .delete(app.proxy_url("documents/d-9"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 204);
}

#[tokio::test]
async fn unreachable_backend_yields_502_envelope() {
    let app = TestApp::spawn(UNREACHABLE_BACKEND).await;

    let response = Client::new()
        .get(app.proxy_url("documents/"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Backend request failed");
    assert!(body["detail"].as_str().is_some_and(|detail| !detail.is_empty()));
}

#[tokio::test]
async fn non_json_backend_body_yields_502_envelope() {
    let backend = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/documents/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .get(app.proxy_url("documents/"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Backend request failed");
}

#[tokio::test]
async fn malformed_inbound_json_never_reaches_backend() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .post(app.proxy_url("chat/query"))
        .header("content-type", "application/json")
        .body("{\"query\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Backend request failed");
}

#[tokio::test]
async fn unsupported_verbs_are_rejected() {
    let backend = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend)
        .await;

    let app = TestApp::spawn(&backend.uri()).await;

    let response = Client::new()
        .put(app.proxy_url("documents/d-1"))
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 405);
}

//! Failure injection: every gateway-level failure becomes the same 500 envelope.

use std::time::{Duration, Instant};

use serde_json::Value;

mod common;

async fn envelope(res: reqwest::Response) -> Value {
    assert_eq!(res.status(), 500);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Internal server error");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    assert_eq!(body.as_object().unwrap().len(), 2);
    body
}

#[tokio::test]
async fn test_connection_refused() {
    let dead = common::closed_port().await;
    let gateway = common::start_gateway(common::gateway_config(format!("http://{}", dead))).await;

    let res = common::client()
        .get(gateway.url("/api/templates/42"))
        .send()
        .await
        .expect("Gateway unreachable");
    let body = envelope(res).await;

    let failures = gateway.sink.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].error.kind(), "backend_unreachable");
    assert_eq!(failures[0].resource, "templates");
    assert_eq!(failures[0].url.as_deref(), Some(format!("http://{}/api/templates/42", dead).as_str()));
    assert_eq!(body["message"], failures[0].error.to_string());
}

#[tokio::test]
async fn test_non_json_backend_body() {
    let (backend_addr, _) = common::start_json_backend(200, "<html>oops</html>").await;
    let gateway = common::start_gateway(common::gateway_config(format!("http://{}", backend_addr))).await;

    let res = common::client()
        .get(gateway.url("/api/custom-variables?search=x"))
        .send()
        .await
        .unwrap();
    envelope(res).await;

    let failures = gateway.sink.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].error.kind(), "malformed_backend_response");
}

#[tokio::test]
async fn test_non_json_error_body_collapses_too() {
    let (backend_addr, _) = common::start_json_backend(502, "Bad Gateway").await;
    let gateway = common::start_gateway(common::gateway_config(format!("http://{}", backend_addr))).await;

    let res = common::client()
        .get(gateway.url("/api/templates/1"))
        .send()
        .await
        .unwrap();
    envelope(res).await;
}

#[tokio::test]
async fn test_empty_body_with_content_status() {
    let (backend_addr, _) = common::start_json_backend(200, "").await;
    let gateway = common::start_gateway(common::gateway_config(format!("http://{}", backend_addr))).await;

    let res = common::client()
        .get(gateway.url("/api/templates/7"))
        .send()
        .await
        .unwrap();
    let body = envelope(res).await;

    let failures = gateway.sink.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].error.kind(), "malformed_backend_response");
    assert!(body["message"].as_str().unwrap().contains("empty body"));
}

#[tokio::test]
async fn test_truncated_backend_body() {
    let backend_addr = common::start_raw_backend(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\nConnection: close\r\n\r\n{\"id\":",
    )
    .await;
    let gateway = common::start_gateway(common::gateway_config(format!("http://{}", backend_addr))).await;

    let res = common::client()
        .get(gateway.url("/api/templates/1"))
        .send()
        .await
        .unwrap();
    envelope(res).await;

    assert_eq!(gateway.sink.failures().len(), 1);
}

#[tokio::test]
async fn test_backend_timeout() {
    let (backend_addr, _) = common::start_backend(|_| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        (200, r#"{"late":true}"#.to_string())
    })
    .await;
    let mut config = common::gateway_config(format!("http://{}", backend_addr));
    config.backend.timeout_secs = 1;
    let gateway = common::start_gateway(config).await;

    let start = Instant::now();
    let res = common::client()
        .get(gateway.url("/api/templates/1"))
        .send()
        .await
        .unwrap();
    envelope(res).await;

    assert!(start.elapsed() < Duration::from_secs(4), "timeout should cut the call short");
    let failures = gateway.sink.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].error.kind(), "backend_timeout");
}

#[tokio::test]
async fn test_invalid_inbound_json_not_forwarded() {
    let (backend_addr, recorder) = common::start_json_backend(200, "{}").await;
    let gateway = common::start_gateway(common::gateway_config(format!("http://{}", backend_addr))).await;

    let res = common::client()
        .post(gateway.url("/api/templates/1"))
        .header("content-type", "application/json")
        .header("x-request-id", "client-req-7")
        .body("{\"name\":")
        .send()
        .await
        .unwrap();
    envelope(res).await;

    assert!(recorder.requests().is_empty());
    let failures = gateway.sink.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].error.kind(), "invalid_request_body");
    assert_eq!(failures[0].request_id.as_deref(), Some("client-req-7"));
    assert_eq!(failures[0].url, None);
}

#[tokio::test]
async fn test_invalid_body_ignored_when_not_forwardable() {
    let (backend_addr, recorder) = common::start_json_backend(200, r#"{"ok":true}"#).await;
    let gateway = common::start_gateway(common::gateway_config(format!("http://{}", backend_addr))).await;

    let res = common::client()
        .patch(gateway.url("/api/templates/1"))
        .body("not json at all")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert!(recorder.single().body.is_empty());
    assert!(gateway.sink.failures().is_empty());
}

#[tokio::test]
async fn test_gateway_never_answers_2xx_on_failure() {
    let dead = common::closed_port().await;
    let gateway = common::start_gateway(common::gateway_config(format!("http://{}", dead))).await;
    let client = common::client();

    for path in ["/api/templates/1", "/api/custom-variables", "/api/custom-variables/2"] {
        for method in [reqwest::Method::GET, reqwest::Method::POST, reqwest::Method::PUT, reqwest::Method::DELETE] {
            let res = client
                .request(method, gateway.url(path))
                .json(&serde_json::json!({"k": "v"}))
                .send()
                .await
                .unwrap();
            assert!(!res.status().is_success());
            envelope(res).await;
        }
    }
    assert_eq!(gateway.sink.failures().len(), 12);
}

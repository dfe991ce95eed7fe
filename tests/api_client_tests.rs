/// Integration tests for the API client against a mock backend
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde_json::json;
use timeglass_dashboard::{
    api::{ApiClient, RequestOptions},
    error::ApiError,
};
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn record(id: &str) -> serde_json::Value {
    json!({
        "request_id": id,
        "start_time": "2024-01-15T10:30:00",
        "method": "GET",
        "path": "/health",
        "status_code": 200,
        "duration_ms": 12.5,
        "cpu_usage_percent": 3.0,
        "memory_usage_percent": 40.0
    })
}

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_get_stats_sends_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_requests": 1200,
            "avg_duration_ms": 45.2,
            "avg_cpu_percent": 33.1,
            "avg_memory_percent": 61.7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let stats = api.get_stats().await.unwrap();
    assert_eq!(stats.total_requests, 1200);
    assert_eq!(stats.avg_duration_ms, Some(45.2));
}

#[tokio::test]
async fn test_get_requests_passes_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/requests"))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "0"))
        .and(query_param("path_contains", "/api users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([record("a")])))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(server.uri());
    let records = api
        .get_requests(&params(&[
            ("limit", "50"),
            ("offset", "0"),
            ("path_contains", "/api users"),
        ]))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].request_id, "a");
}

#[tokio::test]
async fn test_get_requests_accepts_both_envelopes() {
    let bare_server = MockServer::start().await;
    Mock::given(path("/api/requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([record("a"), record("b")])))
        .mount(&bare_server)
        .await;

    let wrapped_server = MockServer::start().await;
    Mock::given(path("/api/requests"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [record("a"), record("b")] })),
        )
        .mount(&wrapped_server)
        .await;

    let bare = ApiClient::new(bare_server.uri()).get_requests(&[]).await.unwrap();
    let wrapped = ApiClient::new(wrapped_server.uri())
        .get_requests(&[])
        .await
        .unwrap();
    assert_eq!(bare, wrapped);
}

#[tokio::test]
async fn test_non_success_status_becomes_status_error() {
    let server = MockServer::start().await;
    Mock::given(path("/api/stats"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "Failed to retrieve statistics"})),
        )
        .mount(&server)
        .await;

    let err = ApiClient::new(server.uri()).get_stats().await.unwrap_err();
    match err {
        ApiError::Status { status, status_text } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(status_text, "Internal Server Error");
        }
        other => panic!("Expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_becomes_decode_error() {
    let server = MockServer::start().await;
    Mock::given(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = ApiClient::new(server.uri()).get_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { ref endpoint, .. } if endpoint == "/api/stats"));
}

#[tokio::test]
async fn test_connection_failure_becomes_transport_error() {
    // Nothing listens on port 9 on the test host
    let err = ApiClient::new("http://127.0.0.1:9").get_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_request_overrides_method_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/echo"))
        .and(header("content-type", "application/vnd.custom+json"))
        .and(header("x-trace", "1"))
        .and(body_json(json!({"hello": "world"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/vnd.custom+json"),
    );
    headers.insert("x-trace", HeaderValue::from_static("1"));

    let value: serde_json::Value = ApiClient::new(server.uri())
        .request(
            "/api/echo",
            RequestOptions {
                method: Some(Method::POST),
                headers,
                body: Some(json!({"hello": "world"})),
            },
        )
        .await
        .unwrap();
    assert_eq!(value, json!({"ok": true}));
}

#[tokio::test]
async fn test_system_metrics_is_passthrough() {
    let server = MockServer::start().await;
    let payload = json!([{ "timestamp": "2024-01-15T10:30:00", "cpu_usage_percent": 12.5, "cpu_count": 8 }]);
    Mock::given(path("/api/system-metrics"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let value = ApiClient::new(server.uri())
        .get_system_metrics(&params(&[("limit", "5")]))
        .await
        .unwrap();
    assert_eq!(value, payload);
}

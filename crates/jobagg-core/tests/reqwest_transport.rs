// Integration tests for the reqwest transport against a local mock server.

use std::sync::Arc;
use std::time::Duration;

use jobagg_core::{
    Error, HttpRequest, HttpTransport, HttpUrlChecker, ReqwestTransport, UrlChecker,
    ValidationError,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(timeout: Duration) -> ReqwestTransport {
    ReqwestTransport::new(timeout, "jobagg-tests").unwrap()
}

#[tokio::test]
async fn get_sends_query_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/vacancies/"))
        .and(query_param("keyword", "rust developer"))
        .and(query_param("count", "5"))
        .and(header("x-api-app-id", "secret"))
        .and(header("user-agent", "jobagg-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"objects": []}"#))
        .mount(&server)
        .await;

    let request = HttpRequest::get(format!("{}/2.0/vacancies/", server.uri()))
        .with_query("keyword", "rust developer")
        .with_query("count", 5)
        .with_header("X-Api-App-Id", "secret");

    let response = transport(Duration::from_secs(5)).get(&request).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, r#"{"objects": []}"#);
}

#[tokio::test]
async fn get_returns_non_success_status_as_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vacancies"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let request = HttpRequest::get(format!("{}/vacancies", server.uri()));
    let response = transport(Duration::from_secs(5)).get(&request).await.unwrap();
    assert_eq!(response.status, 403);
    assert_eq!(response.body, "forbidden");
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let request = HttpRequest::get(server.uri());
    let err = transport(Duration::from_millis(100))
        .get(&request)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn url_checker_uses_status_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vacancy/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/vacancy/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let checker = HttpUrlChecker::new(Arc::new(transport(Duration::from_secs(5))));

    assert!(checker.check(&format!("{}/vacancy/1", server.uri())).await.is_ok());

    let err = checker
        .check(&format!("{}/vacancy/2", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ValidationError::UnreachableUrl { status: 404, .. }));
}

//! Integration tests for the reqwest adapter
//!
//! Each test serves an axum router on a local port and drives
//! `ReqwestHttpClient` through the execute-request use case, then checks
//! the recorded outcome.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::routing::{any, get, post};
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;
use url::Url;
use witness_application::{ExecuteRequest, RecorderConfig, ResponseRecorder};
use witness_domain::{FailureKind, HttpMethod, Request, ResponseBody};
use witness_infrastructure::{ClientConfig, ReqwestHttpClient, init_tracing};

/// Serves `router` on an ephemeral port and returns its base URL.
async fn serve(router: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    Url::parse(&format!("http://{addr}/")).unwrap()
}

fn redirect_app() -> Router {
    Router::new()
        .route("/a", get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/b")], "moved") }))
        .route("/b", get(|| async { ([(header::CONTENT_TYPE, "text/plain")], "B") }))
        .route(
            "/form",
            post(|| async { (StatusCode::SEE_OTHER, [(header::LOCATION, "/result")]) }),
        )
        .route("/result", any(echo_method))
        .route("/loop", get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/loop")]) }))
        .route(
            "/old",
            get(|| async { (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "/x")], "gone") }),
        )
        .route("/trace", get(echo_trace))
}

async fn echo_method(method: Method, body: String) -> String {
    format!("{method} {}", body.len())
}

async fn echo_trace(headers: HeaderMap) -> String {
    headers
        .get_all("x-trace")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join(",")
}

fn use_case(config: ClientConfig) -> ExecuteRequest<ReqwestHttpClient> {
    init_tracing();
    ExecuteRequest::new(Arc::new(ReqwestHttpClient::with_config(config).unwrap()))
}

fn recorder() -> Arc<ResponseRecorder> {
    Arc::new(ResponseRecorder::with_config(
        RecorderConfig::default().with_await_timeout(Duration::from_secs(5)),
    ))
}

#[tokio::test]
async fn test_redirect_is_recorded_as_prior_response() {
    let base = serve(redirect_app()).await;
    let recorder = recorder();

    use_case(ClientConfig::default())
        .enqueue(Request::get(base.join("/a").unwrap()), recorder.clone());

    let recorded = recorder.await_response(&base.join("/a").unwrap()).await;
    recorded
        .assert_request_url(&base.join("/b").unwrap())
        .assert_code(200)
        .assert_header("Content-Type", &["text/plain"])
        .assert_body("B");
    assert!(recorded.response().unwrap().handshake.is_none());

    let prior = recorded.prior_response();
    prior
        .assert_request_url(&base.join("/a").unwrap())
        .assert_code(302)
        .assert_header("Location", &["/b"]);
    assert_eq!(prior.body(), None);
    assert_eq!(prior.failure(), None);
}

#[tokio::test]
async fn test_see_other_switches_post_to_get() {
    let base = serve(redirect_app()).await;

    let request = Request::new(HttpMethod::Post, base.join("/form").unwrap())
        .with_header("Content-Type", "text/plain")
        .with_body("payload");
    let response = use_case(ClientConfig::default())
        .execute(&request)
        .await
        .unwrap();

    assert_eq!(response.request.method, HttpMethod::Get);
    assert_eq!(response.request.body, None);
    assert_eq!(
        response.body.as_ref().map(ResponseBody::string),
        Some("GET 0".to_string())
    );
    assert_eq!(
        response.prior_response().map(|p| p.request.method),
        Some(HttpMethod::Post)
    );
}

#[tokio::test]
async fn test_request_headers_are_sent_in_order() {
    let base = serve(redirect_app()).await;
    let recorder = recorder();
    let request = Request::get(base.join("/trace").unwrap())
        .with_header("X-Trace", "a")
        .with_header("X-Trace", "b");

    use_case(ClientConfig::default()).enqueue(request, recorder.clone());

    recorder
        .await_response(&base.join("/trace").unwrap())
        .await
        .assert_request_header("X-Trace", &["a", "b"])
        .assert_body("a,b");
}

#[tokio::test]
async fn test_redirect_limit_is_a_failure() {
    let base = serve(redirect_app()).await;
    let recorder = recorder();

    use_case(ClientConfig::default().with_max_redirects(3))
        .enqueue(Request::get(base.join("/loop").unwrap()), recorder.clone());

    let recorded = recorder.await_response(&base.join("/loop").unwrap()).await;
    recorded.assert_failure("too many follow-up requests: 3");
    assert_eq!(
        recorded.failure().map(|f| f.kind),
        Some(FailureKind::TooManyRedirects)
    );
}

#[tokio::test]
async fn test_redirects_not_followed_when_disabled() {
    let base = serve(redirect_app()).await;
    let recorder = recorder();

    use_case(ClientConfig::default().with_follow_redirects(false))
        .enqueue(Request::get(base.join("/old").unwrap()), recorder.clone());

    let recorded = recorder.await_response(&base.join("/old").unwrap()).await;
    recorded
        .assert_code(301)
        .assert_header("Location", &["/x"])
        .assert_body("gone");
    assert_eq!(recorded.response().unwrap().redirect_chain_len(), 0);
}

#[tokio::test]
async fn test_malformed_header_is_rejected_before_sending() {
    let request = Request::get(Url::parse("http://127.0.0.1:9/").unwrap())
        .with_header("Bad Name", "x");

    let failure = use_case(ClientConfig::default())
        .execute(&request)
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::InvalidRequest);
    assert_eq!(failure.message(), "invalid header name: Bad Name");
}

#[tokio::test]
async fn test_connection_refused_is_a_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{addr}/")).unwrap();
    let failure = use_case(ClientConfig::default().with_timeout(Duration::from_secs(5)))
        .execute(&Request::get(url.clone()))
        .await
        .unwrap_err();

    assert!(
        matches!(
            failure.kind,
            FailureKind::ConnectionRefused | FailureKind::ConnectionFailed
        ),
        "unexpected failure kind {:?}: {}",
        failure.kind,
        failure.message()
    );
    assert_eq!(failure.request.url, url);
}

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use snip_gateway::model::{AnalyticsResponse, ShortenResponse};
use snip_gateway::{App, AppState};
use snip_generator::HashGenerator;
use snip_storage::InMemoryRepository;
use tower::ServiceExt;

const BASE_URL: &str = "http://sn.ip";

fn router() -> Router {
    router_with(AppState::from_store(
        Arc::new(InMemoryRepository::new()),
        HashGenerator::new(),
        0,
        BASE_URL,
    ))
}

fn router_with(state: AppState) -> Router {
    App::router(state)
}

fn peer() -> ConnectInfo<SocketAddr> {
    ConnectInfo(SocketAddr::from(([203, 0, 113, 7], 40000)))
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn shorten(router: &Router, body: Value) -> Response {
    send(
        router,
        Request::post("/shorten")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn visit(router: &Router, path: &str) -> Response {
    let mut request = Request::get(path).body(Body::empty()).unwrap();
    request.extensions_mut().insert(peer());
    send(router, request).await
}

async fn analytics(router: &Router, code: &str) -> Response {
    send(
        router,
        Request::get(format!("/analytics/{code}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

fn code_of(short_url: &str) -> &str {
    short_url.rsplit('/').next().unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let response = send(&router(), Request::get("/health").body(Body::empty()).unwrap()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn shorten_then_redirect_then_count() {
    let router = router();

    let response = shorten(
        &router,
        json!({ "original_url": "https://example.com/a", "expires_in_hours": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created: ShortenResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(created.original_url, "https://example.com/a");
    assert_eq!(created.short_url, "http://sn.ip/2dce0a");

    let response = visit(&router, "/2dce0a").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.com/a"
    );

    let response = analytics(&router, "2dce0a").await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats: AnalyticsResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(stats.short_code, "2dce0a");
    assert_eq!(stats.short_url, "http://sn.ip/2dce0a");
    assert_eq!(stats.access_count, 1);
    assert_eq!(stats.logs.len(), 1);
    assert_eq!(stats.logs[0].ip_address, "203.0.113.7");
}

#[tokio::test]
async fn default_expiry_is_a_day() {
    let router = router();

    let response = shorten(&router, json!({ "original_url": "https://example.com/a" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let created: ShortenResponse = serde_json::from_value(body_json(response).await).unwrap();

    let remaining = jiff::Timestamp::now().duration_until(created.expires_at);
    assert!(remaining > jiff::SignedDuration::from_hours(23));
    assert!(remaining <= jiff::SignedDuration::from_hours(24));
}

#[tokio::test]
async fn shortening_the_same_url_twice_is_rejected() {
    let router = router();
    let body = json!({ "original_url": "https://example.com/a", "expires_in_hours": 1 });

    assert_eq!(shorten(&router, body.clone()).await.status(), StatusCode::OK);

    let response = shorten(
        &router,
        json!({ "original_url": "https://example.com/a", "expires_in_hours": 48 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["error"], "duplicate_code");

    // the first link still redirects
    assert_eq!(visit(&router, "/2dce0a").await.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn already_expired_link_is_gone_and_not_logged() {
    let router = router();

    let response = shorten(
        &router,
        json!({ "original_url": "https://example.com/old", "expires_in_hours": -1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created: ShortenResponse = serde_json::from_value(body_json(response).await).unwrap();
    let code = code_of(&created.short_url).to_string();

    let response = visit(&router, &format!("/{code}")).await;
    assert_eq!(response.status(), StatusCode::GONE);
    assert_eq!(body_json(response).await["error"], "expired");

    let stats: AnalyticsResponse =
        serde_json::from_value(body_json(analytics(&router, &code).await).await).unwrap();
    assert_eq!(stats.access_count, 0);
    assert!(stats.logs.is_empty());
}

#[tokio::test]
async fn unknown_codes_are_not_found() {
    let router = router();

    let response = visit(&router, "/doesnotexist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "not_found");

    assert_eq!(
        analytics(&router, "doesnotexist").await.status(),
        StatusCode::NOT_FOUND
    );
    // not even a well-formed code
    assert_eq!(visit(&router, "/a.b").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_input_is_a_bad_request() {
    let router = router();

    for body in [
        json!({ "original_url": "not-a-valid-url" }),
        json!({ "original_url": "ftp://example.com/file" }),
        json!({ "original_url": "https://example.com", "expires_in_hours": i64::MAX }),
        json!({ "expires_in_hours": 1 }),
        json!({ "original_url": "https://example.com", "expires_in_hours": "soon" }),
    ] {
        let response = shorten(&router, body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body_json(response).await["error"], "bad_request", "{body}");
    }
}

#[tokio::test]
async fn protected_link_needs_its_password() {
    let router = router();

    let response = shorten(
        &router,
        json!({ "original_url": "https://example.com/secret", "password": "hunter2" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created: ShortenResponse = serde_json::from_value(body_json(response).await).unwrap();
    let code = code_of(&created.short_url).to_string();

    let response = visit(&router, &format!("/{code}")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "unauthorized");

    let response = visit(&router, &format!("/{code}?password=hunter3")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = visit(&router, &format!("/{code}?password=hunter2")).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let mut request = Request::get(format!("/{code}"))
        .header("x-link-password", "hunter2")
        .body(Body::empty())
        .unwrap();
    request.extensions_mut().insert(peer());
    assert_eq!(send(&router, request).await.status(), StatusCode::FOUND);

    let stats: AnalyticsResponse =
        serde_json::from_value(body_json(analytics(&router, &code).await).await).unwrap();
    assert_eq!(stats.access_count, 2);
}

#[tokio::test]
async fn forwarded_for_is_used_only_when_trusted() {
    for (trust, expected) in [(false, "203.0.113.7"), (true, "198.51.100.23")] {
        let state = AppState::from_store(
            Arc::new(InMemoryRepository::new()),
            HashGenerator::new(),
            0,
            BASE_URL,
        )
        .with_trust_forwarded_for(trust);
        let router = router_with(state);

        shorten(&router, json!({ "original_url": "https://example.com/a" })).await;

        let mut request = Request::get("/2dce0a")
            .header("x-forwarded-for", "198.51.100.23, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(peer());
        assert_eq!(send(&router, request).await.status(), StatusCode::FOUND);

        let stats: AnalyticsResponse =
            serde_json::from_value(body_json(analytics(&router, "2dce0a").await).await).unwrap();
        assert_eq!(stats.logs[0].ip_address, expected);
    }
}

#[tokio::test]
async fn missing_peer_address_is_logged_as_unknown() {
    let router = router();
    shorten(&router, json!({ "original_url": "https://example.com/a" })).await;

    let response = send(&router, Request::get("/2dce0a").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let stats: AnalyticsResponse =
        serde_json::from_value(body_json(analytics(&router, "2dce0a").await).await).unwrap();
    assert_eq!(stats.logs[0].ip_address, "unknown");
}

#[tokio::test]
async fn forwarded_for_that_is_not_an_address_falls_back_to_peer() {
    let state = AppState::from_store(
        Arc::new(InMemoryRepository::new()),
        HashGenerator::new(),
        0,
        BASE_URL,
    )
    .with_trust_forwarded_for(true);
    let router = router_with(state);
    shorten(&router, json!({ "original_url": "https://example.com/a" })).await;

    let mut request = Request::get("/2dce0a")
        .header("x-forwarded-for", "x".repeat(80))
        .body(Body::empty())
        .unwrap();
    request.extensions_mut().insert(peer());
    assert_eq!(send(&router, request).await.status(), StatusCode::FOUND);

    let stats: AnalyticsResponse =
        serde_json::from_value(body_json(analytics(&router, "2dce0a").await).await).unwrap();
    assert_eq!(stats.logs[0].ip_address, "203.0.113.7");
}

#[tokio::test]
async fn expires_in_is_accepted_as_an_alias() {
    let router = router();

    let response = shorten(
        &router,
        json!({ "original_url": "https://example.com/old", "expires_in": -1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created: ShortenResponse = serde_json::from_value(body_json(response).await).unwrap();

    let response = visit(&router, &format!("/{}", code_of(&created.short_url))).await;
    assert_eq!(response.status(), StatusCode::GONE);
}

#[tokio::test]
async fn malformed_query_does_not_hide_the_lookup_result() {
    let router = router();
    shorten(&router, json!({ "original_url": "https://example.com/a" })).await;

    let response = visit(&router, "/doesnotexist?password=a&password=b").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "not_found");

    let response = visit(&router, "/2dce0a?password=a&password=b").await;
    assert_eq!(response.status(), StatusCode::FOUND);
}

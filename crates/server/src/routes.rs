use std::time::Duration;

use axum::http::{header, HeaderName, Method};
use axum::routing::{any, get};
use axum::{Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::dispatch::{self, AppState, USER_ID_HEADER};

const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
        .max_age(CORS_MAX_AGE)
}

/// Dispatch endpoint at `/` and `/api`, plus the liveness probe.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(dispatch::dispatch))
        .route("/api", any(dispatch::dispatch))
        .route("/health", get(health))
        .with_state(state)
        .layer(build_cors())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use configs::DatabaseConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn single_connection_pool() -> sea_orm::DatabaseConnection {
        let cfg = DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..DatabaseConfig::default()
        };
        models::db::connect_with_config(&cfg).await.expect("sqlite pool")
    }

    async fn app() -> Router {
        build_router(AppState::new(single_connection_pool().await, Duration::from_secs(5)))
    }

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let res = app.oneshot(req).await.expect("infallible");
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn unknown_endpoint_is_a_200_payload() {
        let req = Request::get("/api?endpoint=foo").body(Body::empty()).unwrap();
        let (status, body) = call(app().await, req).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Unknown endpoint");
    }

    #[tokio::test]
    async fn options_short_circuits_with_empty_body() {
        let req = Request::builder().method(Method::OPTIONS).uri("/").body(Body::empty()).unwrap();
        let (status, body) = call(app().await, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn other_methods_are_reported_in_payload() {
        let req = Request::builder().method(Method::DELETE).uri("/api").body(Body::empty()).unwrap();
        let (status, body) = call(app().await, req).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn unknown_action_and_malformed_body() {
        let req = Request::post("/").body(Body::empty()).unwrap();
        let (status, body) = call(app().await, req).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Unknown action");

        let req = Request::post("/").body(Body::from("{oops")).unwrap();
        let (status, body) = call(app().await, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("malformed JSON"));
    }

    #[tokio::test]
    async fn preflight_carries_cors_headers() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api")
            .header(header::ORIGIN, "https://ops.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-user-id")
            .body(Body::empty())
            .unwrap();
        let res = app().await.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let headers = res.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let req = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = call(app().await, req).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn stalled_store_call_reports_gateway_timeout() {
        use sea_orm::TransactionTrait;

        let db = single_connection_pool().await;
        // occupy the only pooled connection so the next query waits for it
        let held = db.begin().await.expect("hold connection");
        let app = build_router(AppState::new(db.clone(), Duration::from_millis(1)));

        let req = Request::get("/api?endpoint=users").body(Body::empty()).unwrap();
        let (status, body) = call(app, req).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("timed out"));

        held.rollback().await.expect("release connection");
    }
}

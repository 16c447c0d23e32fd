//! Axum router configuration with middleware.
//!
//! API routes live under `/api/v1/`. Middleware: CORS, tracing.
//!
//! The CORS layer answers every `OPTIONS` request as a preflight with an
//! empty 200 and stamps `Access-Control-Allow-Origin: *` on all other
//! responses, errors included. Known routes hit with any other unsupported
//! method return 405.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// How long browsers may cache a preflight answer.
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(PREFLIGHT_MAX_AGE);

    let api_routes = Router::new()
        // Completion relay
        .route(
            "/completion",
            post(handlers::completion::complete).fallback(handlers::method_not_allowed),
        )
        // History store
        .route(
            "/history",
            get(handlers::history::list_messages)
                .post(handlers::history::append_message)
                .delete(handlers::history::clear_messages)
                .fallback(handlers::method_not_allowed),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{HeaderMap, Request, StatusCode};
    use palaver_core::relay::service::RelayService;
    use palaver_infra::sqlite::pool::DatabasePool;
    use palaver_infra::upstream::HttpUpstream;
    use palaver_types::config::UpstreamConfig;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ALLOW_ORIGIN: &str = "access-control-allow-origin";

    fn relay_for(server: &MockServer, timeout_secs: u64) -> RelayService<HttpUpstream> {
        let config = UpstreamConfig {
            url: Some(format!("{}/chat", server.uri())),
            api_key: None,
            timeout_secs,
        };
        RelayService::new(HttpUpstream::new(&config).unwrap())
    }

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn bare(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    // -- Health ------------------------------------------------------------

    #[tokio::test]
    async fn test_health_check() {
        let app = build_router(AppState::new(None, None));
        let (status, _, body) = send(app, bare("GET", "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    // -- Completion relay --------------------------------------------------

    #[tokio::test]
    async fn test_completion_returns_normalized_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"message": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"ai_response": {"content": "Hi there"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let app = build_router(AppState::new(Some(relay_for(&server, 5)), None));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/completion")
            .header("x-request-id", "req-7")
            .body(Body::from(r#"{"message": "hello"}"#))
            .unwrap();

        let (status, headers, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": "Hi there", "request_id": "req-7"}));
        assert_eq!(headers["x-request-id"], "req-7");
        assert_eq!(headers[ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_completion_without_response_key_stringifies_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"ai_response": {"content": "Hi there"}, "model": "m1"}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let app = build_router(AppState::new(Some(relay_for(&server, 5)), None));
        let (status, _, body) =
            send(app, post_json("/api/v1/completion", r#"{"message": "hello"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["response"],
            r#"{"ai_response": {"content": "Hi there"}, "model": "m1"}"#
        );
    }

    #[tokio::test]
    async fn test_completion_malformed_rich_reply_is_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {"ai_response": "not an object"}
            })))
            .mount(&server)
            .await;

        let app = build_router(AppState::new(Some(relay_for(&server, 5)), None));
        let (status, headers, body) =
            send(app, post_json("/api/v1/completion", r#"{"message": "hello"}"#)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("ai_response"));
        assert_eq!(headers[ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_completion_mints_request_id_when_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
            .mount(&server)
            .await;

        let app = build_router(AppState::new(Some(relay_for(&server, 5)), None));
        let (status, headers, body) =
            send(app, post_json("/api/v1/completion", r#"{"message": "x"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "ok");
        let request_id = body["request_id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(request_id).is_ok());
        assert_eq!(headers["x-request-id"], request_id);
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected_without_upstream_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "no"})))
            .expect(0)
            .mount(&server)
            .await;

        let app = build_router(AppState::new(Some(relay_for(&server, 5)), None));

        for body in [r#"{"message": "   "}"#, r#"{}"#, ""] {
            let (status, headers, reply) =
                send(app.clone(), post_json("/api/v1/completion", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body:?}");
            assert_eq!(reply, json!({"error": "Message is required"}));
            assert_eq!(headers[ALLOW_ORIGIN], "*");
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let server = MockServer::start().await;
        let app = build_router(AppState::new(Some(relay_for(&server, 5)), None));

        let (status, _, body) = send(app, post_json("/api/v1/completion", "{message:")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid JSON in request body"}));
    }

    #[tokio::test]
    async fn test_upstream_timeout_is_504_and_history_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let app = build_router(AppState::new(
            Some(relay_for(&server, 1)),
            Some(test_pool().await),
        ));

        let (status, headers, body) = send(
            app.clone(),
            post_json("/api/v1/completion", r#"{"message": "slow"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body, json!({"error": "AI API timeout"}));
        assert_eq!(headers[ALLOW_ORIGIN], "*");

        let (_, _, listing) = send(app, bare("GET", "/api/v1/history")).await;
        assert_eq!(listing, json!({"messages": []}));
    }

    #[tokio::test]
    async fn test_upstream_error_passes_status_and_details() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let app = build_router(AppState::new(Some(relay_for(&server, 5)), None));
        let (status, _, body) =
            send(app, post_json("/api/v1/completion", r#"{"message": "hi"}"#)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body,
            json!({"error": "AI API error: 503", "details": "maintenance"})
        );
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_502() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = UpstreamConfig {
            url: Some(format!("http://{addr}/chat")),
            api_key: None,
            timeout_secs: 5,
        };
        let relay = RelayService::new(HttpUpstream::new(&config).unwrap());
        let app = build_router(AppState::new(Some(relay), None));

        let (status, _, body) =
            send(app, post_json("/api/v1/completion", r#"{"message": "hi"}"#)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("AI API request failed")
        );
    }

    #[tokio::test]
    async fn test_unconfigured_relay_is_500() {
        let app = build_router(AppState::new(None, None));
        let (status, _, body) =
            send(app, post_json("/api/v1/completion", r#"{"message": "hi"}"#)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "upstream endpoint not configured"}));
    }

    #[tokio::test]
    async fn test_completion_rejects_other_methods() {
        let app = build_router(AppState::new(None, None));

        for verb in ["GET", "PUT", "DELETE", "PATCH"] {
            let (status, headers, body) =
                send(app.clone(), bare(verb, "/api/v1/completion")).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "method {verb}");
            assert_eq!(body, json!({"error": "Method not allowed"}));
            assert_eq!(headers[ALLOW_ORIGIN], "*");
        }
    }

    // -- History store -----------------------------------------------------

    #[tokio::test]
    async fn test_history_round_trip() {
        let app = build_router(AppState::new(None, Some(test_pool().await)));

        let (status, _, body) = send(app.clone(), bare("GET", "/api/v1/history")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"messages": []}));

        let (status, headers, first) = send(
            app.clone(),
            post_json("/api/v1/history", r#"{"role": "user", "content": "Hello"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(headers[ALLOW_ORIGIN], "*");
        assert!(first["id"].is_string());
        assert!(first["created_at"].is_string());

        let (status, _, second) = send(
            app.clone(),
            post_json(
                "/api/v1/history",
                r#"{"role": "assistant", "content": "Hi!"}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_ne!(first["id"], second["id"]);

        let (_, _, listing) = send(app.clone(), bare("GET", "/api/v1/history")).await;
        let messages = listing["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Hello");
        assert_eq!(messages[1]["id"], second["id"]);
        assert_eq!(messages[1]["timestamp"], second["created_at"]);

        let (status, _, body) = send(app.clone(), bare("DELETE", "/api/v1/history")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "cleared"}));

        let (_, _, listing) = send(app, bare("GET", "/api/v1/history")).await;
        assert_eq!(listing, json!({"messages": []}));
    }

    #[tokio::test]
    async fn test_history_clear_on_empty_store_succeeds() {
        let app = build_router(AppState::new(None, Some(test_pool().await)));
        let (status, _, body) = send(app, bare("DELETE", "/api/v1/history")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "cleared"}));
    }

    #[tokio::test]
    async fn test_history_append_requires_role_and_content() {
        let app = build_router(AppState::new(None, Some(test_pool().await)));

        for body in [
            r#"{"role": "user"}"#,
            r#"{"content": "orphan"}"#,
            r#"{"role": " ", "content": "x"}"#,
            "",
        ] {
            let (status, _, reply) = send(app.clone(), post_json("/api/v1/history", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body:?}");
            assert_eq!(reply, json!({"error": "Role and content required"}));
        }

        let (_, _, listing) = send(app, bare("GET", "/api/v1/history")).await;
        assert_eq!(listing, json!({"messages": []}));
    }

    #[tokio::test]
    async fn test_history_append_malformed_json() {
        let app = build_router(AppState::new(None, Some(test_pool().await)));
        let (status, _, body) = send(app, post_json("/api/v1/history", "not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid JSON in request body"}));
    }

    #[tokio::test]
    async fn test_history_without_database_is_500() {
        let app = build_router(AppState::new(None, None));

        for request in [
            bare("GET", "/api/v1/history"),
            post_json("/api/v1/history", r#"{"role": "user", "content": "hi"}"#),
            post_json("/api/v1/history", "not json"),
            bare("DELETE", "/api/v1/history"),
        ] {
            let (status, headers, body) = send(app.clone(), request).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, json!({"error": "Database not configured"}));
            assert_eq!(headers[ALLOW_ORIGIN], "*");
        }
    }

    #[tokio::test]
    async fn test_history_rejects_other_methods() {
        let app = build_router(AppState::new(None, Some(test_pool().await)));

        for verb in ["PUT", "PATCH"] {
            let (status, _, body) = send(app.clone(), bare(verb, "/api/v1/history")).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "method {verb}");
            assert_eq!(body, json!({"error": "Method not allowed"}));
        }
    }

    // -- CORS --------------------------------------------------------------

    #[tokio::test]
    async fn test_preflight_is_answered_with_empty_200() {
        let app = build_router(AppState::new(None, None));

        for uri in ["/api/v1/completion", "/api/v1/history"] {
            let request = Request::builder()
                .method("OPTIONS")
                .uri(uri)
                .header("origin", "https://app.example.com")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap();

            let (status, headers, body) = send(app.clone(), request).await;
            assert_eq!(status, StatusCode::OK, "uri {uri}");
            assert_eq!(body, Value::Null);
            assert_eq!(headers[ALLOW_ORIGIN], "*");
            assert_eq!(headers["access-control-max-age"], "86400");
            let methods = headers["access-control-allow-methods"].to_str().unwrap();
            assert!(methods.contains("POST"));
            assert!(methods.contains("DELETE"));
        }
    }
}

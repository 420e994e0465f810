use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::diagnostics;
use super::health;
use super::keys;
use super::middleware::logging_middleware;
use super::protected;
use super::state::AppState;

/// Key collection and item routes under `base`
fn key_routes(router: Router<AppState>, base: &str) -> Router<AppState> {
    router
        .route(base, get(keys::list_keys).post(keys::create_key))
        .route(
            &format!("{}/{{id}}", base),
            get(keys::get_key)
                .put(keys::update_key)
                .patch(keys::update_key)
                .delete(keys::delete_key),
        )
}

fn service_routes() -> Router<AppState> {
    let router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Diagnostics
        .route("/env-check", get(diagnostics::env_check))
        .route("/check-db", get(diagnostics::check_db))
        .route("/debug", get(diagnostics::debug_info))
        // Allow-list demo
        .route("/protected", post(protected::protected));

    key_routes(router, "/keys")
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Create the full router with application state.
///
/// Everything is served at the root and again under `/api`; the key
/// collection is also reachable as `/api/api-keys`.
pub fn create_router(state: AppState) -> Router {
    let api = key_routes(service_routes(), "/api-keys");

    Router::new()
        .merge(service_routes())
        .nest("/api", api)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::StoreConfig;
    use crate::domain::api_key::ApiKeyStore;
    use crate::infrastructure::allow_list::AllowList;
    use crate::infrastructure::api_key::{
        ApiKeyService, InMemoryApiKeyStore, UnconfiguredApiKeyStore,
    };

    fn app_with<S: ApiKeyStore + 'static>(store: S) -> Router {
        let service = ApiKeyService::new(Arc::new(store));
        let state = AppState::new(Arc::new(service), StoreConfig::default(), AllowList::default());
        create_router(state)
    }

    fn app() -> Router {
        app_with(InMemoryApiKeyStore::new())
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = app();

        let (status, body) = send(&app, empty_request("GET", "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = send(&app, empty_request("GET", "/api/live")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, empty_request("GET", "/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"][0]["name"], "key_store");
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let app = app();

        let (status, created) = send(
            &app,
            json_request(
                "POST",
                "/keys",
                json!({"name": "prod-key", "type": "production", "limitEnabled": true, "limit": 500}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["type"], "production");
        assert_eq!(created["limit"], 500);
        assert_eq!(created["limit_enabled"], true);
        assert_eq!(created["limitEnabled"], true);
        assert_eq!(created["key"].as_str().unwrap().len(), 32);
        assert_eq!(created["createdAt"], created["created_at"]);

        let (status, listed) = send(&app, empty_request("GET", "/api/api-keys")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);

        let (_, via_api) = send(&app, empty_request("GET", "/api/keys")).await;
        assert_eq!(via_api, listed);

        let uri = format!("/keys/{}", created["id"].as_str().unwrap());
        let (status, fetched) = send(&app, empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "prod-key");
    }

    #[tokio::test]
    async fn test_create_validation_error() {
        let app = app();

        let (status, body) =
            send(&app, json_request("POST", "/keys", json!({"name": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");

        let (status, _) = send(&app, json_request("POST", "/keys", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, listed) = send(&app, empty_request("GET", "/keys")).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let app = app();

        let request = Request::builder()
            .method("POST")
            .uri("/keys")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\":"))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "json_parse_error");
    }

    #[tokio::test]
    async fn test_update_flow() {
        let app = app();

        let (_, created) = send(
            &app,
            json_request(
                "POST",
                "/keys",
                json!({"name": "limited", "limit_enabled": true, "limit": 500}),
            ),
        )
        .await;
        let uri = format!("/api/api-keys/{}", created["id"].as_str().unwrap());

        let (status, updated) =
            send(&app, json_request("PATCH", &uri, json!({"limit_enabled": false}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["limit_enabled"], false);
        assert!(updated["limit"].is_null());
        assert_eq!(updated["key"], created["key"]);
        assert_eq!(updated["created_at"], created["created_at"]);

        let (status, renamed) =
            send(&app, json_request("PUT", &uri, json!({"name": "renamed"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(renamed["name"], "renamed");

        let (status, resent) = send(&app, json_request("PUT", &uri, renamed.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resent, renamed);
    }

    #[tokio::test]
    async fn test_update_errors() {
        let app = app();

        let missing = format!("/keys/{}", uuid::Uuid::new_v4());
        let (status, body) =
            send(&app, json_request("PATCH", &missing, json!({"name": "x"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["type"], "not_found_error");

        let (status, body) =
            send(&app, json_request("PATCH", "/keys/not-a-uuid", json!({"name": "x"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["param"], "id");
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let app = app();

        let (_, created) = send(&app, json_request("POST", "/keys", json!({"name": "gone"}))).await;
        let uri = format!("/keys/{}", created["id"].as_str().unwrap());

        for _ in 0..2 {
            let (status, body) = send(&app, empty_request("DELETE", &uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"success": true}));
        }

        let (_, listed) = send(&app, empty_request("GET", "/keys")).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_protected() {
        let app = app();

        let (status, body) = send(&app, empty_request("POST", "/protected")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body["error"]["message"],
            "Authorization header missing or invalid format"
        );

        let wrong = Request::builder()
            .method("POST")
            .uri("/api/protected")
            .header(header::AUTHORIZATION, "Bearer tvly-dev-000")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, wrong).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "invalid api key");

        let valid = Request::builder()
            .method("POST")
            .uri("/protected")
            .header(header::AUTHORIZATION, "Bearer tvly-prod-987654321")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, valid).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["accessGranted"], true);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = app();

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/protected")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_check_db() {
        let (status, body) = send(&app(), empty_request("GET", "/check-db")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");

        let unconfigured = app_with(UnconfiguredApiKeyStore);
        let (status, body) = send(&unconfigured, empty_request("GET", "/api/check-db")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Database connection failed");
        assert!(body["hint"].as_str().unwrap().contains("SUPABASE_URL"));

        let (status, body) = send(&unconfigured, empty_request("GET", "/debug")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["table_exists"], false);
        assert_eq!(body["connection"]["has_key"], false);
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_500() {
        let (status, body) =
            send(&app_with(UnconfiguredApiKeyStore), empty_request("GET", "/keys")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["type"], "store_error");
        assert!(body["error"]["hint"].is_string());
    }

    #[tokio::test]
    async fn test_env_check() {
        let (status, body) = send(&app(), empty_request("GET", "/env-check")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store_url"], "not set");
        assert_eq!(body["env_loaded"], false);
        assert!(body["env_vars"].is_array());
    }
}

//! Gateway HTTP surface
//!
//! One router carries three route families:
//! - the data plane at `/{name}/{version}`, which forwards request bodies to
//!   whatever pipeline the registry has bound there
//! - the admin API under `/v1/endpoints` for publishing and retiring
//!   endpoints at runtime
//! - `/health` and `/status` for liveness and counters

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::cluster::{endpoint_id, model_id, HttpMethod, RegistryError, ServeCluster};
use crate::config::{validate_manifest, Manifest};
use crate::metrics::MetricsSnapshot;
use crate::model::{ErrorBody, InferenceRequest, ModelIdentity};
use crate::server::state::AppState;

// ============================================================================
// Data plane
// ============================================================================

/// Model endpoint: forwards the raw body to the pipeline bound at
/// `/{name}/{version}`.
///
/// Registered with [`any`] so the allowed-method check can answer 405 with
/// the same error envelope the pipeline errors use.
pub async fn handle_inference(
    State(state): State<AppState>,
    Path((name, version)): Path<(String, String)>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Extract request ID from headers or generate new one
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let identity = ModelIdentity::new(name, version);
    let started = Instant::now();
    state.metrics.record_request_start();

    info!("request {}: {} /{}", request_id, method, identity);

    let result = run_inference(&state, &identity, &method, &headers, body).await;

    // Straight-line from here so every outcome gets the exit log and the
    // metrics sample, timeouts and panics included.
    let latency_ms = started.elapsed().as_millis() as u64;
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err((status, _)) => *status,
    };
    state
        .metrics
        .record_request_end(latency_ms, status != StatusCode::OK);

    info!(
        "request {}: {} in {}ms",
        request_id,
        status.as_u16(),
        latency_ms
    );

    let mut response = match result {
        Ok((content_type, body)) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Err((status, body)) => (status, Json(body)).into_response(),
    };
    response
        .headers_mut()
        .insert("x-request-id", request_id.to_string().parse().unwrap());
    response
}

/// The fallible part of request handling, separated so the caller can log
/// and count every outcome in one place.
async fn run_inference(
    state: &AppState,
    identity: &ModelIdentity,
    method: &Method,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<(String, Vec<u8>), (StatusCode, ErrorBody)> {
    let id = model_id(identity);

    let endpoint = state
        .cluster
        .get_endpoint(&endpoint_id(&id))
        .await
        .ok_or_else(|| {
            let status = StatusCode::NOT_FOUND;
            (
                status,
                ErrorBody::new(status, format!("No endpoint deployed at /{}", identity)),
            )
        })?;

    if !endpoint.methods.iter().any(|m| m.as_str() == method.as_str()) {
        let status = StatusCode::METHOD_NOT_ALLOWED;
        return Err((
            status,
            ErrorBody::new(
                status,
                format!("Method {} not allowed for /{}", method, identity),
            ),
        ));
    }

    let backend = state
        .cluster
        .get_backend(&endpoint.backend)
        .await
        .ok_or_else(|| {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            (
                status,
                ErrorBody::new(
                    status,
                    format!("Endpoint /{} has no backend record", identity),
                ),
            )
        })?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let request = InferenceRequest {
        body: body.to_vec(),
        content_type,
    };

    // Predictions may block on model work; keep them off the async executor.
    let handler = backend.handler;
    let outcome = tokio::task::spawn_blocking(move || handler.handle(request))
        .await
        .map_err(|e| {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            (status, ErrorBody::new(status, e.to_string()))
        })?;

    match outcome {
        Ok(response) => Ok((response.content_type, response.body)),
        Err(e) => Err((e.status_code(), ErrorBody::from(&e))),
    }
}

// ============================================================================
// Admin API
// ============================================================================

/// Outcome of an admin operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationStatus {
    pub success: bool,
    pub message: String,
}

impl OperationStatus {
    fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

fn registry_error_status(error: &RegistryError) -> StatusCode {
    match error {
        RegistryError::BindFailed(_, _) => StatusCode::BAD_REQUEST,
        RegistryError::ClusterFailed(_, _) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn list_endpoints(State(state): State<AppState>) -> impl IntoResponse {
    let mut endpoints: Vec<EndpointSummary> = state
        .cluster
        .list_endpoints()
        .await
        .into_iter()
        .map(|(id, record)| EndpointSummary {
            id,
            route: record.route,
            methods: record.methods,
            backend: record.backend,
        })
        .collect();
    endpoints.sort_by(|a, b| a.id.cmp(&b.id));

    Json(EndpointList { endpoints })
}

#[derive(Serialize)]
struct EndpointList {
    endpoints: Vec<EndpointSummary>,
}

#[derive(Serialize)]
struct EndpointSummary {
    id: String,
    route: String,
    methods: Vec<HttpMethod>,
    backend: String,
}

/// Publish the endpoints in the posted manifest. Existing records with the
/// same ids are overwritten in place.
async fn publish_endpoints(
    State(state): State<AppState>,
    Json(manifest): Json<Manifest>,
) -> impl IntoResponse {
    if let Err(e) = validate_manifest(&manifest) {
        return (
            StatusCode::BAD_REQUEST,
            Json(OperationStatus::failure(e.to_string())),
        );
    }

    match state.registry.publish(&manifest.endpoints).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(OperationStatus::success(format!(
                "Published {} endpoint(s)",
                manifest.endpoints.len()
            ))),
        ),
        Err(e) => (
            registry_error_status(&e),
            Json(OperationStatus::failure(e.to_string())),
        ),
    }
}

/// Replace the endpoints in the posted manifest: each is torn down first and
/// then recreated, forcing a fresh model bind.
async fn replace_endpoints(
    State(state): State<AppState>,
    Json(manifest): Json<Manifest>,
) -> impl IntoResponse {
    if let Err(e) = validate_manifest(&manifest) {
        return (
            StatusCode::BAD_REQUEST,
            Json(OperationStatus::failure(e.to_string())),
        );
    }

    match state.registry.replace(&manifest.endpoints).await {
        Ok(()) => (
            StatusCode::OK,
            Json(OperationStatus::success(format!(
                "Replaced {} endpoint(s)",
                manifest.endpoints.len()
            ))),
        ),
        Err(e) => (
            registry_error_status(&e),
            Json(OperationStatus::failure(e.to_string())),
        ),
    }
}

async fn delete_endpoint(
    State(state): State<AppState>,
    Path((name, version)): Path<(String, String)>,
) -> impl IntoResponse {
    let identity = ModelIdentity::new(name, version);

    match state.registry.teardown(&identity).await {
        Ok(()) => (
            StatusCode::OK,
            Json(OperationStatus::success(format!(
                "Endpoint {} removed",
                identity
            ))),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(OperationStatus::failure(e.to_string())),
        ),
    }
}

// ============================================================================
// Health & Status
// ============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Gateway status endpoint
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(GatewayStatus {
        status: "ok".to_string(),
        endpoints: state.cluster.endpoint_count(),
        uptime_secs: state.uptime_secs(),
        requests: state.metrics.snapshot(),
    })
}

#[derive(Serialize)]
struct GatewayStatus {
    status: String,
    endpoints: usize,
    uptime_secs: i64,
    requests: MetricsSnapshot,
}

/// Create the Axum router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Admin API
        .route(
            "/v1/endpoints",
            get(list_endpoints)
                .post(publish_endpoints)
                .put(replace_endpoints),
        )
        .route(
            "/v1/endpoints/{name}/{version}",
            delete(delete_endpoint),
        )
        // Health check
        .route("/health", get(health))
        .route("/status", get(status))
        // Data plane. Endpoints resolve against the cluster at request time,
        // so routes published after startup work without a router rebuild.
        .route("/{name}/{version}", any(handle_inference))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_endpoint_specs;
    use crate::models::builtin_binder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::new(builtin_binder()))
    }

    /// App with the default echo and textstats endpoints already published.
    async fn create_seeded_app() -> Router {
        let state = AppState::new(builtin_binder());
        state
            .registry
            .publish(&default_endpoint_specs())
            .await
            .unwrap();
        create_router(state)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let app = create_seeded_app().await;

        let response = app
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["endpoints"], 2);
    }

    #[tokio::test]
    async fn test_unknown_endpoint_gets_error_envelope() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/resnet/v1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], 404);
    }

    #[tokio::test]
    async fn test_disallowed_method_is_rejected() {
        let app = create_seeded_app().await;

        // Default endpoints only allow PUT
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/echo/v1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], 405);
    }

    #[tokio::test]
    async fn test_inference_round_trip() {
        let app = create_seeded_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/echo/v1")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"prompt": "hi"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let json = body_json(response).await;
        assert_eq!(json["input"]["prompt"], "hi");
    }

    #[tokio::test]
    async fn test_list_endpoints() {
        let app = create_seeded_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/endpoints")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let endpoints = json["endpoints"].as_array().unwrap();
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0]["id"], "endpoint.echo_v1");
        assert_eq!(endpoints[0]["route"], "/echo/v1");
        assert_eq!(endpoints[1]["id"], "endpoint.textstats_v1");
    }

    #[tokio::test]
    async fn test_publish_unknown_model_is_rejected() {
        let app = create_test_app();

        let manifest = serde_json::json!({
            "endpoints": [{"name": "resnet", "version": "v1"}]
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/endpoints")
                    .header("content-type", "application/json")
                    .body(Body::from(manifest.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_publish_reserved_name_is_rejected() {
        let app = create_test_app();

        let manifest = serde_json::json!({
            "endpoints": [{"name": "health", "version": "v1"}]
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/endpoints")
                    .header("content-type", "application/json")
                    .body(Body::from(manifest.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_endpoint_then_404() {
        let app = create_seeded_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/v1/endpoints/echo/v1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/echo/v1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod properties;
mod route_planning;
mod upload;
mod webhook_stub;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use proproute_core::AppConfig;
use proproute_routing::RouteAssembler;
use proproute_sheets::{PropertyStore, SheetsError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Per-request context. Handlers receive everything they need from here;
/// nothing is cached between requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PropertyStore>,
    pub routing: Arc<RouteAssembler>,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    environment: String,
    route_webhook: &'static str,
    route_fallback: bool,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, req_id: RequestId) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(req_id.0),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "payload_too_large" => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a store failure. Input problems are the caller's; everything else is
/// reported as an upstream failure without leaking its details.
pub(super) fn map_sheets_error(request_id: &str, error: &SheetsError) -> ApiError {
    if let SheetsError::Invalid(e) = error {
        return ApiError::new(request_id, "validation_error", e.to_string());
    }
    tracing::error!(error = %error, "property sheet call failed");
    ApiError::new(
        request_id,
        "upstream_error",
        "failed to reach the property sheet",
    )
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/properties",
            get(properties::list_properties).post(properties::create_property),
        )
        .route("/api/properties/options", get(properties::list_options))
        .route("/api/route-planning", post(route_planning::plan_route))
        .route(
            "/api/upload-properties",
            post(upload::upload_properties)
                .layer(DefaultBodyLimit::max(state.config.upload_max_bytes)),
        );

    if state.config.is_development() {
        router = router.route(
            "/webhook-test/googlemap-route-calculator",
            post(webhook_stub::route_calculator),
        );
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    ApiResponse::new(
        HealthData {
            status: "ok",
            environment: state.config.env.to_string(),
            route_webhook: if state.routing.has_webhook() {
                "configured"
            } else {
                "missing"
            },
            route_fallback: state.routing.fallback_enabled(),
        },
        req_id,
    )
}

#[cfg(test)]
mod tests;

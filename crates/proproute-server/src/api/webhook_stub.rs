//! Development stand-in for the route-computation webhook.
//!
//! Answers in the webhook's own shape with fabricated legs, so a local setup
//! can point `PROPROUTE_ROUTE_WEBHOOK_URL` at itself. Only mounted when
//! running in development.

use axum::{extract::rejection::JsonRejection, Extension, Json};
use proproute_routing::fallback::stub_response;
use proproute_routing::{WebhookPayload, WebhookResponse};

use crate::middleware::RequestId;

use super::ApiError;

/// POST /webhook-test/googlemap-route-calculator
pub(in crate::api) async fn route_calculator(
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<WebhookPayload>, JsonRejection>,
) -> Result<Json<WebhookResponse>, ApiError> {
    let Json(payload) = body.map_err(|e| ApiError::new(req_id.0, "bad_request", e.body_text()))?;
    tracing::debug!(ids = %payload.propertyid_list, "webhook stub called");
    Ok(Json(stub_response(&payload, &mut rand::rng())))
}

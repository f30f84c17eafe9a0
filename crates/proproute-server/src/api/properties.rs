use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use proproute_core::{NewProperty, PropertyCatalog, PropertyRecord, RouteOption};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_sheets_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(in crate::api) struct CreatedProperty {
    pub row_id: String,
    pub property_id: String,
}

/// GET /api/properties. An unreadable sheet yields an empty list.
pub(in crate::api) async fn list_properties(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<PropertyRecord>>> {
    let records = state.store.fetch_all().await;
    ApiResponse::new(records, req_id)
}

/// GET /api/properties/options
pub(in crate::api) async fn list_options(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<RouteOption>>> {
    let catalog = state.store.load_catalog().await;
    ApiResponse::new(catalog.options(), req_id)
}

/// POST /api/properties
pub(in crate::api) async fn create_property(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<NewProperty>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedProperty>>), ApiError> {
    let rid = req_id.0.as_str();
    let Json(input) =
        body.map_err(|e| ApiError::new(rid, "bad_request", e.body_text()))?;
    input
        .validate()
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    // Best effort: if the sheet cannot be read the write still goes ahead.
    match state.store.try_fetch_all().await {
        Ok(records) => {
            let catalog = PropertyCatalog::from_records(records);
            if catalog.contains(input.property_id.trim()) {
                return Err(ApiError::new(
                    rid,
                    "conflict",
                    format!("property '{}' already exists", input.property_id.trim()),
                ));
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "duplicate check skipped; property sheet unreadable");
        }
    }

    let stored = state
        .store
        .append(input)
        .await
        .map_err(|e| map_sheets_error(rid, &e))?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::new(
            CreatedProperty {
                row_id: stored.row_id,
                property_id: stored.record.property_id,
            },
            req_id,
        ),
    ))
}

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::NaiveTime;
use proproute_core::schedule::{local_time_from_epoch, parse_start_time};
use proproute_core::{Position, RouteRequest, RouteResponse};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

/// Identifiers as sent by the UI: either comma-joined or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(in crate::api) enum IdList {
    Joined(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct RoutePlanningRequest {
    pub user_latitude: Option<f64>,
    #[serde(alias = "user_longitude")]
    pub user_longtitude: Option<f64>,
    #[serde(alias = "propertyId_list")]
    pub propertyid_list: Option<IdList>,
    /// Local `HH:MM`. Takes precedence over `user_timeselect`.
    pub start_time: Option<String>,
    /// Start instant in epoch seconds, read in the configured UTC offset.
    pub user_timeselect: Option<i64>,
}

fn default_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

impl RoutePlanningRequest {
    /// Start time resolution: `start_time`, then `user_timeselect`, then 09:00.
    fn into_route_request(self, utc_offset_minutes: i32) -> Result<RouteRequest, String> {
        let (Some(lat), Some(lng)) = (self.user_latitude, self.user_longtitude) else {
            return Err("user_latitude and user_longtitude are required".to_string());
        };
        let start_time = match (self.start_time.as_deref().map(str::trim), self.user_timeselect) {
            (Some(raw), _) if !raw.is_empty() => {
                parse_start_time(raw).map_err(|e| e.to_string())?
            }
            (_, Some(epoch)) => {
                local_time_from_epoch(epoch, utc_offset_minutes).map_err(|e| e.to_string())?
            }
            _ => default_start(),
        };
        let origin = Position::new(lat, lng);
        let result = match self.propertyid_list {
            Some(IdList::Joined(joined)) => RouteRequest::from_joined(origin, start_time, &joined),
            Some(IdList::Many(ids)) => RouteRequest::new(origin, start_time, ids),
            None => RouteRequest::new(origin, start_time, Vec::<String>::new()),
        };
        result.map_err(|e| e.to_string())
    }
}

/// POST /api/route-planning
pub(in crate::api) async fn plan_route(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<RoutePlanningRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<RouteResponse>>, ApiError> {
    let rid = req_id.0.as_str();
    let Json(body) = body.map_err(|e| ApiError::new(rid, "bad_request", e.body_text()))?;
    let request = body
        .into_route_request(state.config.utc_offset_minutes)
        .map_err(|message| ApiError::new(rid, "validation_error", message))?;

    let catalog = state.store.load_catalog().await;
    let response = state
        .routing
        .plan(&request, &catalog)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "route planning failed");
            ApiError::new(rid, "upstream_error", "failed to compute route")
        })?;

    tracing::info!(
        steps = response.steps.len(),
        source = ?response.source,
        "route planned"
    );
    Ok(ApiResponse::new(response, req_id))
}

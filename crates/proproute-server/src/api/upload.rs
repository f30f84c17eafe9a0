use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use proproute_import::{import_bytes, FileFormat, ImportSummary};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

const FILE_FIELD: &str = "file";

fn map_multipart_error(rid: &str, error: &MultipartError) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::new(rid, "payload_too_large", "uploaded file is too large");
    }
    ApiError::new(rid, "bad_request", error.body_text())
}

/// POST /api/upload-properties (multipart, field `file`).
///
/// The extension is checked from the part's file name before its body is
/// read, so an unsupported file never reaches the store.
pub(in crate::api) async fn upload_properties(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ImportSummary>>, ApiError> {
    let rid = req_id.0.as_str();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(rid, &e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        FileFormat::from_file_name(&file_name)
            .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| map_multipart_error(rid, &e))?;

        let summary = import_bytes(&state.store, &file_name, &bytes)
            .await
            .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

        return Ok(ApiResponse::new(summary, req_id));
    }

    Err(ApiError::new(rid, "validation_error", "no file uploaded"))
}

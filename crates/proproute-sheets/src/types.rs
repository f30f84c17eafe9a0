//! Spreadsheet values API payloads.

use serde::{Deserialize, Serialize};

/// Response of a values `get`: a rectangular-ish grid of cells.
///
/// Trailing empty cells are omitted by the API, so rows may be shorter than
/// the requested range. Cells are usually strings but numbers appear when
/// values are rendered unformatted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

/// Body of a values `append`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendRequest<'a> {
    pub major_dimension: &'static str,
    pub values: [&'a [String]; 1],
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub updates: Option<UpdateSummary>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: Option<u32>,
}

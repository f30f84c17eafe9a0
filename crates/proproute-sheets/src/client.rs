//! HTTP client for the spreadsheet values API.
//!
//! Reads the whole catalog range in one call (no pagination) and appends one
//! row per call. Cells come back as JSON values and are flattened to strings
//! here so normalization only ever sees text.

use std::time::Duration;

use proproute_core::SheetsSettings;
use reqwest::{Client, Url};

use crate::error::SheetsError;
use crate::types::{AppendRequest, AppendResponse, ValueRange};

/// Column span written by [`SheetsClient::append_row`].
const APPEND_COLUMNS: &str = "A:N";

/// Client for one worksheet of one spreadsheet.
///
/// Use [`SheetsClient::new`] with settings from the environment, or point
/// `base_url` in those settings at a mock server in tests.
pub struct SheetsClient {
    client: Client,
    base_url: Url,
    sheet_id: String,
    sheet_name: String,
    range: String,
    api_key: Option<String>,
    access_token: Option<String>,
}

impl SheetsClient {
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SheetsError::InvalidBaseUrl`] if the
    /// configured base URL cannot carry a path.
    pub fn new(
        settings: &SheetsSettings,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url =
            Url::parse(&settings.base_url).map_err(|e| SheetsError::InvalidBaseUrl {
                base_url: settings.base_url.clone(),
                reason: e.to_string(),
            })?;
        if base_url.cannot_be_a_base() {
            return Err(SheetsError::InvalidBaseUrl {
                base_url: settings.base_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url,
            sheet_id: settings.sheet_id.clone(),
            sheet_name: settings.sheet_name.clone(),
            range: settings.range.clone(),
            api_key: settings.api_key.clone(),
            access_token: settings.access_token.clone(),
        })
    }

    /// Fetches every row in the configured range as strings.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::Http`] on network failure.
    /// - [`SheetsError::UnexpectedStatus`] on a non-2xx answer.
    /// - [`SheetsError::Deserialize`] if the body is not a value range.
    pub async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = self.values_url(&format!("{}!{}", self.sheet_name, self.range), &[]);
        let response = self.client.get(url.clone()).send().await?;
        let body = Self::checked_body(response, &url).await?;

        let range: ValueRange =
            serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
                context: format!("values.get({})", url.path()),
                source: e,
            })?;

        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    /// Appends one row after the last populated row of the sheet.
    ///
    /// # Errors
    ///
    /// - [`SheetsError::Http`] on network failure.
    /// - [`SheetsError::UnexpectedStatus`] on a non-2xx answer.
    /// - [`SheetsError::Deserialize`] if the body is not an append response.
    pub async fn append_row(&self, row: &[String]) -> Result<AppendResponse, SheetsError> {
        let url = self.values_url(
            &format!("{}!{APPEND_COLUMNS}:append", self.sheet_name),
            &[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ],
        );

        let mut request = self.client.post(url.clone()).json(&AppendRequest {
            major_dimension: "ROWS",
            values: [row],
        });
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let body = Self::checked_body(response, &url).await?;
        if body.trim().is_empty() {
            return Ok(AppendResponse::default());
        }

        serde_json::from_str(&body).map_err(|e| SheetsError::Deserialize {
            context: format!("values.append({})", url.path()),
            source: e,
        })
    }

    /// Builds `{base}/v4/spreadsheets/{id}/values/{a1}` with the API key and
    /// any extra query pairs. Path segments are percent-encoded, so sheet
    /// names with spaces or non-ASCII characters are safe.
    fn values_url(&self, a1: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v4", "spreadsheets", self.sheet_id.as_str(), "values", a1]);
        }
        if self.api_key.is_some() || !extra.is_empty() {
            let mut pairs = url.query_pairs_mut();
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    async fn checked_body(response: reqwest::Response, url: &Url) -> Result<String, SheetsError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SheetsError::UnexpectedStatus {
                status: status.as_u16(),
                path: url.path().to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Flattens a cell to text; `null` becomes empty.
#[must_use]
pub fn cell_to_string(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

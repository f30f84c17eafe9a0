//! Client and wire types for the external route-computation webhook.
//!
//! The webhook is not under our control and its field types drift (numbers
//! as strings, `"website link"` vs `websiteLink`), so decoding is lenient:
//! every field is optional and numeric fields accept numbers or numeric text.

use std::sync::LazyLock;
use std::time::Duration;

use proproute_core::Leg;
use regex::Regex;
use reqwest::{Client, Url};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RoutingError;

/// Request body sent to the webhook. Field spellings are the webhook's own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub user_latitude: f64,
    #[serde(alias = "user_longitude")]
    pub user_longtitude: f64,
    /// Comma-joined property identifiers.
    #[serde(alias = "propertyId_list")]
    pub propertyid_list: String,
    /// Start time as epoch seconds.
    #[serde(default)]
    pub user_timeselect: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookResponse {
    #[serde(default)]
    pub data: Vec<WebhookStep>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub waypoints: Vec<String>,
    #[serde(default, rename = "mapsUrl", alias = "maps_url")]
    pub maps_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookStep {
    #[serde(default, deserialize_with = "lenient_text")]
    pub goto: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps: Option<String>,
    #[serde(
        default,
        rename = "website link",
        alias = "websiteLink",
        skip_serializing_if = "Option::is_none"
    )]
    pub website_link: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub step: Option<f64>,
    #[serde(default, rename = "form", alias = "from")]
    pub from: Option<String>,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub duration_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration_minute: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub distance_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration_value: Option<f64>,
}

static DISTANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(km|kilometers?|m|meters?)\b").expect("valid regex")
});
static HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:hours?|hrs?|h)\b").expect("valid regex"));
static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:minutes?|mins?)\b").expect("valid regex"));

impl WebhookStep {
    /// Derives the travel leg, preferring raw values over display text.
    ///
    /// Zero raw values are ignored because the webhook reports `"0"` when it
    /// only filled the text fields.
    #[must_use]
    pub fn leg(&self) -> Leg {
        let distance_meters = positive(self.distance_value)
            .or_else(|| self.distance.as_deref().and_then(parse_distance_meters))
            .unwrap_or(0);
        let duration_seconds = positive(self.duration_value)
            .or_else(|| positive(self.duration_minute.map(|m| m * 60.0)))
            .or_else(|| self.duration_text.as_deref().and_then(parse_duration_seconds))
            .unwrap_or(0);

        let mut leg = Leg::from_values(distance_meters, duration_seconds);
        if let Some(text) = self.distance.as_deref().filter(|t| !t.trim().is_empty()) {
            leg.distance_text = text.trim().to_string();
        }
        if let Some(text) = self.duration_text.as_deref().filter(|t| !t.trim().is_empty()) {
            leg.duration_text = text.trim().to_string();
        }
        leg
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn positive(value: Option<f64>) -> Option<u64> {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.round() as u64)
}

/// Parses `"12 km"`, `"12.5 km"`, `"800 m"` into meters.
#[must_use]
pub fn parse_distance_meters(text: &str) -> Option<u64> {
    let caps = DISTANCE_RE.captures(text)?;
    let amount: f64 = caps[1].replace(',', ".").parse().ok()?;
    let unit = caps[2].to_ascii_lowercase();
    let meters = if unit.starts_with('k') {
        amount * 1000.0
    } else {
        amount
    };
    positive(Some(meters))
}

/// Parses `"25 mins"`, `"1 hour 5 mins"` into seconds.
#[must_use]
pub fn parse_duration_seconds(text: &str) -> Option<u64> {
    let hours: u64 = HOURS_RE
        .captures(text)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0);
    let minutes: u64 = MINUTES_RE
        .captures(text)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0);
    let total = hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?;
    (total > 0).then_some(total)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            Some(serde_json::Value::Number(n)) => n.as_f64(),
            Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        },
    )
}

/// Client for the route-computation webhook. No retries: a failed call is
/// reported to the assembler, which decides whether to fall back.
pub struct RouteWebhookClient {
    client: Client,
    url: Url,
}

impl RouteWebhookClient {
    /// # Errors
    ///
    /// Returns [`RoutingError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`RoutingError::InvalidUrl`] if `url` does not parse.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let url = Url::parse(url).map_err(|e| RoutingError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { client, url })
    }

    /// Posts the payload and decodes the webhook's answer.
    ///
    /// # Errors
    ///
    /// - [`RoutingError::Http`] on network failure.
    /// - [`RoutingError::UnexpectedStatus`] on a non-2xx answer.
    /// - [`RoutingError::Deserialize`] if the body is not a route response.
    pub async fn compute(&self, payload: &WebhookPayload) -> Result<WebhookResponse, RoutingError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(payload)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RoutingError::Deserialize {
            context: format!(
                "webhook response for [{}]",
                payload.propertyid_list
            ),
            source: e,
        })
    }
}

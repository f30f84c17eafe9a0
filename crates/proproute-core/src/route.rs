use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::property::Position;
use crate::CoreError;

/// A request to visit a set of properties starting from `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: Position,
    pub start_time: NaiveTime,
    pub property_ids: Vec<String>,
}

impl RouteRequest {
    /// Builds a request, trimming identifiers and dropping blank ones.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptySelection`] if no identifier remains.
    pub fn new<I, S>(origin: Position, start_time: NaiveTime, ids: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let property_ids: Vec<String> = ids
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if property_ids.is_empty() {
            return Err(CoreError::EmptySelection);
        }
        Ok(Self {
            origin,
            start_time,
            property_ids,
        })
    }

    /// Splits a comma-joined identifier list, as sent by the UI.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptySelection`] if the list holds no identifier.
    pub fn from_joined(
        origin: Position,
        start_time: NaiveTime,
        joined: &str,
    ) -> Result<Self, CoreError> {
        Self::new(origin, start_time, joined.split(','))
    }

    #[must_use]
    pub fn joined_ids(&self) -> String {
        self.property_ids.join(",")
    }
}

/// Travel from the previous stop to this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    #[serde(rename = "distance")]
    pub distance_text: String,
    pub duration_text: String,
    #[serde(rename = "distance_value")]
    pub distance_meters: u64,
    #[serde(rename = "duration_value")]
    pub duration_seconds: u64,
}

impl Leg {
    /// The zero leg carried by step 1.
    #[must_use]
    pub fn start() -> Self {
        Self::from_values(0, 0)
    }

    #[must_use]
    pub fn from_values(distance_meters: u64, duration_seconds: u64) -> Self {
        Self {
            distance_text: format_km(distance_meters),
            duration_text: format!("{} mins", minutes_from_seconds(duration_seconds)),
            distance_meters,
            duration_seconds,
        }
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        minutes_from_seconds(self.duration_seconds)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.distance_meters == 0 && self.duration_seconds == 0
    }
}

fn minutes_from_seconds(seconds: u64) -> u32 {
    u32::try_from(seconds.saturating_add(30) / 60).unwrap_or(u32::MAX)
}

fn format_km(meters: u64) -> String {
    if meters % 1000 == 0 {
        format!("{} km", meters / 1000)
    } else {
        format!("{}.{} km", meters / 1000, (meters % 1000) / 100)
    }
}

/// One stop of the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// 1-based position in the itinerary.
    pub step: u32,
    pub goto: String,
    /// Identifier of the previous stop, or `START`.
    pub from: String,
    pub contact: String,
    pub maps: String,
    #[serde(rename = "websiteLink")]
    pub website_link: String,
    #[serde(flatten)]
    pub leg: Leg,
    pub duration_minute: u32,
    /// `HH:MM`, derived from the start time and preceding legs.
    pub arrival_time: String,
    /// Whether the identifier matched a catalog record.
    pub in_catalog: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    /// Legs came from the routing webhook.
    Webhook,
    /// Legs are fabricated filler, not computed routing.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub steps: Vec<RouteStep>,
    pub origin: String,
    pub destination: String,
    pub waypoints: Vec<String>,
    #[serde(rename = "mapsUrl")]
    pub maps_url: String,
    pub source: RouteSource,
}

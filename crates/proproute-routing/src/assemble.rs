//! Turns a [`RouteRequest`] into a [`RouteResponse`].
//!
//! The webhook decides order and travel legs. The catalog supplies contact,
//! map and listing fields. When the webhook is missing or fails, filler legs
//! are used if fallback is enabled.

use chrono::{FixedOffset, NaiveTime, Utc};
use proproute_core::schedule::{arrival_times, format_clock, start_epoch_seconds};
use proproute_core::{
    AppConfig, Leg, PropertyCatalog, RouteRequest, RouteResponse, RouteSource, RouteStep,
};
use rand::Rng;

use crate::error::RoutingError;
use crate::fallback::fabricate_legs;
use crate::maps::directions_url;
use crate::webhook::{RouteWebhookClient, WebhookPayload, WebhookResponse};

/// `from` value of the first step.
pub const START: &str = "START";
pub const CONTACT_PLACEHOLDER: &str = "Contact information unavailable";
pub const MAPS_PLACEHOLDER: &str = "https://maps.google.com/";
pub const LISTING_PLACEHOLDER: &str = "https://www.thaiindustrialproperty.com/";

/// Builds one step per identifier.
///
/// `legs[i]` is the travel into stop `i`; the first leg is replaced by
/// [`Leg::start`] regardless of what was passed. Missing legs are zero.
#[must_use]
pub fn build_steps(
    ids: &[String],
    legs: &[Leg],
    catalog: &PropertyCatalog,
    start: NaiveTime,
) -> Vec<RouteStep> {
    let legs: Vec<Leg> = (0..ids.len())
        .map(|idx| match legs.get(idx) {
            Some(leg) if idx > 0 => leg.clone(),
            _ => Leg::start(),
        })
        .collect();
    let minutes: Vec<u32> = legs.iter().map(Leg::duration_minutes).collect();
    let arrivals = arrival_times(start, &minutes);

    ids.iter()
        .zip(legs)
        .zip(arrivals)
        .enumerate()
        .map(|(idx, ((id, leg), arrival))| {
            let record = catalog.find(id);
            let (contact, maps, website_link) = match record {
                Some(p) => (
                    format!("K.{} {}", p.owner_name, p.owner_contact)
                        .trim()
                        .to_string(),
                    non_empty_or(&p.map_url, MAPS_PLACEHOLDER),
                    non_empty_or(&p.listing_url, LISTING_PLACEHOLDER),
                ),
                None => (
                    CONTACT_PLACEHOLDER.to_string(),
                    MAPS_PLACEHOLDER.to_string(),
                    LISTING_PLACEHOLDER.to_string(),
                ),
            };
            RouteStep {
                step: u32::try_from(idx + 1).unwrap_or(u32::MAX),
                goto: id.clone(),
                from: if idx == 0 {
                    START.to_string()
                } else {
                    ids[idx - 1].clone()
                },
                contact,
                maps,
                website_link,
                duration_minute: leg.duration_minutes(),
                leg,
                arrival_time: format_clock(arrival),
                in_catalog: record.is_some(),
            }
        })
        .collect()
}

fn non_empty_or(value: &str, placeholder: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Known catalog positions of `ids`, in order, as `"lat,lng"`.
fn catalog_waypoints(ids: &[String], catalog: &PropertyCatalog) -> Vec<String> {
    ids.iter()
        .filter_map(|id| catalog.find(id))
        .filter(|p| p.position.is_known())
        .map(|p| p.position.to_string())
        .collect()
}

/// A complete filler response in request order.
pub fn fallback_plan<R: Rng + ?Sized>(
    request: &RouteRequest,
    catalog: &PropertyCatalog,
    rng: &mut R,
) -> RouteResponse {
    let ids = &request.property_ids;
    let legs = fabricate_legs(ids.len(), rng);
    let waypoints = catalog_waypoints(ids, catalog);
    let origin = request.origin.to_string();

    RouteResponse {
        steps: build_steps(ids, &legs, catalog, request.start_time),
        maps_url: directions_url(request.origin, &waypoints),
        destination: origin.clone(),
        origin,
        waypoints,
        source: RouteSource::Fallback,
    }
}

/// Checks the webhook answer against the request and assembles it.
///
/// The answer must name every requested identifier exactly once (in any
/// order); its order is kept.
///
/// # Errors
///
/// Returns [`RoutingError::StepMismatch`] otherwise.
pub fn webhook_plan(
    request: &RouteRequest,
    response: WebhookResponse,
    catalog: &PropertyCatalog,
) -> Result<RouteResponse, RoutingError> {
    let mut data = response.data;
    let expected = request.property_ids.len();
    if data.len() != expected {
        return Err(RoutingError::StepMismatch {
            expected,
            actual: data.len(),
        });
    }

    // Stable: unnumbered steps keep the webhook's order.
    data.sort_by(|a, b| {
        a.step
            .unwrap_or(f64::MAX)
            .total_cmp(&b.step.unwrap_or(f64::MAX))
    });

    let mut returned: Vec<&str> = data.iter().map(|s| s.goto.as_str()).collect();
    let mut requested: Vec<&str> = request.property_ids.iter().map(String::as_str).collect();
    returned.sort_unstable();
    requested.sort_unstable();
    if returned != requested {
        return Err(RoutingError::StepMismatch {
            expected,
            actual: data
                .iter()
                .filter(|s| request.property_ids.contains(&s.goto))
                .count(),
        });
    }

    let ids: Vec<String> = data.iter().map(|s| s.goto.clone()).collect();
    let legs: Vec<Leg> = data.iter().map(crate::webhook::WebhookStep::leg).collect();

    let waypoints = if response.waypoints.is_empty() {
        catalog_waypoints(&ids, catalog)
    } else {
        response.waypoints
    };
    let fallback_origin = request.origin.to_string();
    let origin = response
        .origin
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| fallback_origin.clone());
    let destination = response
        .destination
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(fallback_origin);
    let maps_url = response
        .maps_url
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| directions_url(request.origin, &waypoints));

    Ok(RouteResponse {
        steps: build_steps(&ids, &legs, catalog, request.start_time),
        origin,
        destination,
        waypoints,
        maps_url,
        source: RouteSource::Webhook,
    })
}

/// Plans routes against the webhook, falling back to filler when allowed.
pub struct RouteAssembler {
    webhook: Option<RouteWebhookClient>,
    fallback: bool,
    utc_offset_minutes: i32,
}

impl RouteAssembler {
    #[must_use]
    pub fn new(webhook: Option<RouteWebhookClient>, fallback: bool, utc_offset_minutes: i32) -> Self {
        Self {
            webhook,
            fallback,
            utc_offset_minutes,
        }
    }

    /// # Errors
    ///
    /// Returns [`RoutingError`] if the configured webhook URL is unusable.
    pub fn from_config(config: &AppConfig) -> Result<Self, RoutingError> {
        let webhook = config
            .route_webhook_url
            .as_deref()
            .map(|url| {
                RouteWebhookClient::new(url, config.request_timeout_secs, &config.user_agent)
            })
            .transpose()?;
        Ok(Self::new(
            webhook,
            config.route_fallback,
            config.utc_offset_minutes,
        ))
    }

    #[must_use]
    pub fn has_webhook(&self) -> bool {
        self.webhook.is_some()
    }

    #[must_use]
    pub fn fallback_enabled(&self) -> bool {
        self.fallback
    }

    /// The payload sent for `request`, with the start time taken as today in
    /// the configured offset.
    #[must_use]
    pub fn payload(&self, request: &RouteRequest) -> WebhookPayload {
        let today = FixedOffset::east_opt(self.utc_offset_minutes * 60).map_or_else(
            || Utc::now().date_naive(),
            |offset| Utc::now().with_timezone(&offset).date_naive(),
        );
        WebhookPayload {
            user_latitude: request.origin.lat,
            user_longtitude: request.origin.lng,
            propertyid_list: request.joined_ids(),
            user_timeselect: start_epoch_seconds(
                today,
                request.start_time,
                self.utc_offset_minutes,
            ),
        }
    }

    /// # Errors
    ///
    /// When fallback is disabled: the webhook's error, or
    /// [`RoutingError::NotConfigured`] if there is no webhook.
    pub async fn plan(
        &self,
        request: &RouteRequest,
        catalog: &PropertyCatalog,
    ) -> Result<RouteResponse, RoutingError> {
        let Some(webhook) = &self.webhook else {
            if self.fallback {
                tracing::warn!("no routing webhook configured; serving fallback route");
                return Ok(fallback_plan(request, catalog, &mut rand::rng()));
            }
            return Err(RoutingError::NotConfigured);
        };

        let outcome = webhook
            .compute(&self.payload(request))
            .await
            .and_then(|response| webhook_plan(request, response, catalog));

        match outcome {
            Ok(response) => {
                tracing::info!(steps = response.steps.len(), "route computed by webhook");
                Ok(response)
            }
            Err(e) if self.fallback => {
                tracing::warn!(error = %e, "routing webhook failed; serving fallback route");
                Ok(fallback_plan(request, catalog, &mut rand::rng()))
            }
            Err(e) => {
                tracing::error!(error = %e, "routing webhook failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "assemble_test.rs"]
mod tests;

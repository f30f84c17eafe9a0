//! Fabricated legs for when the routing webhook cannot be used.
//!
//! None of these values are computed. They only give a client something to
//! render, and every response built from them is tagged
//! [`RouteSource::Fallback`](proproute_core::RouteSource::Fallback).

use proproute_core::Leg;
use rand::Rng;

use crate::webhook::{WebhookPayload, WebhookResponse, WebhookStep};

pub const DISTANCE_KM: std::ops::RangeInclusive<u64> = 5..=35;
pub const DURATION_MINUTES: std::ops::RangeInclusive<u64> = 10..=50;

/// One filler leg: a whole number of kilometers and minutes within bounds.
pub fn fabricate_leg<R: Rng + ?Sized>(rng: &mut R) -> Leg {
    let km = rng.random_range(DISTANCE_KM);
    let minutes = rng.random_range(DURATION_MINUTES);
    Leg::from_values(km * 1000, minutes * 60)
}

/// `n` filler legs. The first is always [`Leg::start`].
pub fn fabricate_legs<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Leg> {
    (0..n)
        .map(|idx| {
            if idx == 0 {
                Leg::start()
            } else {
                fabricate_leg(rng)
            }
        })
        .collect()
}

/// A webhook-shaped answer built from filler legs, for the development stub.
pub fn stub_response<R: Rng + ?Sized>(payload: &WebhookPayload, rng: &mut R) -> WebhookResponse {
    let ids: Vec<&str> = payload
        .propertyid_list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let legs = fabricate_legs(ids.len(), rng);
    let origin = format!("{},{}", payload.user_latitude, payload.user_longtitude);

    let data = ids
        .iter()
        .zip(legs)
        .enumerate()
        .map(|(idx, (id, leg))| {
            #[allow(clippy::cast_precision_loss)]
            let step = (idx + 1) as f64;
            #[allow(clippy::cast_precision_loss)]
            let minutes = leg.duration_minutes() as f64;
            #[allow(clippy::cast_precision_loss)]
            let (meters, seconds) = (leg.distance_meters as f64, leg.duration_seconds as f64);
            WebhookStep {
                goto: (*id).to_string(),
                step: Some(step),
                from: Some(if idx == 0 {
                    crate::assemble::START.to_string()
                } else {
                    ids[idx - 1].to_string()
                }),
                distance: Some(leg.distance_text),
                duration_text: Some(leg.duration_text),
                duration_minute: Some(minutes),
                distance_value: Some(meters),
                duration_value: Some(seconds),
                ..WebhookStep::default()
            }
        })
        .collect();

    WebhookResponse {
        data,
        origin: Some(origin.clone()),
        destination: Some(origin),
        waypoints: Vec::new(),
        maps_url: None,
    }
}

use proproute_core::schedule::parse_start_time;
use proproute_core::{Position, RouteRequest, RouteResponse, RouteSource};
use proproute_routing::RouteAssembler;
use proproute_sheets::PropertyStore;

/// Plan a route from the given position and print the itinerary.
///
/// # Errors
///
/// Returns an error for an invalid start time or empty selection, or when
/// routing fails with fallback disabled.
pub(crate) async fn run_plan(
    store: &PropertyStore,
    routing: &RouteAssembler,
    lat: f64,
    lng: f64,
    start: &str,
    ids: &[String],
) -> anyhow::Result<()> {
    let start_time = parse_start_time(start)?;
    let request = RouteRequest::new(Position::new(lat, lng), start_time, ids)?;
    let catalog = store.load_catalog().await;
    tracing::debug!(
        selected = request.property_ids.len(),
        catalog = catalog.len(),
        "planning route"
    );
    let response = routing.plan(&request, &catalog).await?;
    print!("{}", render_itinerary(&response));
    Ok(())
}

fn render_itinerary(response: &RouteResponse) -> String {
    let mut out = String::new();
    if response.source == RouteSource::Fallback {
        out.push_str("NOTE: routing webhook unavailable; distances and times below are placeholders\n\n");
    }
    out.push_str(&format!(
        "{:<6}{:<8}{:<14}{:>10}{:>9}  CONTACT\n",
        "STEP", "ARRIVE", "PROPERTY", "DISTANCE", "DRIVE"
    ));
    for step in &response.steps {
        out.push_str(&format!(
            "{:<6}{:<8}{:<14}{:>10}{:>9}  {}\n",
            step.step,
            step.arrival_time,
            step.goto,
            step.leg.distance_text,
            format!("{} min", step.duration_minute),
            step.contact
        ));
    }
    out.push_str(&format!("\nDirections: {}\n", response.maps_url));
    out
}

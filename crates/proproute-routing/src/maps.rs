use proproute_core::Position;
use reqwest::Url;

const DIRECTIONS_BASE: &str = "https://www.google.com/maps/dir/";

/// Round-trip directions link: out from `origin`, through every waypoint in
/// order, and back to `origin`.
#[must_use]
pub fn directions_url(origin: Position, waypoints: &[String]) -> String {
    let Ok(mut url) = Url::parse(DIRECTIONS_BASE) else {
        return DIRECTIONS_BASE.to_string();
    };
    let origin = origin.to_string();
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("api", "1")
            .append_pair("origin", &origin)
            .append_pair("destination", &origin);
        if !waypoints.is_empty() {
            pairs.append_pair("waypoints", &waypoints.join("|"));
        }
    }
    url.into()
}

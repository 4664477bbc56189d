use model::{
    waypoint::{Position, Waypoint, WaypointTable},
    WithDistance,
};
use utility::{edit_distance::normalized_edit_distance, geo::calculate_bounding_box};

/// Names further apart than this are not offered as a suggestion.
pub const SUGGESTION_THRESHOLD: f64 = 0.5;

/// Waypoints whose name contains `query`, ignoring case, in table order.
pub fn search<'a>(table: &'a WaypointTable, query: &str) -> Vec<&'a Waypoint> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    table
        .iter()
        .filter(|waypoint| waypoint.name().to_lowercase().contains(&query))
        .collect()
}

/// The waypoint whose name is closest to `name`, for "did you mean" hints.
pub fn suggest<'a>(table: &'a WaypointTable, name: &str) -> Option<&'a Waypoint> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }
    table
        .iter()
        .map(|waypoint| {
            let distance = normalized_edit_distance(&name, &waypoint.name().to_lowercase());
            (waypoint, distance)
        })
        .filter(|(_, distance)| *distance <= SUGGESTION_THRESHOLD)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(waypoint, _)| waypoint)
}

/// Waypoints within `radius_km` of `position`, closest first.
pub fn nearby(
    table: &WaypointTable,
    position: Position,
    radius_km: f64,
) -> Vec<WithDistance<Waypoint>> {
    let ((min_lat, min_lon), (max_lat, max_lon)) =
        calculate_bounding_box(position.latitude(), position.longitude(), radius_km);

    let mut found: Vec<WithDistance<Waypoint>> = table
        .iter()
        .filter(|waypoint| {
            let candidate = waypoint.position();
            (min_lat..=max_lat).contains(&candidate.latitude())
                && (min_lon..=max_lon).contains(&candidate.longitude())
        })
        .map(|waypoint| WithDistance::new(position.distance_km(&waypoint.position()), waypoint.clone()))
        .filter(|found| found.distance_km <= radius_km)
        .collect();
    found.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    found
}

//! Nearest-neighbour construction of closed walking tours.
//!
//! Building a tour is a pure, synchronous computation over a read-only
//! [`WaypointSet`]. Every call starts from scratch and returns a new [`Tour`];
//! drawing or animating it is left to [`crate::display`] and
//! [`crate::replay`].

use std::borrow::Borrow;

use itertools::Itertools;
use model::{
    tour::Tour,
    waypoint::{Waypoint, WaypointSet},
};

use crate::InvalidInput;

/// Greedy tour over `set` beginning and ending at the waypoint named `start`,
/// using the haversine distance.
pub fn nearest_neighbor_tour(set: &WaypointSet<'_>, start: &str) -> Result<Tour, InvalidInput> {
    nearest_neighbor_tour_with(set, start, Waypoint::distance_km)
}

/// Same as [`nearest_neighbor_tour`] with an arbitrary distance function. The
/// total length is summed with the same function.
///
/// From the last visited waypoint the closest unvisited one is chosen next.
/// On equal distances the member that comes first in the set wins. O(n²).
pub fn nearest_neighbor_tour_with<F>(
    set: &WaypointSet<'_>,
    start: &str,
    metric: F,
) -> Result<Tour, InvalidInput>
where
    F: Fn(&Waypoint, &Waypoint) -> f64,
{
    if set.is_empty() {
        return Err(InvalidInput::EmptyWaypointSet);
    }
    let start_index = set
        .index_of(start)
        .ok_or_else(|| InvalidInput::UnknownStart(start.to_owned()))?;

    let members = set.members();
    let mut visited = vec![false; members.len()];
    visited[start_index] = true;

    let mut order: Vec<&Waypoint> = Vec::with_capacity(members.len() + 1);
    order.push(members[start_index]);

    let mut current = members[start_index];
    while order.len() < members.len() {
        let mut nearest: Option<(usize, f64)> = None;
        for (index, &candidate) in members.iter().enumerate() {
            if visited[index] {
                continue;
            }
            let distance = metric(current, candidate);
            // strict comparison keeps the first-seen candidate on ties
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((index, distance));
            }
        }
        let Some((index, _)) = nearest else {
            break;
        };
        visited[index] = true;
        current = members[index];
        order.push(current);
    }
    order.push(members[start_index]);

    let total_distance_km = length_with(&order, &metric);
    log::debug!(
        "built tour over {} waypoints from '{}': {:.3} km",
        members.len(),
        start,
        total_distance_km
    );

    Ok(Tour::new(
        order.into_iter().cloned().collect(),
        total_distance_km,
    ))
}

/// Sum of haversine distances between consecutive waypoints of `order`.
pub fn tour_length_km(order: &[Waypoint]) -> f64 {
    length_with(order, &Waypoint::distance_km)
}

fn length_with<W, F>(order: &[W], metric: &F) -> f64
where
    W: Borrow<Waypoint>,
    F: Fn(&Waypoint, &Waypoint) -> f64,
{
    order
        .iter()
        .tuple_windows()
        .map(|(from, to)| metric(from.borrow(), to.borrow()))
        .sum()
}

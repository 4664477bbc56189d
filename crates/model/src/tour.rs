use schemars::JsonSchema;
use serde::Serialize;

use crate::waypoint::{Position, Waypoint};

/// A closed walk over a waypoint set. `order` starts and ends with the same
/// waypoint and visits every other member exactly once in between.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    order: Vec<Waypoint>,
    total_distance_km: f64,
}

impl Tour {
    /// Assembles a tour from an already closed visiting order. The caller is
    /// responsible for the order being a closed permutation and for the total
    /// matching the sum of its legs.
    pub fn new(order: Vec<Waypoint>, total_distance_km: f64) -> Self {
        Self {
            order,
            total_distance_km,
        }
    }

    pub fn order(&self) -> &[Waypoint] {
        &self.order
    }

    pub fn start(&self) -> Option<&Waypoint> {
        self.order.first()
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    /// Number of distinct waypoints visited.
    pub fn stops(&self) -> usize {
        self.order.len().saturating_sub(1)
    }

    pub fn legs(&self) -> impl Iterator<Item = (&Waypoint, &Waypoint)> + '_ {
        self.order.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    pub fn positions(&self) -> Vec<Position> {
        self.order.iter().map(Waypoint::position).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(Waypoint::name).collect()
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{waypoint::Position, ExampleData};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteQuery {
    pub start: Position,
    pub end: Position,
}

/// One turn-by-turn instruction. `distance` is in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteStep {
    pub instruction: String,
    pub distance: f64,
}

impl RouteStep {
    pub fn distance_km(&self) -> f64 {
        self.distance / 1000.0
    }
}

/// Walking route as returned by the directions provider, with the geometry
/// already in latitude/longitude order. `distance` is in meters and
/// `duration` in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteResult {
    pub geometry: Vec<Position>,
    pub distance: f64,
    pub duration: f64,
    pub steps: Vec<RouteStep>,
}

impl RouteResult {
    pub fn distance_km(&self) -> f64 {
        self.distance / 1000.0
    }

    pub fn duration_min(&self) -> f64 {
        self.duration / 60.0
    }
}

impl ExampleData for RouteResult {
    fn example_data() -> Self {
        RouteResult {
            geometry: vec![
                Position::new_unchecked(13.262621, 80.026525),
                Position::new_unchecked(13.262198, 80.027673),
            ],
            distance: 148.3,
            duration: 106.8,
            steps: vec![
                RouteStep {
                    instruction: "Head east".to_owned(),
                    distance: 148.3,
                },
                RouteStep {
                    instruction: "Arrive at your destination, on the left".to_owned(),
                    distance: 0.0,
                },
            ],
        }
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{
    waypoint::{Position, Waypoint, WaypointError},
    ExampleData,
};

/// A place events can be held at, as stored by the events backend.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Venue {
    pub id: Id<Venue>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
}

impl HasId for Venue {
    type IdType = u64;
}

impl Venue {
    pub fn position(&self) -> Result<Position, WaypointError> {
        Position::new(self.latitude, self.longitude)
    }

    pub fn to_waypoint(&self) -> Result<Waypoint, WaypointError> {
        Waypoint::new(self.name.clone(), self.latitude, self.longitude)
    }
}

impl ExampleData for Venue {
    fn example_data() -> Self {
        Venue {
            id: Id::new(2),
            name: "Library".to_owned(),
            latitude: 13.262621,
            longitude: 80.026525,
            description: Some("Central library".to_owned()),
        }
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use serde_with;

pub mod event;
pub mod path;
pub mod route;
pub mod tour;
pub mod venue;
pub mod waypoint;

pub trait ExampleData {
    fn example_data() -> Self;
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithDistance<T> {
    pub distance_km: f64,
    #[serde(flatten)]
    pub content: T,
}

impl<T> WithDistance<T> {
    pub fn new(distance_km: f64, content: T) -> Self {
        Self {
            distance_km,
            content,
        }
    }

    pub fn map<U, F>(self, f: F) -> WithDistance<U>
    where
        F: FnOnce(T) -> U,
    {
        WithDistance::new(self.distance_km, f(self.content))
    }
}

//! Response shapes of the OpenRouteService directions endpoint (GeoJSON).

use model::{
    route::{RouteResult, RouteStep},
    waypoint::Position,
};
use serde::Deserialize;

use crate::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: Properties,
}

/// Coordinates are `[longitude, latitude]`, optionally followed by elevation.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// The provider leaves out zero values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub instruction: String,
    #[serde(default)]
    pub distance: f64,
}

impl TryFrom<DirectionsResponse> for RouteResult {
    type Error = ApiError;

    fn try_from(response: DirectionsResponse) -> Result<Self, Self::Error> {
        let feature = response
            .features
            .into_iter()
            .next()
            .ok_or(ApiError::NoRoute)?;

        let geometry = feature
            .geometry
            .coordinates
            .iter()
            .map(|coordinate| match coordinate.as_slice() {
                [longitude, latitude, ..] => Position::new(*latitude, *longitude)
                    .map_err(|why| ApiError::InvalidGeometry(why.to_string())),
                _ => Err(ApiError::InvalidGeometry(format!(
                    "expected [longitude, latitude], got {:?}",
                    coordinate
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let steps = feature
            .properties
            .segments
            .into_iter()
            .flat_map(|segment| segment.steps)
            .map(|step| RouteStep {
                instruction: step.instruction,
                distance: step.distance,
            })
            .collect();

        Ok(RouteResult {
            geometry,
            distance: feature.properties.summary.distance,
            duration: feature.properties.summary.duration,
            steps,
        })
    }
}

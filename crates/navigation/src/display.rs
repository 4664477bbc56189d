//! What the map should currently show.
//!
//! [`MapViewState`] is a plain value: every operation takes the state and
//! hands back the updated one, so the owner decides when a change becomes
//! visible. Nothing in here talks to a rendering surface.

use std::fmt;

use itertools::Itertools;
use model::{
    route::RouteResult,
    tour::Tour,
    waypoint::{Position, Waypoint},
};
use schemars::JsonSchema;
use serde::Serialize;

pub const FOCUS_ZOOM: u8 = 18;
pub const VIEWPORT_PADDING: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum MarkerKind {
    Waypoint,
    Start,
    End,
    Venue,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Marker {
    pub name: String,
    pub position: Position,
    pub kind: MarkerKind,
}

impl Marker {
    pub fn new(waypoint: &Waypoint, kind: MarkerKind) -> Self {
        Self {
            name: waypoint.name().to_owned(),
            position: waypoint.position(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest box containing all points, `None` without points.
    pub fn around<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        points.into_iter().fold(None, |bounds, position| {
            let (lat, lon) = (position.latitude(), position.longitude());
            Some(match bounds {
                None => Bounds {
                    south: lat,
                    west: lon,
                    north: lat,
                    east: lon,
                },
                Some(b) => Bounds {
                    south: b.south.min(lat),
                    west: b.west.min(lon),
                    north: b.north.max(lat),
                    east: b.east.max(lon),
                },
            })
        })
    }

    /// Grows every side by `ratio` of the span, clamped to valid coordinates.
    pub fn padded(self, ratio: f64) -> Self {
        let lat_buffer = (self.north - self.south).abs() * ratio;
        let lon_buffer = (self.east - self.west).abs() * ratio;
        Bounds {
            south: (self.south - lat_buffer).max(-90.0),
            west: (self.west - lon_buffer).max(-180.0),
            north: (self.north + lat_buffer).min(90.0),
            east: (self.east + lon_buffer).min(180.0),
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        (self.south..=self.north).contains(&position.latitude())
            && (self.west..=self.east).contains(&position.longitude())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Viewport {
    Fit { bounds: Bounds },
    Focus { center: Position, zoom: u8 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct MapViewState {
    pub markers: Vec<Marker>,
    pub path: Vec<Position>,
    pub viewport: Option<Viewport>,
}

impl MapViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn clear_markers(mut self) -> Self {
        self.markers.clear();
        self
    }

    /// Replaces all markers with plain waypoint markers and fits the view.
    pub fn show_waypoints<'w, I>(self, waypoints: I) -> Self
    where
        I: IntoIterator<Item = &'w Waypoint>,
    {
        let mut state = self.clear_markers();
        state.markers.extend(
            waypoints
                .into_iter()
                .map(|waypoint| Marker::new(waypoint, MarkerKind::Waypoint)),
        );
        let positions = state.markers.iter().map(|marker| marker.position).collect_vec();
        state.fit_to(positions)
    }

    pub fn draw_path(mut self, path: Vec<Position>) -> Self {
        self.path = path;
        self
    }

    pub fn clear_path(mut self) -> Self {
        self.path.clear();
        self
    }

    /// Fits the viewport to the points with 10% padding. Keeps the current
    /// viewport when there is nothing to fit.
    pub fn fit_to<I>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        if let Some(bounds) = Bounds::around(points) {
            self.viewport = Some(Viewport::Fit {
                bounds: bounds.padded(VIEWPORT_PADDING),
            });
        }
        self
    }

    /// Draws the closed tour. The start is marked once, every other stop gets
    /// a waypoint marker.
    pub fn show_tour(self, tour: &Tour) -> Self {
        let mut state = self.clear_markers();
        let stops = tour.order().split_last().map_or(&[][..], |(_, stops)| stops);
        for (index, waypoint) in stops.iter().enumerate() {
            let kind = if index == 0 {
                MarkerKind::Start
            } else {
                MarkerKind::Waypoint
            };
            state = state.place_marker(Marker::new(waypoint, kind));
        }
        let path = tour.positions();
        state.draw_path(path.clone()).fit_to(path)
    }

    pub fn show_route(self, start: &Waypoint, end: &Waypoint, route: &RouteResult) -> Self {
        let path = if route.geometry.is_empty() {
            vec![start.position(), end.position()]
        } else {
            route.geometry.clone()
        };
        self.clear_markers()
            .place_marker(Marker::new(start, MarkerKind::Start))
            .place_marker(Marker::new(end, MarkerKind::End))
            .draw_path(path.clone())
            .fit_to(path)
    }

    /// Marks both ends of a walk and draws it through every hop.
    pub fn show_path(self, path: &[Waypoint]) -> Self {
        let mut state = self.clear_markers();
        if let Some(first) = path.first() {
            state = state.place_marker(Marker::new(first, MarkerKind::Start));
        }
        if let Some(last) = path.last().filter(|_| path.len() > 1) {
            state = state.place_marker(Marker::new(last, MarkerKind::End));
        }
        let positions = path.iter().map(Waypoint::position).collect_vec();
        state.draw_path(positions.clone()).fit_to(positions)
    }

    /// Centres on a single place, e.g. the venue of an event.
    pub fn focus_on(self, waypoint: &Waypoint) -> Self {
        let mut state = self
            .clear_path()
            .clear_markers()
            .place_marker(Marker::new(waypoint, MarkerKind::Venue));
        state.viewport = Some(Viewport::Focus {
            center: waypoint.position(),
            zoom: FOCUS_ZOOM,
        });
        state
    }
}

/// One line summary shown under the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_min: Option<f64>,
}

impl RouteSummary {
    pub fn for_route(route: &RouteResult) -> Self {
        Self {
            distance_km: route.distance_km(),
            duration_min: Some(route.duration_min()),
        }
    }

    pub fn for_tour(tour: &Tour) -> Self {
        Self {
            distance_km: tour.total_distance_km(),
            duration_min: None,
        }
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance: {:.2} km", self.distance_km)?;
        if let Some(duration) = self.duration_min {
            write!(f, " | Duration: {:.1} min", duration)?;
        }
        Ok(())
    }
}

/// Turn-by-turn lines, numbered from 1.
pub fn step_lines(route: &RouteResult) -> Vec<String> {
    route
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            format!(
                "Step {}: {} ({:.2} km)",
                index + 1,
                step.instruction,
                step.distance_km()
            )
        })
        .collect()
}

pub fn path_label(tour: &Tour) -> String {
    tour.names().join(" → ")
}

#[cfg(test)]
mod tests {
    use model::{route::RouteStep, ExampleData};

    use super::*;

    fn position(latitude: f64, longitude: f64) -> Position {
        Position::new(latitude, longitude).unwrap()
    }

    fn waypoint(name: &str, latitude: f64, longitude: f64) -> Waypoint {
        Waypoint::new(name, latitude, longitude).unwrap()
    }

    #[test]
    fn bounds_around_points() {
        assert_eq!(Bounds::around(Vec::new()), None);
        let bounds = Bounds::around(vec![position(1.0, 2.0), position(-1.0, 4.0)]).unwrap();
        assert_eq!(
            bounds,
            Bounds {
                south: -1.0,
                west: 2.0,
                north: 1.0,
                east: 4.0
            }
        );
        assert!(bounds.contains(position(0.0, 3.0)));
        assert!(!bounds.contains(position(0.0, 5.0)));
    }

    #[test]
    fn padding_extends_and_clamps() {
        let bounds = Bounds {
            south: 0.0,
            west: 0.0,
            north: 10.0,
            east: 20.0,
        }
        .padded(0.1);
        assert_eq!(bounds.south, -1.0);
        assert_eq!(bounds.north, 11.0);
        assert_eq!(bounds.west, -2.0);
        assert_eq!(bounds.east, 22.0);

        let polar = Bounds {
            south: 80.0,
            west: 170.0,
            north: 90.0,
            east: 180.0,
        }
        .padded(0.5);
        assert_eq!(polar.north, 90.0);
        assert_eq!(polar.east, 180.0);
    }

    #[test]
    fn state_is_passed_through_explicitly() {
        let library = waypoint("Library", 13.262621, 80.026525);
        let pond = waypoint("Pond", 13.262198, 80.027673);

        let state = MapViewState::new()
            .show_waypoints([&library, &pond])
            .draw_path(vec![library.position(), pond.position()]);
        assert_eq!(state.markers.len(), 2);
        assert_eq!(state.path.len(), 2);
        assert!(matches!(state.viewport, Some(Viewport::Fit { .. })));

        let state = state.clear_path().clear_markers();
        assert!(state.markers.is_empty());
        assert!(state.path.is_empty());
        // viewport survives clearing
        assert!(state.viewport.is_some());
    }

    #[test]
    fn fitting_nothing_keeps_the_viewport() {
        let state = MapViewState::new().fit_to(Vec::new());
        assert_eq!(state.viewport, None);
    }

    #[test]
    fn tour_marks_each_stop_once() {
        let a = waypoint("A", 0.0, 0.0);
        let b = waypoint("B", 0.0, 1.0);
        let tour = Tour::new(vec![a.clone(), b.clone(), a.clone()], 2.0 * a.distance_km(&b));

        let state = MapViewState::new().show_tour(&tour);
        assert_eq!(state.markers.len(), 2);
        assert_eq!(state.markers[0].kind, MarkerKind::Start);
        assert_eq!(state.markers[1].kind, MarkerKind::Waypoint);
        assert_eq!(state.path.len(), 3);
        assert_eq!(state.path.first(), state.path.last());
    }

    #[test]
    fn route_without_geometry_draws_a_straight_line() {
        let start = waypoint("Library", 13.262621, 80.026525);
        let end = waypoint("Pond", 13.262198, 80.027673);
        let mut route = RouteResult::example_data();
        route.geometry.clear();

        let state = MapViewState::new().show_route(&start, &end, &route);
        assert_eq!(state.path, vec![start.position(), end.position()]);
        assert_eq!(state.markers[1].kind, MarkerKind::End);
    }

    #[test]
    fn focus_replaces_markers_and_path() {
        let venue = waypoint("Lab Block", 13.262768, 80.028147);
        let state = MapViewState::new()
            .draw_path(vec![position(0.0, 0.0)])
            .focus_on(&venue);
        assert!(state.path.is_empty());
        assert_eq!(state.markers.len(), 1);
        assert_eq!(
            state.viewport,
            Some(Viewport::Focus {
                center: venue.position(),
                zoom: FOCUS_ZOOM
            })
        );
    }

    #[test]
    fn path_marks_both_ends() {
        let a = waypoint("A", 0.0, 0.0);
        let b = waypoint("B", 0.0, 1.0);
        let c = waypoint("C", 1.0, 1.0);
        let state = MapViewState::new().show_path(&[a.clone(), b, c.clone()]);
        assert_eq!(
            state.markers,
            vec![
                Marker::new(&a, MarkerKind::Start),
                Marker::new(&c, MarkerKind::End)
            ]
        );
        assert_eq!(state.path.len(), 3);
        assert!(matches!(state.viewport, Some(Viewport::Fit { .. })));

        let state = MapViewState::new().show_path(&[a.clone()]);
        assert_eq!(state.markers, vec![Marker::new(&a, MarkerKind::Start)]);
    }

    #[test]
    fn summary_wording() {
        let route = RouteResult {
            geometry: Vec::new(),
            distance: 1234.0,
            duration: 930.0,
            steps: Vec::new(),
        };
        assert_eq!(
            RouteSummary::for_route(&route).to_string(),
            "Distance: 1.23 km | Duration: 15.5 min"
        );

        let a = waypoint("A", 0.0, 0.0);
        let tour = Tour::new(vec![a.clone(), a], 0.0);
        assert_eq!(RouteSummary::for_tour(&tour).to_string(), "Distance: 0.00 km");
    }

    #[test]
    fn numbered_steps() {
        let route = RouteResult {
            geometry: Vec::new(),
            distance: 200.0,
            duration: 144.0,
            steps: vec![
                RouteStep {
                    instruction: "Head north".to_owned(),
                    distance: 150.0,
                },
                RouteStep {
                    instruction: "Turn right".to_owned(),
                    distance: 50.0,
                },
            ],
        };
        assert_eq!(
            step_lines(&route),
            vec!["Step 1: Head north (0.15 km)", "Step 2: Turn right (0.05 km)"]
        );
    }

    #[test]
    fn tour_label() {
        let a = waypoint("A", 0.0, 0.0);
        let b = waypoint("B", 0.0, 1.0);
        let tour = Tour::new(vec![a.clone(), b, a], 0.0);
        assert_eq!(path_label(&tour), "A → B → A");
    }
}

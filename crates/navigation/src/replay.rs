use std::slice::Windows;

use model::{tour::Tour, waypoint::Waypoint};
use schemars::JsonSchema;
use serde::Serialize;

/// One leg of a finished tour, for step-by-step presentation.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplayStep {
    pub step: usize,
    pub from: String,
    pub to: String,
    pub leg_km: f64,
    pub cumulative_km: f64,
}

/// Walks an already built tour leg by leg. The replay never changes the tour,
/// so the pace of an animation has no influence on the result.
#[derive(Debug, Clone)]
pub struct TourReplay<'a> {
    legs: Windows<'a, Waypoint>,
    step: usize,
    cumulative_km: f64,
}

impl<'a> TourReplay<'a> {
    pub fn new(tour: &'a Tour) -> Self {
        Self {
            legs: tour.order().windows(2),
            step: 0,
            cumulative_km: 0.0,
        }
    }
}

impl<'a> Iterator for TourReplay<'a> {
    type Item = ReplayStep;

    fn next(&mut self) -> Option<Self::Item> {
        let [from, to] = self.legs.next()? else {
            return None;
        };
        let leg_km = from.distance_km(to);
        self.step += 1;
        self.cumulative_km += leg_km;
        Some(ReplayStep {
            step: self.step,
            from: from.name().to_owned(),
            to: to.name().to_owned(),
            leg_km,
            cumulative_km: self.cumulative_km,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.legs.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use model::waypoint::{WaypointSet, WaypointTable};

    use super::*;
    use crate::tour::nearest_neighbor_tour;

    #[test]
    fn replay_ends_at_the_tour_total() {
        let table = WaypointTable::campus();
        let set = table.campus_set();
        for start in set.iter() {
            let tour = nearest_neighbor_tour(&set, start.name()).unwrap();
            let steps: Vec<_> = TourReplay::new(&tour).collect();
            assert_eq!(steps.len(), set.len());
            assert_eq!(steps.first().unwrap().from, start.name());
            assert_eq!(steps.last().unwrap().to, start.name());
            assert!((steps.last().unwrap().cumulative_km - tour.total_distance_km()).abs() < 1e-9);
        }
    }

    #[test]
    fn steps_are_numbered_and_accumulate() {
        let waypoints = vec![
            Waypoint::new("A", 0.0, 0.0).unwrap(),
            Waypoint::new("B", 0.0, 1.0).unwrap(),
        ];
        let set = WaypointSet::new(&waypoints).unwrap();
        let tour = nearest_neighbor_tour(&set, "A").unwrap();

        let steps: Vec<_> = TourReplay::new(&tour).collect();
        assert_eq!(steps[0].step, 1);
        assert_eq!(steps[1].step, 2);
        assert_eq!(steps[1].from, "B");
        assert_eq!(steps[1].cumulative_km, steps[0].leg_km + steps[1].leg_km);
    }

    #[test]
    fn single_stop_tour_has_one_empty_leg() {
        let waypoints = vec![Waypoint::new("Only", 1.0, 1.0).unwrap()];
        let set = WaypointSet::new(&waypoints).unwrap();
        let tour = nearest_neighbor_tour(&set, "Only").unwrap();
        let steps: Vec<_> = TourReplay::new(&tour).collect();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].leg_km, 0.0);
    }
}

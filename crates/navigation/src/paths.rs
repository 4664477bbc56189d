//! All-pairs shortest paths over the walkway graph.
//!
//! [`PathNetwork`] runs Floyd–Warshall once when it is built and keeps the
//! next-hop table, so answering a query only walks the stored hops. Walkways
//! are directed; a two-way walkway is two edges.

use std::{collections::HashMap, error::Error, fmt};

use model::{
    path::PathEdge,
    waypoint::{Waypoint, WaypointTable},
};
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    UnknownWaypoint(String),
    NoPath { start: String, end: String },
    InvalidDistance { start: String, end: String, distance: f64 },
}

impl Error for PathError {}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PathError::UnknownWaypoint(name) => write!(f, "Unknown waypoint '{}'.", name),
            PathError::NoPath { .. } => write!(f, "No path exists between these locations."),
            PathError::InvalidDistance {
                start,
                end,
                distance,
            } => write!(
                f,
                "Walkway '{}' → '{}' has an invalid distance of {}.",
                start, end, distance
            ),
        }
    }
}

/// A shortest walk. `distance` is in meters.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ShortestPath {
    pub path: Vec<Waypoint>,
    pub distance: f64,
}

impl ShortestPath {
    pub fn names(&self) -> Vec<&str> {
        self.path.iter().map(Waypoint::name).collect()
    }

    pub fn distance_km(&self) -> f64 {
        self.distance / 1000.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathNetwork {
    nodes: Vec<Waypoint>,
    index: HashMap<String, usize>,
    edges: Vec<PathEdge>,
    dist: Vec<Vec<f64>>,
    next: Vec<Vec<Option<usize>>>,
}

impl PathNetwork {
    /// Every waypoint of `table` becomes a node. Both ends of each edge must
    /// be in the table. Of parallel edges the shortest one counts.
    pub fn new(table: &WaypointTable, edges: Vec<PathEdge>) -> Result<Self, PathError> {
        let nodes = table.iter().cloned().collect::<Vec<_>>();
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, waypoint)| (waypoint.name().to_owned(), i))
            .collect::<HashMap<_, _>>();

        let n = nodes.len();
        let mut dist = vec![vec![f64::INFINITY; n]; n];
        let mut next = vec![vec![None; n]; n];
        for i in 0..n {
            dist[i][i] = 0.0;
            next[i][i] = Some(i);
        }

        for edge in &edges {
            if !edge.distance.is_finite() || edge.distance < 0.0 {
                return Err(PathError::InvalidDistance {
                    start: edge.start.clone(),
                    end: edge.end.clone(),
                    distance: edge.distance,
                });
            }
            let lookup = |name: &str| {
                index
                    .get(name)
                    .copied()
                    .ok_or_else(|| PathError::UnknownWaypoint(name.to_owned()))
            };
            let (i, j) = (lookup(&edge.start)?, lookup(&edge.end)?);
            if edge.distance < dist[i][j] {
                dist[i][j] = edge.distance;
                next[i][j] = Some(j);
            }
        }

        for k in 0..n {
            for i in 0..n {
                if dist[i][k].is_infinite() {
                    continue;
                }
                for j in 0..n {
                    let through = dist[i][k] + dist[k][j];
                    if through < dist[i][j] {
                        dist[i][j] = through;
                        next[i][j] = next[i][k];
                    }
                }
            }
        }

        log::info!("built path network: {} waypoints, {} walkways.", n, edges.len());
        Ok(Self {
            nodes,
            index,
            edges,
            dist,
            next,
        })
    }

    pub fn edges(&self) -> &[PathEdge] {
        &self.edges
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Shortest walk from `start` to `end`, both ends included. Asking for
    /// the path from a waypoint to itself yields just that waypoint.
    pub fn shortest_path(&self, start: &str, end: &str) -> Result<ShortestPath, PathError> {
        let from = self.position_of(start)?;
        let to = self.position_of(end)?;
        let no_path = || PathError::NoPath {
            start: start.to_owned(),
            end: end.to_owned(),
        };
        if self.dist[from][to].is_infinite() {
            return Err(no_path());
        }

        let mut path = vec![self.nodes[from].clone()];
        let mut current = from;
        while current != to {
            current = self.next[current][to].ok_or_else(no_path)?;
            path.push(self.nodes[current].clone());
            // a hop table without cycles never revisits a node
            if path.len() > self.nodes.len() {
                return Err(no_path());
            }
        }
        Ok(ShortestPath {
            path,
            distance: self.dist[from][to],
        })
    }

    fn position_of(&self, name: &str) -> Result<usize, PathError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| PathError::UnknownWaypoint(name.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use model::path::campus_paths;
    use utility::id::Id;

    use super::*;

    fn edge(id: u64, start: &str, end: &str, distance: f64) -> PathEdge {
        PathEdge {
            id: Id::new(id),
            start: start.to_owned(),
            end: end.to_owned(),
            distance,
        }
    }

    fn two_way(edges: &[(&str, &str, f64)]) -> Vec<PathEdge> {
        edges
            .iter()
            .flat_map(|&(a, b, distance)| [(a, b, distance), (b, a, distance)])
            .enumerate()
            .map(|(i, (a, b, distance))| edge(i as u64 + 1, a, b, distance))
            .collect()
    }

    fn table() -> WaypointTable {
        WaypointTable::from_waypoints(
            [
                ("A", 0.0, 0.0),
                ("B", 0.0, 0.001),
                ("C", 0.0, 0.002),
                ("D", 0.001, 0.0),
                ("E", 0.002, 0.0),
                ("F", 1.0, 1.0),
            ]
            .into_iter()
            .map(|(name, latitude, longitude)| Waypoint::new(name, latitude, longitude).unwrap()),
        )
        .unwrap()
    }

    fn network() -> PathNetwork {
        PathNetwork::new(
            &table(),
            two_way(&[
                ("A", "B", 100.0),
                ("B", "C", 120.0),
                ("A", "D", 80.0),
                ("D", "E", 200.0),
                ("A", "C", 300.0),
            ]),
        )
        .unwrap()
    }

    #[test]
    fn path_through_intermediate_waypoints() {
        let network = network();

        let path = network.shortest_path("A", "C").unwrap();
        assert_eq!(path.names(), vec!["A", "B", "C"]);
        assert_eq!(path.distance, 220.0);

        let path = network.shortest_path("C", "E").unwrap();
        assert_eq!(path.names(), vec!["C", "B", "A", "D", "E"]);
        assert_eq!(path.distance, 500.0);
        assert_eq!(path.distance_km(), 0.5);
    }

    #[test]
    fn unreachable_pair() {
        let network = network();
        assert_eq!(
            network.shortest_path("A", "F"),
            Err(PathError::NoPath {
                start: "A".to_owned(),
                end: "F".to_owned()
            })
        );
        assert!(network.shortest_path("F", "E").is_err());
    }

    #[test]
    fn one_way_walkways_are_not_walked_backwards() {
        let network =
            PathNetwork::new(&table(), vec![edge(1, "A", "B", 50.0), edge(2, "B", "C", 50.0)])
                .unwrap();
        assert_eq!(network.shortest_path("A", "C").unwrap().distance, 100.0);
        assert!(matches!(
            network.shortest_path("C", "A"),
            Err(PathError::NoPath { .. })
        ));
    }

    #[test]
    fn start_equals_end() {
        let network = network();
        let path = network.shortest_path("B", "B").unwrap();
        assert_eq!(path.names(), vec!["B"]);
        assert_eq!(path.distance, 0.0);

        // isolated waypoints still reach themselves
        assert_eq!(network.shortest_path("F", "F").unwrap().names(), vec!["F"]);
    }

    #[test]
    fn unknown_endpoint() {
        let network = network();
        assert_eq!(
            network.shortest_path("A", "Z"),
            Err(PathError::UnknownWaypoint("Z".to_owned()))
        );
        assert_eq!(
            network.shortest_path("Z", "A"),
            Err(PathError::UnknownWaypoint("Z".to_owned()))
        );
    }

    #[test]
    fn rejects_bad_walkways() {
        assert_eq!(
            PathNetwork::new(&table(), vec![edge(1, "A", "Q", 10.0)]).unwrap_err(),
            PathError::UnknownWaypoint("Q".to_owned())
        );
        assert!(matches!(
            PathNetwork::new(&table(), vec![edge(1, "A", "B", -1.0)]),
            Err(PathError::InvalidDistance { .. })
        ));
        assert!(matches!(
            PathNetwork::new(&table(), vec![edge(1, "A", "B", f64::NAN)]),
            Err(PathError::InvalidDistance { .. })
        ));
    }

    #[test]
    fn shortest_parallel_walkway_counts() {
        let network = PathNetwork::new(
            &table(),
            vec![edge(1, "A", "B", 90.0), edge(2, "A", "B", 40.0)],
        )
        .unwrap();
        assert_eq!(network.shortest_path("A", "B").unwrap().distance, 40.0);
        assert_eq!(network.edges().len(), 2);
    }

    #[test]
    fn campus_walkways() {
        let table = WaypointTable::campus();
        let network = PathNetwork::new(&table, campus_paths(&table)).unwrap();

        let path = network.shortest_path("Library", "Canteen").unwrap();
        assert_eq!(path.names().first(), Some(&"Library"));
        assert_eq!(path.names().last(), Some(&"Canteen"));
        assert!(path.path.len() > 2);
        assert!(path.distance > 0.0);

        let back = network.shortest_path("Canteen", "Library").unwrap();
        assert!((back.distance - path.distance).abs() < 1e-9);

        assert!(matches!(
            network.shortest_path("Chennai", "Library"),
            Err(PathError::NoPath { .. })
        ));
    }
}

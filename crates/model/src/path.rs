//! Walkways between waypoints, the edges shortest paths are searched over.

use std::{io, path::Path};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{
    waypoint::{WaypointError, WaypointTable},
    ExampleData,
};

/// Walkways of the built-in campus table. Each one can be walked in both
/// directions.
const CAMPUS_WALKWAYS: &[(&str, &str)] = &[
    ("Academic Block", "Library"),
    ("Academic Block", "Pond"),
    ("Academic Block", "Lab Block"),
    ("Lab Block", "Canteen"),
    ("Lab Block", "Junior Boys Hostel"),
    ("Library", "AVV Gym for Girls"),
    ("Library", "Junior Girls Hostel"),
    ("Pond", "AVV Gym for Girls"),
    ("Pond", "Mechanical Lab"),
    ("Junior Boys Hostel", "Senior Girls Hostel"),
    ("Mechanical Lab", "Volley Ball Court"),
    ("Volley Ball Court", "Basket Ball Court"),
    ("Basket Ball Court", "Senior Boys Hostel"),
    ("Senior Boys Hostel", "Senior Girls Hostel"),
    ("Senior Boys Hostel", "2nd Year Boys Hostel"),
    ("2nd Year Boys Hostel", "AVV Ground"),
    ("AVV Ground", "Amrita Indoor Stadium"),
    ("Amrita Indoor Stadium", "AVV Gym for Boys"),
    ("AVV Gym for Boys", "Junior Girls Hostel"),
];

/// A directed walkway from `start` to `end`. `distance` is in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PathEdge {
    pub id: Id<PathEdge>,
    pub start: String,
    pub end: String,
    pub distance: f64,
}

impl HasId for PathEdge {
    type IdType = u64;
}

impl ExampleData for PathEdge {
    fn example_data() -> Self {
        PathEdge {
            id: Id::new(1),
            start: "Academic Block".to_owned(),
            end: "Library".to_owned(),
            distance: 107.2,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PathRecord {
    start: String,
    end: String,
    distance: f64,
}

/// The campus walkways, both directions each, measured along the straight
/// line between their ends. Walkways with an end missing from `table` are
/// left out, so a custom table only keeps the walkways it can place.
pub fn campus_paths(table: &WaypointTable) -> Vec<PathEdge> {
    CAMPUS_WALKWAYS
        .iter()
        .filter_map(|&(start, end)| {
            let distance = table.get(start)?.distance_km(table.get(end)?) * 1000.0;
            Some([(start, end, distance), (end, start, distance)])
        })
        .flatten()
        .enumerate()
        .map(|(index, (start, end, distance))| PathEdge {
            id: Id::new(index as u64 + 1),
            start: start.to_owned(),
            end: end.to_owned(),
            distance,
        })
        .collect()
}

/// Reads directed `start,end,distance` rows, distance in meters. The header
/// line is required, ids are assigned in row order.
pub fn paths_from_csv_reader<R: io::Read>(reader: R) -> Result<Vec<PathEdge>, WaypointError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut edges = vec![];
    for (index, record) in reader.deserialize::<PathRecord>().enumerate() {
        let record = record?;
        edges.push(PathEdge {
            id: Id::new(index as u64 + 1),
            start: record.start,
            end: record.end,
            distance: record.distance,
        });
    }
    Ok(edges)
}

pub fn paths_from_csv_path<P: AsRef<Path>>(path: P) -> Result<Vec<PathEdge>, WaypointError> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|why| WaypointError::from(csv::Error::from(why)))?;
    paths_from_csv_reader(file)
}

//! Named points of interest and the table they are configured in.
//!
//! The table is loaded once at startup and never mutated afterwards. Its
//! iteration order is the insertion order, which the tour builder relies on
//! to break ties between equidistant waypoints deterministically.

use std::{error, fmt, io, path::Path, sync::Arc};

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::haversine_distance;

use crate::ExampleData;

/// City level reference points of the campus table. They are useful as map
/// markers but never part of a walking tour.
pub const REFERENCE_POINTS: &[&str] = &[
    "Chennai",
    "Delhi",
    "Mumbai",
    "Kolkata",
    "Hyderabad",
    "Bengaluru",
    "Amrita Vishwa Vidyapeetham",
];

const CAMPUS: &[(&str, f64, f64)] = &[
    ("Academic Block", 13.263018, 80.027427),
    ("Library", 13.262621, 80.026525),
    ("Canteen", 13.262856, 80.028401),
    ("Pond", 13.262198, 80.027673),
    ("AVV Gym for Girls", 13.262141, 80.026830),
    ("Chennai", 13.080917019874969, 80.26358605588356),
    ("Delhi", 28.675015901626473, 77.21675859763418),
    ("Mumbai", 19.07598369140625, 72.877685546875),
    ("Kolkata", 22.5726455078125, 88.3638671875),
    ("Hyderabad", 17.432607421875, 78.4736328125),
    ("Bengaluru", 12.971593933105469, 77.5945263671875),
    ("Junior Girls Hostel", 13.261993, 80.026421),
    ("Junior Boys Hostel", 13.261805, 80.028076),
    ("Lab Block", 13.262768, 80.028147),
    ("Mechanical Lab", 13.261205, 80.027488),
    ("Volley Ball Court", 13.261009, 80.027530),
    ("Basket Ball Court", 13.260909, 80.027256),
    ("Senior Girls Hostel", 13.260658, 80.028184),
    ("Senior Boys Hostel", 13.260550, 80.027272),
    ("2nd Year Boys Hostel", 13.259570, 80.026694),
    ("Amrita Indoor Stadium", 13.259880, 80.025990),
    ("AVV Gym for Boys", 13.260146, 80.026143),
    ("AVV Ground", 13.259708, 80.025416),
    ("Amrita Vishwa Vidyapeetham", 13.2630, 80.0274),
];

#[derive(Debug, Clone)]
pub enum WaypointError {
    BlankName,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
    DuplicateName(String),
    Csv(Arc<csv::Error>),
}

impl error::Error for WaypointError {}

impl fmt::Display for WaypointError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WaypointError::BlankName => write!(f, "Waypoint name must not be blank."),
            WaypointError::LatitudeOutOfRange(lat) => {
                write!(f, "Latitude {} is outside of -90..90.", lat)
            }
            WaypointError::LongitudeOutOfRange(lon) => {
                write!(f, "Longitude {} is outside of -180..180.", lon)
            }
            WaypointError::DuplicateName(name) => {
                write!(f, "Waypoint '{}' is defined more than once.", name)
            }
            WaypointError::Csv(e) => write!(f, "Waypoint file error: {}", e),
        }
    }
}

impl From<csv::Error> for WaypointError {
    fn from(e: csv::Error) -> Self {
        WaypointError::Csv(Arc::new(e))
    }
}

/// Latitude/longitude in degrees, always within the valid ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "Coordinates")]
pub struct Position {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize, JsonSchema)]
struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<Coordinates> for Position {
    type Error = WaypointError;

    fn try_from(value: Coordinates) -> Result<Self, Self::Error> {
        Position::new(value.latitude, value.longitude)
    }
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WaypointError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(WaypointError::LatitudeOutOfRange(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(WaypointError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// For coordinates that are known to be in range at compile time.
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance in kilometers.
    pub fn distance_km(&self, other: &Position) -> f64 {
        haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Flat row shape shared by the CSV file and the JSON wire format.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WaypointRecord {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "WaypointRecord")]
pub struct Waypoint {
    name: String,
    #[serde(flatten)]
    position: Position,
}

impl TryFrom<WaypointRecord> for Waypoint {
    type Error = WaypointError;

    fn try_from(record: WaypointRecord) -> Result<Self, Self::Error> {
        Waypoint::new(record.name, record.latitude, record.longitude)
    }
}

impl Waypoint {
    pub fn new<S: Into<String>>(
        name: S,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, WaypointError> {
        let name: String = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(WaypointError::BlankName);
        }
        Ok(Self {
            name: name.to_owned(),
            position: Position::new(latitude, longitude)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn distance_km(&self, other: &Waypoint) -> f64 {
        self.position.distance_km(&other.position)
    }
}

impl ExampleData for Waypoint {
    fn example_data() -> Self {
        Waypoint {
            name: "Library".to_owned(),
            position: Position::new_unchecked(13.262621, 80.026525),
        }
    }
}

/// All configured waypoints keyed by their unique name, in load order.
#[derive(Debug, Clone, Default)]
pub struct WaypointTable {
    waypoints: IndexMap<String, Waypoint>,
}

impl WaypointTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in campus table, including the city level reference points.
    pub fn campus() -> Self {
        let waypoints = CAMPUS
            .iter()
            .map(|&(name, latitude, longitude)| {
                (
                    name.to_owned(),
                    Waypoint {
                        name: name.to_owned(),
                        position: Position::new_unchecked(latitude, longitude),
                    },
                )
            })
            .collect();
        Self { waypoints }
    }

    pub fn from_waypoints<I>(waypoints: I) -> Result<Self, WaypointError>
    where
        I: IntoIterator<Item = Waypoint>,
    {
        let mut table = Self::new();
        for waypoint in waypoints {
            table.insert(waypoint)?;
        }
        Ok(table)
    }

    /// Reads `name,latitude,longitude` rows. The header line is required.
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self, WaypointError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut table = Self::new();
        for record in reader.deserialize::<WaypointRecord>() {
            table.insert(Waypoint::try_from(record?)?)?;
        }
        log::info!("loaded {} waypoints.", table.len());
        Ok(table)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, WaypointError> {
        let file = std::fs::File::open(path.as_ref())
            .map_err(|why| WaypointError::from(csv::Error::from(why)))?;
        Self::from_csv_reader(file)
    }

    pub fn insert(&mut self, waypoint: Waypoint) -> Result<(), WaypointError> {
        if self.waypoints.contains_key(&waypoint.name) {
            return Err(WaypointError::DuplicateName(waypoint.name));
        }
        self.waypoints.insert(waypoint.name.clone(), waypoint);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Waypoint> {
        self.waypoints.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.waypoints.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> + '_ {
        self.waypoints.values()
    }

    /// Every waypoint except the excluded names, keeping table order.
    pub fn tour_set(&self, excluded: &[&str]) -> WaypointSet<'_> {
        WaypointSet {
            members: self
                .iter()
                .filter(|waypoint| !excluded.contains(&waypoint.name()))
                .collect(),
        }
    }

    /// The campus locations only, i.e. without [`REFERENCE_POINTS`].
    pub fn campus_set(&self) -> WaypointSet<'_> {
        self.tour_set(REFERENCE_POINTS)
    }
}

/// Read-only selection of waypoints a tour is built over. Names are unique
/// and the order is the iteration order of the source.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointSet<'a> {
    members: Vec<&'a Waypoint>,
}

impl<'a> WaypointSet<'a> {
    pub fn new(waypoints: &'a [Waypoint]) -> Result<Self, WaypointError> {
        Self::from_refs(waypoints.iter().collect())
    }

    pub fn from_refs(members: Vec<&'a Waypoint>) -> Result<Self, WaypointError> {
        for (index, waypoint) in members.iter().enumerate() {
            if members[..index].iter().any(|w| w.name == waypoint.name) {
                return Err(WaypointError::DuplicateName(waypoint.name.clone()));
            }
        }
        Ok(Self { members })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Waypoint> {
        self.members.get(index).copied()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|waypoint| waypoint.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn first(&self) -> Option<&'a Waypoint> {
        self.members.first().copied()
    }

    pub fn members(&self) -> &[&'a Waypoint] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Waypoint> + '_ {
        self.members.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_rejects_out_of_range() {
        assert!(matches!(
            Position::new(91.0, 0.0),
            Err(WaypointError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            Position::new(0.0, -180.5),
            Err(WaypointError::LongitudeOutOfRange(_))
        ));
        assert!(matches!(
            Position::new(f64::NAN, 0.0),
            Err(WaypointError::LatitudeOutOfRange(_))
        ));
        assert!(Position::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn waypoint_rejects_blank_name() {
        assert!(matches!(
            Waypoint::new("   ", 0.0, 0.0),
            Err(WaypointError::BlankName)
        ));
        assert_eq!(Waypoint::new(" Pond ", 1.0, 2.0).unwrap().name(), "Pond");
    }

    #[test]
    fn waypoint_json_is_a_flat_record() {
        let json = serde_json::to_value(Waypoint::example_data()).unwrap();
        assert_eq!(json["name"], "Library");
        assert_eq!(json["latitude"], 13.262621);
        assert_eq!(json["longitude"], 80.026525);

        let back: Waypoint = serde_json::from_value(json).unwrap();
        assert_eq!(back, Waypoint::example_data());
    }

    #[test]
    fn waypoint_json_is_validated() {
        let result: Result<Waypoint, _> =
            serde_json::from_str(r#"{"name": "Nowhere", "latitude": 123.0, "longitude": 0.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn campus_table_is_ordered_and_valid() {
        let table = WaypointTable::campus();
        assert_eq!(table.len(), CAMPUS.len());
        assert_eq!(table.iter().next().unwrap().name(), "Academic Block");
        for waypoint in table.iter() {
            let position = waypoint.position();
            assert!(Position::new(position.latitude(), position.longitude()).is_ok());
        }
    }

    #[test]
    fn campus_set_drops_reference_points() {
        let table = WaypointTable::campus();
        let set = table.campus_set();
        assert_eq!(set.len(), table.len() - REFERENCE_POINTS.len());
        assert!(!set.contains("Delhi"));
        assert!(!set.contains("Amrita Vishwa Vidyapeetham"));
        assert!(set.contains("Pond"));
        // order follows the table
        assert_eq!(set.first().unwrap().name(), "Academic Block");
        assert_eq!(set.get(1).unwrap().name(), "Library");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut table = WaypointTable::new();
        table.insert(Waypoint::new("Pond", 0.0, 0.0).unwrap()).unwrap();
        assert!(matches!(
            table.insert(Waypoint::new("Pond", 1.0, 1.0).unwrap()),
            Err(WaypointError::DuplicateName(name)) if name == "Pond"
        ));

        let waypoints = vec![
            Waypoint::new("A", 0.0, 0.0).unwrap(),
            Waypoint::new("A", 0.0, 1.0).unwrap(),
        ];
        assert!(WaypointSet::new(&waypoints).is_err());
    }

    #[test]
    fn duplicate_coordinates_stay_distinct() {
        let waypoints = vec![
            Waypoint::new("Gate", 1.0, 1.0).unwrap(),
            Waypoint::new("Main Gate", 1.0, 1.0).unwrap(),
        ];
        let set = WaypointSet::new(&waypoints).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(waypoints[0].distance_km(&waypoints[1]), 0.0);
    }

    #[test]
    fn loads_csv() {
        let data = "name,latitude,longitude\n\
                    Library, 13.262621, 80.026525\n\
                    Pond,13.262198,80.027673\n";
        let table = WaypointTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Library").unwrap().position().latitude(), 13.262621);
        assert_eq!(table.iter().last().unwrap().name(), "Pond");
    }

    #[test]
    fn csv_with_invalid_rows_fails() {
        let out_of_range = "name,latitude,longitude\nNowhere,95.0,0.0\n";
        assert!(matches!(
            WaypointTable::from_csv_reader(out_of_range.as_bytes()),
            Err(WaypointError::LatitudeOutOfRange(_))
        ));

        let garbage = "name,latitude,longitude\nNowhere,north,east\n";
        assert!(matches!(
            WaypointTable::from_csv_reader(garbage.as_bytes()),
            Err(WaypointError::Csv(_))
        ));

        let duplicate = "name,latitude,longitude\nPond,1,1\nPond,2,2\n";
        assert!(matches!(
            WaypointTable::from_csv_reader(duplicate.as_bytes()),
            Err(WaypointError::DuplicateName(_))
        ));
    }
}

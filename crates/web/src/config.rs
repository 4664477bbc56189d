use std::{env, path::PathBuf};

use model::{
    path::{campus_paths, paths_from_csv_path, PathEdge},
    waypoint::{WaypointError, WaypointTable},
};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_STATIC_DIR: &str = "./resources/www/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub bind_address: String,
    pub static_dir: PathBuf,
    /// CSV file with `name,latitude,longitude` rows; the built-in campus
    /// table is used without one.
    pub waypoints_file: Option<PathBuf>,
    /// CSV file with directed `start,end,distance` walkways in meters; the
    /// campus walkways are used without one.
    pub paths_file: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            waypoints_file: None,
            paths_file: None,
        }
    }
}

impl WebConfig {
    /// Reads `BIND_ADDRESS`, `STATIC_DIR`, `WAYPOINTS_FILE` and `PATHS_FILE`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            waypoints_file: env::var("WAYPOINTS_FILE").ok().map(PathBuf::from),
            paths_file: env::var("PATHS_FILE").ok().map(PathBuf::from),
        }
    }

    pub fn load_waypoints(&self) -> Result<WaypointTable, WaypointError> {
        match &self.waypoints_file {
            Some(path) => {
                log::info!("Loading waypoints from '{}'.", path.display());
                WaypointTable::from_csv_path(path)
            }
            None => Ok(WaypointTable::campus()),
        }
    }

    pub fn load_paths(&self, table: &WaypointTable) -> Result<Vec<PathEdge>, WaypointError> {
        match &self.paths_file {
            Some(path) => {
                log::info!("Loading walkways from '{}'.", path.display());
                paths_from_csv_path(path)
            }
            None => Ok(campus_paths(table)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WebConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.static_dir, PathBuf::from("./resources/www/"));
        assert_eq!(config.load_waypoints().unwrap().len(), WaypointTable::campus().len());

        let table = WaypointTable::campus();
        assert_eq!(config.load_paths(&table).unwrap(), campus_paths(&table));
    }

    #[test]
    fn missing_waypoints_file_is_an_error() {
        let config = WebConfig {
            waypoints_file: Some(PathBuf::from("/nonexistent/waypoints.csv")),
            ..Default::default()
        };
        assert!(matches!(config.load_waypoints(), Err(WaypointError::Csv(_))));
    }
}

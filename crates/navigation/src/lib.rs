use std::{error::Error, fmt};

pub mod display;
pub mod paths;
pub mod replay;
pub mod search;
pub mod session;
pub mod tour;

/// Rejected tour request. Retrying with the same input can not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    EmptyWaypointSet,
    UnknownStart(String),
}

impl Error for InvalidInput {}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InvalidInput::EmptyWaypointSet => write!(f, "The waypoint set is empty."),
            InvalidInput::UnknownStart(name) => {
                write!(f, "Start waypoint '{}' is not part of the waypoint set.", name)
            }
        }
    }
}

use std::error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use model::{
    event::{Event, EventError, NewEvent},
    venue::Venue,
};
use utility::id::Id;

pub mod client;
pub mod listing;
pub mod memory;

#[derive(Debug, Clone)]
pub enum EventsError {
    NotFound,
    Invalid(EventError),
    /// The backend refused the request with an `{"error": ..}` body.
    Rejected {
        status: u16,
        message: String,
    },
    RequestError(Arc<reqwest::Error>),
    Other(String),
}

impl error::Error for EventsError {}

impl fmt::Display for EventsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventsError::NotFound => write!(f, "Event not found"),
            EventsError::Invalid(why) => write!(f, "{}", why),
            EventsError::Rejected { status, message } => {
                write!(f, "Events backend rejected the request ({}): {}", status, message)
            }
            EventsError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            EventsError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for EventsError {
    fn from(e: reqwest::Error) -> Self {
        EventsError::RequestError(Arc::new(e))
    }
}

impl From<EventError> for EventsError {
    fn from(e: EventError) -> Self {
        EventsError::Invalid(e)
    }
}

pub type EventsResult<T> = Result<T, EventsError>;

/// Storage of campus events and the venues they take place at.
#[async_trait]
pub trait EventsBackend: Send + Sync {
    async fn list_events(&self) -> EventsResult<Vec<Event>>;

    async fn create_event(&self, event: NewEvent) -> EventsResult<Event>;

    async fn delete_event(&self, id: Id<Event>) -> EventsResult<()>;

    async fn list_venues(&self) -> EventsResult<Vec<Venue>>;

    async fn find_event(&self, id: Id<Event>) -> EventsResult<Event> {
        self.list_events()
            .await?
            .into_iter()
            .find(|event| event.id == id)
            .ok_or(EventsError::NotFound)
    }
}

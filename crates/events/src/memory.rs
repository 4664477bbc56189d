use async_trait::async_trait;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use model::{
    event::{Event, NewEvent},
    venue::Venue,
    waypoint::WaypointTable,
};
use tokio::sync::RwLock;
use utility::id::Id;

use crate::{EventsBackend, EventsError, EventsResult};

/// In-process events store, used when no backend is configured. Ids are
/// handed out as the highest existing id plus one.
pub struct MemoryBackend {
    events: RwLock<Vec<Event>>,
    venues: Vec<Venue>,
}

impl MemoryBackend {
    pub fn new(venues: Vec<Venue>, events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(events),
            venues,
        }
    }

    /// Every campus location becomes a venue, numbered in table order, plus
    /// a few sample events.
    pub fn campus(table: &WaypointTable) -> Self {
        let venues: Vec<Venue> = table
            .campus_set()
            .iter()
            .enumerate()
            .map(|(index, waypoint)| Venue {
                id: Id::new(index as u64 + 1),
                name: waypoint.name().to_owned(),
                latitude: waypoint.position().latitude(),
                longitude: waypoint.position().longitude(),
                description: None,
            })
            .collect();

        let samples = [
            (
                "Orientation Day",
                "Academic Block",
                (2023, 9, 1),
                (9, 0),
                (12, 0),
                "Welcome event for new students",
                (2023, 8, 15, 10, 0),
            ),
            (
                "Coding Competition",
                "Lab Block",
                (2023, 9, 15),
                (10, 0),
                (16, 0),
                "Test your programming skills",
                (2023, 8, 20, 14, 30),
            ),
            (
                "Basketball Tournament",
                "Basket Ball Court",
                (2023, 9, 20),
                (14, 0),
                (17, 0),
                "Inter-college basketball competition",
                (2023, 8, 25, 9, 15),
            ),
        ];

        let events = samples
            .into_iter()
            .enumerate()
            .filter_map(
                |(index, (name, venue_name, date, start, end, description, created))| {
                    let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2)?;
                    Some(Event {
                        id: Id::new(index as u64 + 1),
                        name: name.to_owned(),
                        venue_id: venue_id(&venues, venue_name),
                        venue_name: venue_name.to_owned(),
                        date,
                        time: NaiveTime::from_hms_opt(start.0, start.1, 0)?,
                        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0),
                        description: description.to_owned(),
                        created_at: NaiveDate::from_ymd_opt(created.0, created.1, created.2)?
                            .and_hms_opt(created.3, created.4, 0)?,
                    })
                },
            )
            .collect();

        Self::new(venues, events)
    }

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }
}

fn venue_id(venues: &[Venue], name: &str) -> Option<Id<Venue>> {
    venues
        .iter()
        .find(|venue| venue.name.eq_ignore_ascii_case(name))
        .map(|venue| venue.id)
}

#[async_trait]
impl EventsBackend for MemoryBackend {
    async fn list_events(&self) -> EventsResult<Vec<Event>> {
        Ok(self.events.read().await.clone())
    }

    async fn create_event(&self, event: NewEvent) -> EventsResult<Event> {
        event.validate()?;

        let mut events = self.events.write().await;
        let id = events.iter().map(|event| event.id.raw()).max().unwrap_or(0) + 1;
        let venue_id = venue_id(&self.venues, &event.venue_name);
        let event = Event::from_new(Id::new(id), venue_id, event, Self::now());
        log::info!("created event {} '{}'.", event.id, event.name);
        events.push(event.clone());
        Ok(event)
    }

    async fn delete_event(&self, id: Id<Event>) -> EventsResult<()> {
        let mut events = self.events.write().await;
        let index = events
            .iter()
            .position(|event| event.id == id)
            .ok_or(EventsError::NotFound)?;
        let deleted = events.remove(index);
        log::info!("deleted event {} '{}'.", deleted.id, deleted.name);
        Ok(())
    }

    async fn list_venues(&self) -> EventsResult<Vec<Venue>> {
        Ok(self.venues.clone())
    }
}

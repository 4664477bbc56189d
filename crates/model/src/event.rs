use std::{error, fmt};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    id::{HasId, Id},
    serde::{hour_minute, hour_minute_option, timestamp},
};

use crate::{venue::Venue, ExampleData};

#[derive(Debug, Clone, PartialEq)]
pub enum EventError {
    MissingField(&'static str),
    EndNotAfterStart { start: NaiveTime, end: NaiveTime },
}

impl error::Error for EventError {}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventError::MissingField(field) => write!(f, "Missing required field: {}", field),
            EventError::EndNotAfterStart { start, end } => write!(
                f,
                "End time {} must be after start time {}.",
                end.format(hour_minute::FORMAT),
                start.format(hour_minute::FORMAT)
            ),
        }
    }
}

/// A scheduled campus event as stored by the events backend.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    pub id: Id<Event>,
    pub name: String,
    pub venue_id: Option<Id<Venue>>,
    pub venue_name: String,
    pub date: NaiveDate,
    #[serde(with = "hour_minute")]
    #[schemars(schema_with = "hour_minute::schema")]
    pub time: NaiveTime,
    #[serde(with = "hour_minute_option", default)]
    #[schemars(with = "Option<String>")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub description: String,
    #[serde(with = "timestamp")]
    #[schemars(schema_with = "timestamp::schema")]
    pub created_at: NaiveDateTime,
}

impl HasId for Event {
    type IdType = u64;
}

impl Event {
    pub fn from_new(
        id: Id<Event>,
        venue_id: Option<Id<Venue>>,
        new: NewEvent,
        created_at: NaiveDateTime,
    ) -> Self {
        Event {
            id,
            name: new.name,
            venue_id,
            venue_name: new.venue_name,
            date: new.date,
            time: new.time,
            end_time: new.end_time,
            description: new.description,
            created_at,
        }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        self.end_time.map(|end| self.date.and_time(end))
    }

    pub fn time_left(&self, now: NaiveDateTime) -> TimeDelta {
        self.starts_at() - now
    }

    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        self.time_left(now) > TimeDelta::zero()
    }

    /// Human readable countdown until the event starts, e.g. `2 days 3 hours`.
    pub fn time_remaining(&self, now: NaiveDateTime) -> String {
        let left = self.time_left(now);
        if left <= TimeDelta::zero() {
            return "Event has passed".to_owned();
        }

        let days = left.num_days();
        let hours = left.num_hours() % 24;
        let minutes = left.num_minutes() % 60;

        if days > 0 {
            format!("{} {}", plural(days, "day"), plural(hours, "hour"))
        } else if hours > 0 {
            format!("{} {}", plural(hours, "hour"), plural(minutes, "minute"))
        } else {
            plural(minutes, "minute")
        }
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

impl ExampleData for Event {
    fn example_data() -> Self {
        let date = NaiveDate::from_ymd_opt(2023, 8, 25).unwrap_or_default();
        Event {
            id: Id::new(2),
            name: "Coding Competition".to_owned(),
            venue_id: Some(Id::new(3)),
            venue_name: "Lab Block".to_owned(),
            date,
            time: NaiveTime::from_hms_opt(14, 0, 0).unwrap_or_default(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0),
            description: "Test your programming skills in this exciting coding challenge."
                .to_owned(),
            created_at: date.and_hms_opt(9, 15, 0).unwrap_or_default(),
        }
    }
}

/// Payload for creating an event. The backend assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NewEvent {
    pub name: String,
    pub venue_name: String,
    pub date: NaiveDate,
    #[serde(with = "hour_minute")]
    #[schemars(schema_with = "hour_minute::schema")]
    pub time: NaiveTime,
    #[serde(
        with = "hour_minute_option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub description: String,
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), EventError> {
        if self.name.trim().is_empty() {
            return Err(EventError::MissingField("name"));
        }
        if self.venue_name.trim().is_empty() {
            return Err(EventError::MissingField("venue_name"));
        }
        if let Some(end) = self.end_time {
            if end <= self.time {
                return Err(EventError::EndNotAfterStart {
                    start: self.time,
                    end,
                });
            }
        }
        Ok(())
    }
}

impl ExampleData for NewEvent {
    fn example_data() -> Self {
        let event = Event::example_data();
        NewEvent {
            name: event.name,
            venue_name: event.venue_name,
            date: event.date,
            time: event.time,
            end_time: event.end_time,
            description: event.description,
        }
    }
}

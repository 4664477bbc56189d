use std::cmp::Reverse;

use chrono::NaiveDateTime;
use model::event::Event;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventFilter {
    #[default]
    All,
    /// Starts strictly after now.
    Upcoming,
    Past,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventSort {
    /// Newest first.
    #[default]
    CreatedAt,
    /// Soonest start first.
    Expiry,
}

impl EventFilter {
    pub fn matches(&self, event: &Event, now: NaiveDateTime) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Upcoming => event.is_upcoming(now),
            EventFilter::Past => !event.is_upcoming(now),
        }
    }
}

/// Filters and orders events the way the event list presents them. Sorting
/// is stable, so events with equal keys keep their stored order.
pub fn list(
    events: Vec<Event>,
    filter: EventFilter,
    sort: EventSort,
    now: NaiveDateTime,
) -> Vec<Event> {
    let mut events: Vec<Event> = events
        .into_iter()
        .filter(|event| filter.matches(event, now))
        .collect();
    match sort {
        EventSort::CreatedAt => events.sort_by_key(|event| Reverse(event.created_at)),
        EventSort::Expiry => events.sort_by_key(Event::starts_at),
    }
    events
}

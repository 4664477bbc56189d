use std::env;

use async_trait::async_trait;
use model::{
    event::{Event, NewEvent},
    venue::Venue,
};
use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use utility::id::Id;

use crate::{EventsBackend, EventsError, EventsResult};

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the REST events backend (`/api/events`, `/api/locations`).
#[derive(Debug, Clone)]
pub struct HttpEventsBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpEventsBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// Reads `EVENTS_BACKEND_URL`.
    pub fn from_env() -> Option<Self> {
        env::var("EVENTS_BACKEND_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| Self::new(&url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> EventsResult<T> {
        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            status => Err(Self::rejection(status, response).await),
        }
    }

    async fn rejection(status: StatusCode, response: Response) -> EventsError {
        if status == StatusCode::NOT_FOUND {
            return EventsError::NotFound;
        }
        let message = match response.text().await {
            Ok(text) => serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text),
            Err(why) => why.to_string(),
        };
        log::warn!("events backend answered {}: {}", status, message);
        EventsError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl EventsBackend for HttpEventsBackend {
    async fn list_events(&self) -> EventsResult<Vec<Event>> {
        let response = self.client.get(self.url("api/events")).send().await?;
        Self::parse(response).await
    }

    async fn create_event(&self, event: NewEvent) -> EventsResult<Event> {
        event.validate()?;
        let response = self
            .client
            .post(self.url("api/events"))
            .json(&event)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn delete_event(&self, id: Id<Event>) -> EventsResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("api/events/{}", id)))
            .send()
            .await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            status => Err(Self::rejection(status, response).await),
        }
    }

    async fn list_venues(&self) -> EventsResult<Vec<Venue>> {
        let response = self.client.get(self.url("api/locations")).send().await?;
        Self::parse(response).await
    }
}

use std::env;

use async_trait::async_trait;
use chrono::Local;
use model::{
    route::{RouteQuery, RouteResult},
    waypoint::Position,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::{ors::DirectionsResponse, ApiError, DirectionsService};

pub const ORS_API_URL: &str = "https://api.openrouteservice.org";

#[derive(Clone, Debug)]
pub struct OrsCredentials {
    pub api_key: String,
    pub base_url: String,
    pub rate_limit_per_minute: Option<u64>,
    pub proxy: Option<String>,
}

impl OrsCredentials {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_owned(),
            base_url: ORS_API_URL.to_owned(),
            rate_limit_per_minute: None,
            proxy: None,
        }
    }

    /// Reads `ORS_API_KEY` and the optional `ORS_BASE_URL`,
    /// `ORS_RATE_LIMIT_PER_MINUTE` and `ORS_PROXY`. Without an api key there is
    /// no directions service.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("ORS_API_KEY").ok()?;
        let rate_limit_per_minute = match env::var("ORS_RATE_LIMIT_PER_MINUTE") {
            Ok(value) => match value.parse() {
                Ok(limit) => Some(limit),
                Err(why) => {
                    log::warn!("Ignoring ORS_RATE_LIMIT_PER_MINUTE '{}': {}", value, why);
                    None
                }
            },
            Err(_) => None,
        };

        Some(Self {
            api_key,
            base_url: env::var("ORS_BASE_URL").unwrap_or_else(|_| ORS_API_URL.to_owned()),
            rate_limit_per_minute,
            proxy: env::var("ORS_PROXY").ok(),
        })
    }
}

struct DirectionsClientState {
    pub available_requests: u64,
    pub last_refill: chrono::DateTime<Local>,
}

/// OpenRouteService client with an optional client side rate limit.
pub struct DirectionsClient {
    pub credentials: OrsCredentials,
    client: reqwest::Client,
    state: RwLock<DirectionsClientState>,
}

impl DirectionsClient {
    pub fn new(credentials: &OrsCredentials) -> Result<Self, ApiError> {
        /* build the http client once, with optional proxy */
        let client = if let Some(proxy_url) = &credentials.proxy {
            log::info!("Using proxy '{proxy_url}' for directions requests.");
            reqwest::Client::builder()
                .proxy(reqwest::Proxy::all(proxy_url)?)
                .build()?
        } else {
            reqwest::Client::new()
        };

        Ok(Self {
            credentials: credentials.clone(),
            client,
            state: RwLock::new(DirectionsClientState {
                available_requests: credentials.rate_limit_per_minute.unwrap_or(0),
                last_refill: chrono::offset::Local::now(),
            }),
        })
    }

    pub async fn available_requests(&self) -> u64 {
        self.state.read().await.available_requests
    }

    async fn try_decrement_available_requests(&self) -> Result<(), ApiError> {
        if let Some(rate_limit_minutes) = self.credentials.rate_limit_per_minute {
            let mut state = self.state.write().await;

            let minutes_since_last_refill =
                (chrono::offset::Local::now() - state.last_refill).num_minutes();
            if minutes_since_last_refill >= 1 {
                state.available_requests = rate_limit_minutes;
                state.last_refill = chrono::offset::Local::now();
            }

            if state.available_requests != 0 {
                state.available_requests -= 1;
            } else {
                return Err(ApiError::RateLimitReached);
            }
        }
        Ok(())
    }

    /// Fetch json from an endpoint of the provider.
    pub async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.try_decrement_available_requests().await?;

        let url = format!(
            "{}/{}",
            self.credentials.base_url.trim_end_matches('/'),
            endpoint
        );
        log::info!("Requesting Endpoint '{endpoint}'.");

        /* perform get-request, the key travels as query parameter */
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.credentials.api_key.as_str())])
            .query(query)
            .header("accept", "application/json, application/geo+json")
            .send()
            .await?;

        /* parse response */
        match response.status() {
            reqwest::StatusCode::OK => Ok(serde_json::from_str(&response.text().await?)?),
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimitReached),
            other => match response.text().await {
                Ok(val) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: Some(val),
                }),
                Err(_) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: None,
                }),
            },
        }
    }
}

fn lon_lat(position: &Position) -> String {
    format!("{},{}", position.longitude(), position.latitude())
}

#[async_trait]
impl DirectionsService for DirectionsClient {
    async fn walking_route(&self, query: &RouteQuery) -> Result<RouteResult, ApiError> {
        let response: DirectionsResponse = self
            .get(
                "v2/directions/foot-walking",
                &[("start", lon_lat(&query.start)), ("end", lon_lat(&query.end))],
            )
            .await?;
        RouteResult::try_from(response)
    }
}

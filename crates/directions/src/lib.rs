use std::error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use model::route::{RouteQuery, RouteResult};

pub mod client;
pub mod ors;

/// Anything that can produce a walking route between two positions.
#[async_trait]
pub trait DirectionsService: Send + Sync {
    async fn walking_route(&self, query: &RouteQuery) -> Result<RouteResult, ApiError>;
}

/// Failures talking to the directions provider. All of them are transient
/// from the user's point of view and none are retried automatically.
#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    RateLimitReached,
    NoRoute,
    InvalidGeometry(String),
    Other(String),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response({}) {}", status_code, url),
            },
            ApiError::RateLimitReached => write!(f, "Rate limit reached."),
            ApiError::NoRoute => write!(f, "No route found between the given positions."),
            ApiError::InvalidGeometry(why) => write!(f, "Invalid route geometry: {}", why),
            ApiError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

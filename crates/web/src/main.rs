use std::{error::Error, sync::Arc};

use directions::{
    client::{DirectionsClient, OrsCredentials},
    DirectionsService,
};
use events::{client::HttpEventsBackend, memory::MemoryBackend, EventsBackend};
use navigation::paths::PathNetwork;
use web::{config::WebConfig, start_web_server, WebState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = WebConfig::from_env();

    // waypoints
    let waypoints = Arc::new(config.load_waypoints()?);
    log::info!("Loaded {} waypoints.", waypoints.len());

    // walkways
    let paths = Arc::new(PathNetwork::new(
        &waypoints,
        config.load_paths(&waypoints)?,
    )?);

    // directions
    let directions: Option<Arc<dyn DirectionsService>> = match OrsCredentials::from_env() {
        Some(credentials) => match DirectionsClient::new(&credentials) {
            Ok(client) => Some(Arc::new(client)),
            Err(why) => {
                log::error!("Could not set up the directions client: {}", why);
                None
            }
        },
        None => {
            log::warn!("ORS_API_KEY is not set, walking directions are disabled.");
            None
        }
    };

    // events
    let events: Arc<dyn EventsBackend> = match HttpEventsBackend::from_env() {
        Some(backend) => {
            log::info!("Using events backend at {}.", backend.base_url());
            Arc::new(backend)
        }
        None => {
            log::info!("EVENTS_BACKEND_URL is not set, keeping events in memory.");
            Arc::new(MemoryBackend::campus(&waypoints))
        }
    };

    // web server
    start_web_server(
        WebState {
            waypoints,
            paths,
            directions,
            events,
        },
        &config,
    )
    .await?;

    Ok(())
}

pub use crate::common::ApiResult;

use std::{path::Path, sync::Arc};

use axum::{extract::FromRef, http::Method, routing::get_service, Router};
use directions::DirectionsService;
use events::EventsBackend;
use model::waypoint::WaypointTable;
use navigation::paths::PathNetwork;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod api;
pub mod common;
pub mod config;
pub mod hateoas;
pub mod middleware;

use config::WebConfig;

#[derive(Clone, FromRef)]
pub struct WebState {
    pub waypoints: Arc<WaypointTable>,
    pub paths: Arc<PathNetwork>,
    /// `None` when no directions provider is configured.
    pub directions: Option<Arc<dyn DirectionsService>>,
    pub events: Arc<dyn EventsBackend>,
}

/// The complete application: json api under `/api`, static files elsewhere.
pub fn app(state: WebState, static_dir: &Path) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(static_content_router(static_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

pub async fn start_web_server(state: WebState, config: &WebConfig) -> std::io::Result<()> {
    let routes = app(state, &config.static_dir);

    let listener = TcpListener::bind(&config.bind_address).await?;
    log::info!("Listening on {}.", config.bind_address);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

fn static_content_router(static_dir: &Path) -> Router {
    Router::new().nest_service(
        "/",
        get_service(
            ServeDir::new(static_dir)
                .not_found_service(ServeFile::new(static_dir.join("error404.html"))),
        ),
    )
}

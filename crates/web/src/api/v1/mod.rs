use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, on},
    Extension, Json, Router,
};
use schemars::JsonSchema;
use serde::Serialize;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

mod events;
mod paths;
mod route;
mod shortest_path;
mod tour;
mod venues;
mod waypoints;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(index))
        .nest_service("/waypoints", waypoints::routes(state.clone()))
        .nest_service("/tour", tour::routes(state.clone()))
        .nest_service("/route", route::routes(state.clone()))
        .nest_service("/paths", paths::routes(state.clone()))
        .nest_service("/shortest-path", shortest_path::routes(state.clone()))
        .nest_service("/events", events::routes(state.clone()))
        .nest_service("/venues", venues::routes(state.clone()))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct IndexDto {
    waypoints: usize,
    walkways: usize,
    directions_available: bool,
}

async fn index(
    State(WebState {
        waypoints: table,
        paths,
        directions,
        ..
    }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> Json<hateoas::Response<IndexDto>> {
    let dto = IndexDto {
        waypoints: table.len(),
        walkways: paths.edges().len(),
        directions_available: directions.is_some(),
    };
    hateoas::Response::builder(dto, base_url)
        .link("self", resource!("/"))
        .link("waypoints", waypoints::resource!(""))
        .link("tour", tour::resource!(""))
        .link("paths", paths::resource!(""))
        .link("events", events::resource!(""))
        .link("venues", venues::resource!(""))
        .build()
        .json()
}

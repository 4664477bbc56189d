use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{Method, StatusCode},
    routing::{get, on},
    Extension, Router,
};
use model::{
    waypoint::{Position, Waypoint, WaypointTable},
    WithDistance,
};
use navigation::{display::MapViewState, search};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::let_also::LetAlso;

use crate::{
    common::{
        route_not_found, schema, url_encode, ApiResult, HateoasResult, RouteErrorResponse,
        VecResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 0.25;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/waypoints{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Waypoint>))
        .route("/nearby", get(nearby))
        .route("/search/:pattern", get(search_waypoint))
        .route("/:name", get(get_waypoint))
        .route("/", get(get_waypoints))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize, JsonSchema)]
struct WaypointsDto {
    data: Vec<hateoas::Response<Waypoint>>,
    view: MapViewState,
}

/// The whole table in order, plus a map showing every waypoint.
async fn get_waypoints(
    State(WebState { waypoints, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WaypointsDto> {
    let dto = WaypointsDto {
        data: waypoints
            .iter()
            .map(|waypoint| waypoint_hateoas(waypoint.clone(), base_url.clone()))
            .collect(),
        view: MapViewState::new().show_waypoints(waypoints.iter()),
    };
    Ok(hateoas::Response::builder(dto, base_url)
        .link("self", resource!(""))
        .link("tour", super::tour::resource!(""))
        .build()
        .json())
}

async fn get_waypoint(
    OriginalUri(original_uri): OriginalUri,
    Path(name): Path<String>,
    State(WebState { waypoints, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<Waypoint> {
    lookup(&waypoints, &name)
        .map(|waypoint| waypoint_hateoas(waypoint.clone(), base_url).json())
        .map_err(|why| {
            why.with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn search_waypoint(
    Path(pattern): Path<String>,
    State(WebState { waypoints, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<Waypoint>>> {
    Ok(search::search(&waypoints, &pattern)
        .into_iter()
        .map(|waypoint| waypoint_hateoas(waypoint.clone(), base_url.clone()))
        .collect::<Vec<_>>()
        .let_owned(|data| VecResponse::non_paginated(data).hateoas().json()))
}

#[derive(Deserialize)]
struct NearbyQuery {
    latitude: f64,
    longitude: f64,
    radius: Option<f64>,
}

async fn nearby(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { waypoints, .. }): State<WebState>,
    Query(params): Query<NearbyQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithDistance<Waypoint>>>> {
    let radius = params.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    if !radius.is_finite() || radius < 0.0 {
        return Err(RouteErrorResponse::bad_request("The radius must not be negative.")
            .with_method(&Method::GET)
            .with_uri(original_uri.path()));
    }
    Position::new(params.latitude, params.longitude)
        .map(|position| {
            search::nearby(&waypoints, position, radius)
                .into_iter()
                .map(|found| waypoint_with_distance_hateoas(found, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::non_paginated(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

/// Resolves a waypoint by its exact name. Unknown names are answered with a
/// 404 that carries the closest known name, if there is one.
pub(crate) fn lookup<'a>(
    table: &'a WaypointTable,
    name: &str,
) -> ApiResult<&'a Waypoint> {
    table
        .get(name)
        .ok_or_else(|| unknown_waypoint(table, name, StatusCode::NOT_FOUND))
}

pub(crate) fn unknown_waypoint(
    table: &WaypointTable,
    name: &str,
    status_code: StatusCode,
) -> RouteErrorResponse {
    let response = RouteErrorResponse::new(status_code)
        .with_message(format!("Unknown waypoint '{}'.", name));
    match search::suggest(table, name) {
        Some(suggestion) => {
            response.with_detailed_information(format!("Did you mean '{}'?", suggestion.name()))
        }
        None => response,
    }
}

pub(crate) fn waypoint_hateoas(
    waypoint: Waypoint,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<Waypoint> {
    let name = url_encode(waypoint.name());
    let position = waypoint.position();
    hateoas::Response::builder(waypoint, base_url)
        .link("self", resource!("/{}", name))
        .link("tour", super::tour::resource!("?start={}", name))
        .link(
            "nearby",
            resource!(
                "/nearby?latitude={}&longitude={}",
                position.latitude(),
                position.longitude()
            ),
        )
        .build()
}

fn waypoint_with_distance_hateoas(
    found: WithDistance<Waypoint>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithDistance<Waypoint>> {
    let name = url_encode(found.content.name());
    hateoas::Response::builder(found, base_url)
        .link("self", resource!("/{}", name))
        .build()
}

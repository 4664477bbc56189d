use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::{Method, StatusCode},
    routing::{get, on},
    Extension, Router,
};
use model::{
    route::{RouteQuery, RouteResult},
    waypoint::{Waypoint, WaypointTable},
};
use navigation::display::{step_lines, MapViewState, RouteSummary};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    common::{
        route_not_found, schema_no_example, url_encode, ApiResult, HateoasResult,
        RouteErrorResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

use super::waypoints::unknown_waypoint;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/route{}", format_args!($($arg)*))
    };
}

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema_no_example::<RouteDto>))
        .route("/", get(get_route))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct RouteDto {
    start: Waypoint,
    end: Waypoint,
    route: RouteResult,
    summary: String,
    steps: Vec<String>,
    view: MapViewState,
}

#[derive(Deserialize)]
struct RouteParams {
    start: String,
    end: String,
}

/// Walking directions between two named waypoints.
async fn get_route(
    OriginalUri(original_uri): OriginalUri,
    State(WebState {
        waypoints,
        directions,
        ..
    }): State<WebState>,
    Query(params): Query<RouteParams>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<RouteDto> {
    let with_request = |response: RouteErrorResponse| {
        response
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    };

    let (start, end) = endpoints(&waypoints, &params).map_err(with_request)?;
    let directions = directions.ok_or_else(|| {
        with_request(
            RouteErrorResponse::new(StatusCode::SERVICE_UNAVAILABLE)
                .with_message("No directions service is configured."),
        )
    })?;

    let query = RouteQuery {
        start: start.position(),
        end: end.position(),
    };
    let route = directions
        .walking_route(&query)
        .await
        .map_err(|why| with_request(RouteErrorResponse::from(why)))?;
    log::info!(
        "route '{}' -> '{}': {:.0} m in {} steps.",
        start.name(),
        end.name(),
        route.distance,
        route.steps.len()
    );

    let dto = RouteDto {
        summary: RouteSummary::for_route(&route).to_string(),
        steps: step_lines(&route),
        view: MapViewState::new().show_route(&start, &end, &route),
        start,
        end,
        route,
    };
    Ok(route_hateoas(dto, base_url).json())
}

/// Both ends must be known and distinct.
fn endpoints(
    table: &WaypointTable,
    params: &RouteParams,
) -> ApiResult<(Waypoint, Waypoint)> {
    let find = |name: &str| {
        table
            .get(name)
            .cloned()
            .ok_or_else(|| unknown_waypoint(table, name, StatusCode::BAD_REQUEST))
    };
    let start = find(&params.start)?;
    let end = find(&params.end)?;
    if start.name() == end.name() {
        return Err(RouteErrorResponse::bad_request(
            "Start and destination must be different waypoints.",
        ));
    }
    Ok((start, end))
}

fn route_hateoas(dto: RouteDto, base_url: Arc<BaseUrl>) -> hateoas::Response<RouteDto> {
    let start = url_encode(dto.start.name());
    let end = url_encode(dto.end.name());
    hateoas::Response::builder(dto, base_url)
        .link("self", resource!("?start={}&end={}", start, end))
        .link("reverse", resource!("?start={}&end={}", end, start))
        .link("start", super::waypoints::resource!("/{}", start))
        .link("end", super::waypoints::resource!("/{}", end))
        .build()
}

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::{Method, StatusCode},
    routing::{get, on},
    Extension, Router,
};
use model::waypoint::Waypoint;
use navigation::{
    display::{MapViewState, RouteSummary},
    paths::PathError,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    common::{
        route_not_found, schema_no_example, url_encode, HateoasResult, RouteErrorResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

use super::waypoints::unknown_waypoint;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/shortest-path{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema_no_example::<ShortestPathDto>))
        .route("/", get(get_shortest_path))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ShortestPathDto {
    path: Vec<Waypoint>,
    /// meters
    distance: f64,
    summary: String,
    label: String,
    view: MapViewState,
}

#[derive(Deserialize)]
struct ShortestPathParams {
    start: Option<String>,
    end: Option<String>,
}

/// Shortest walk along the walkways between two named waypoints.
async fn get_shortest_path(
    OriginalUri(original_uri): OriginalUri,
    State(WebState {
        waypoints, paths, ..
    }): State<WebState>,
    Query(params): Query<ShortestPathParams>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<ShortestPathDto> {
    let with_request = |response: RouteErrorResponse| {
        response
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    };

    let given = |value: Option<String>| value.filter(|value| !value.trim().is_empty());
    let (Some(start), Some(end)) = (given(params.start), given(params.end)) else {
        return Err(with_request(RouteErrorResponse::bad_request(
            "Start and end waypoints are required.",
        )));
    };

    let found = paths
        .shortest_path(&start, &end)
        .map_err(|why| match why {
            PathError::UnknownWaypoint(name) => {
                unknown_waypoint(&waypoints, &name, StatusCode::BAD_REQUEST)
            }
            other => RouteErrorResponse::from(other),
        })
        .map_err(with_request)?;
    log::info!(
        "shortest path '{}' -> '{}': {:.0} m over {} waypoints.",
        start,
        end,
        found.distance,
        found.path.len()
    );

    let summary = RouteSummary {
        distance_km: found.distance_km(),
        duration_min: None,
    };
    let dto = ShortestPathDto {
        summary: summary.to_string(),
        label: found.names().join(" → "),
        view: MapViewState::new().show_path(&found.path),
        distance: found.distance,
        path: found.path,
    };

    let start = url_encode(&start);
    let end = url_encode(&end);
    Ok(hateoas::Response::builder(dto, base_url)
        .link("self", resource!("?start={}&end={}", start, end))
        .link("reverse", resource!("?start={}&end={}", end, start))
        .link("start", super::waypoints::resource!("/{}", start))
        .link("end", super::waypoints::resource!("/{}", end))
        .link("paths", super::paths::resource!(""))
        .build()
        .json())
}

use std::{sync::Arc, time::Instant};

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::tour::Tour;
use navigation::{
    display::{path_label, MapViewState, RouteSummary},
    replay::{ReplayStep, TourReplay},
    tour::nearest_neighbor_tour,
    InvalidInput,
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

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/tour{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema_no_example::<TourDto>))
        .route("/", get(get_tour))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct TourDto {
    tour: Tour,
    summary: String,
    path: String,
    steps: Vec<ReplayStep>,
    view: MapViewState,
}

#[derive(Deserialize)]
struct TourQuery {
    start: Option<String>,
}

/// Nearest-neighbour round trip over the campus locations. Without a start
/// the first campus location is used.
async fn get_tour(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { waypoints, .. }): State<WebState>,
    Query(params): Query<TourQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<TourDto> {
    let set = waypoints.campus_set();
    let start = match params.start {
        Some(start) => start,
        None => set
            .first()
            .map(|waypoint| waypoint.name().to_owned())
            .unwrap_or_default(),
    };

    let now = Instant::now();
    let tour = nearest_neighbor_tour(&set, &start).map_err(|why| {
        let response = RouteErrorResponse::from(why.clone())
            .with_method(&Method::GET)
            .with_uri(original_uri.path());
        match why {
            InvalidInput::UnknownStart(name) => match navigation::search::suggest(&waypoints, &name)
            {
                Some(suggestion) => response
                    .with_detailed_information(format!("Did you mean '{}'?", suggestion.name())),
                None => response,
            },
            InvalidInput::EmptyWaypointSet => response,
        }
    })?;
    let elapsed = now.elapsed();
    log::debug!(
        "built tour from '{}' over {} stops in {:?}.",
        start,
        tour.stops(),
        elapsed
    );

    let dto = TourDto {
        summary: RouteSummary::for_tour(&tour).to_string(),
        path: path_label(&tour),
        steps: TourReplay::new(&tour).collect(),
        view: MapViewState::new().show_tour(&tour),
        tour,
    };
    Ok(tour_hateoas(dto, &start, base_url, elapsed.as_secs_f64()).json())
}

fn tour_hateoas(
    dto: TourDto,
    start: &str,
    base_url: Arc<BaseUrl>,
    build_secs: f64,
) -> hateoas::Response<TourDto> {
    let start = url_encode(start);
    hateoas::Response::builder(dto, base_url)
        .link("self", resource!("?start={}", start))
        .link("start", super::waypoints::resource!("/{}", start))
        .debug_info("buildSecs", build_secs)
        .build()
}

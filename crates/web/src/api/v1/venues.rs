use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::venue::Venue;
use utility::let_also::LetAlso;

use crate::{
    common::{
        route_not_found, schema, url_encode, HateoasResult, RouteErrorResponse, VecResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/venues{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Venue>))
        .route("/", get(get_venues))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_venues(
    OriginalUri(original_uri): OriginalUri,
    State(WebState {
        waypoints, events, ..
    }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<Venue>>> {
    events
        .list_venues()
        .await
        .map(|venues| {
            venues
                .into_iter()
                .map(|venue| {
                    let waypoint = waypoints
                        .contains(&venue.name)
                        .then(|| super::waypoints::resource!("/{}", url_encode(&venue.name)));
                    hateoas::Response::builder(venue, base_url.clone())
                        .link_option("waypoint", waypoint)
                        .build()
                })
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::non_paginated(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

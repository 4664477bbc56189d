use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, on},
    Extension, Json, Router,
};
use model::path::PathEdge;
use utility::let_also::LetAlso;

use crate::{
    common::{route_not_found, schema, url_encode, VecResponse, METHOD_FILTER_ALL},
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/paths{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<PathEdge>))
        .route("/", get(get_paths))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Every walkway of the path network. Two-way walkways are listed once per
/// direction.
async fn get_paths(
    State(WebState { paths, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> Json<hateoas::Response<VecResponse<hateoas::Response<PathEdge>>>> {
    paths
        .edges()
        .iter()
        .cloned()
        .map(|edge| {
            let start = url_encode(&edge.start);
            let end = url_encode(&edge.end);
            hateoas::Response::builder(edge, base_url.clone())
                .link("start", super::waypoints::resource!("/{}", start))
                .link("end", super::waypoints::resource!("/{}", end))
                .link(
                    "shortestPath",
                    super::shortest_path::resource!("?start={}&end={}", start, end),
                )
                .build()
        })
        .collect::<Vec<_>>()
        .let_owned(|data| VecResponse::non_paginated(data).hateoas().json())
}

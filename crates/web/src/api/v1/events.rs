use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{Method, StatusCode},
    routing::{get, on},
    Extension, Json, Router,
};
use chrono::{Local, NaiveDateTime};
use events::{
    listing::{self, EventFilter, EventSort},
    EventsError,
};
use model::{
    event::{Event, NewEvent},
    venue::Venue,
};
use navigation::display::MapViewState;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    common::{
        route_not_found, schema, ApiResult, HateoasResult, RouteErrorResponse, VecResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/events{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Event>))
        .route("/", get(get_events).post(create_event))
        .route("/:id", get(get_event).delete(delete_event))
        .route("/:id/venue", get(get_event_venue))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct EventDto {
    #[serde(flatten)]
    event: Event,
    time_remaining: String,
}

impl EventDto {
    fn new(event: Event, now: NaiveDateTime) -> Self {
        Self {
            time_remaining: event.time_remaining(now),
            event,
        }
    }
}

#[derive(Deserialize)]
struct EventsQuery {
    #[serde(default)]
    sort_by: EventSort,
    #[serde(default)]
    filter: EventFilter,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

async fn get_events(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { events, .. }): State<WebState>,
    Query(params): Query<EventsQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<EventDto>>> {
    let now = now();
    events
        .list_events()
        .await
        .map(|events| {
            listing::list(events, params.filter, params.sort_by, now)
                .into_iter()
                .map(|event| event_hateoas(EventDto::new(event, now), base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::non_paginated(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_event(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<u64>,
    State(WebState { events, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<EventDto> {
    events
        .find_event(Id::new(id))
        .await
        .map(|event| event_hateoas(EventDto::new(event, now()), base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn create_event(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { events, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(new_event): Json<NewEvent>,
) -> ApiResult<(StatusCode, Json<hateoas::Response<EventDto>>)> {
    events
        .create_event(new_event)
        .await
        .map(|event| {
            let dto = EventDto::new(event, now());
            (StatusCode::CREATED, event_hateoas(dto, base_url).json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

async fn delete_event(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<u64>,
    State(WebState { events, .. }): State<WebState>,
) -> ApiResult<Json<Value>> {
    let id = Id::new(id);
    let with_request = |why: EventsError| {
        RouteErrorResponse::from(why)
            .with_method(&Method::DELETE)
            .with_uri(original_uri.path())
    };

    let event = events.find_event(id).await.map_err(with_request)?;
    events.delete_event(id).await.map_err(with_request)?;
    Ok(Json(json!({
        "message": format!("Event \"{}\" deleted successfully", event.name),
        "id": id,
    })))
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct EventVenueDto {
    event: EventDto,
    venue: Venue,
    view: MapViewState,
}

/// The map focused on the place an event is held at.
async fn get_event_venue(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<u64>,
    State(WebState { events, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<EventVenueDto> {
    let with_request = |response: RouteErrorResponse| {
        response
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    };

    let (event, venues) = futures::try_join!(events.find_event(Id::new(id)), events.list_venues())
        .map_err(|why| with_request(RouteErrorResponse::from(why)))?;

    let venue = venues
        .into_iter()
        .find(|venue| match event.venue_id {
            Some(venue_id) => venue.id == venue_id,
            None => venue.name.eq_ignore_ascii_case(&event.venue_name),
        })
        .ok_or_else(|| {
            with_request(
                RouteErrorResponse::new(StatusCode::NOT_FOUND)
                    .with_message(format!("Venue '{}' is unknown.", event.venue_name)),
            )
        })?;
    let waypoint = venue.to_waypoint().map_err(|why| {
        with_request(
            RouteErrorResponse::new(StatusCode::BAD_GATEWAY)
                .with_message(format!("Venue '{}' has invalid coordinates.", venue.name))
                .with_detailed_information(why.to_string()),
        )
    })?;

    let event_id = event.id;
    let dto = EventVenueDto {
        event: EventDto::new(event, now()),
        view: MapViewState::new().focus_on(&waypoint),
        venue,
    };
    Ok(hateoas::Response::builder(dto, base_url)
        .link("self", resource!("/{}/venue", event_id))
        .link("event", resource!("/{}", event_id))
        .build()
        .json())
}

fn event_hateoas(dto: EventDto, base_url: Arc<BaseUrl>) -> hateoas::Response<EventDto> {
    let id = dto.event.id;
    hateoas::Response::builder(dto, base_url)
        .link("self", resource!("/{}", id))
        .link("venue", resource!("/{}/venue", id))
        .build()
}

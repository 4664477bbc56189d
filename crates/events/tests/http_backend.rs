use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use events::{client::HttpEventsBackend, EventsBackend, EventsError};
use model::{event::NewEvent, ExampleData};
use serde_json::{json, Value};
use utility::id::Id;

type Store = Arc<Mutex<Vec<Value>>>;

async fn list_events(State(store): State<Store>) -> Json<Value> {
    Json(Value::Array(store.lock().unwrap().clone()))
}

async fn add_event(State(store): State<Store>, Json(data): Json<Value>) -> (StatusCode, Json<Value>) {
    if data["end_time"].as_str().is_some_and(|end| end <= data["time"].as_str().unwrap_or("")) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "End time must be after start time"})),
        );
    }
    let mut store = store.lock().unwrap();
    let id = store.iter().filter_map(|e| e["id"].as_u64()).max().unwrap_or(0) + 1;
    let event = json!({
        "id": id,
        "name": data["name"],
        "venue_name": data["venue_name"],
        "date": data["date"],
        "time": data["time"],
        "end_time": data.get("end_time").cloned().unwrap_or(json!("")),
        "description": data.get("description").cloned().unwrap_or(json!("")),
        "created_at": "2023-09-01 11:20:00"
    });
    store.push(event.clone());
    (StatusCode::CREATED, Json(event))
}

async fn delete_event(State(store): State<Store>, Path(id): Path<u64>) -> (StatusCode, Json<Value>) {
    let mut store = store.lock().unwrap();
    match store.iter().position(|e| e["id"].as_u64() == Some(id)) {
        Some(index) => {
            let deleted = store.remove(index);
            (
                StatusCode::OK,
                Json(json!({"message": format!("Event \"{}\" deleted successfully", deleted["name"]), "id": id})),
            )
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "Event not found"}))),
    }
}

async fn list_locations() -> Json<Value> {
    Json(json!([
        {"id": 1, "name": "Academic Block", "latitude": 13.263018, "longitude": 80.027427, "description": "Lecture halls"},
        {"id": 2, "name": "Library", "latitude": 13.262621, "longitude": 80.026525}
    ]))
}

async fn serve() -> String {
    let store: Store = Arc::new(Mutex::new(vec![json!({
        "id": 1,
        "name": "Orientation Day",
        "venue_id": 1,
        "venue_name": "Academic Block",
        "date": "2023-09-01",
        "time": "09:00",
        "end_time": "12:00",
        "description": "Welcome event for new students",
        "created_at": "2023-08-15 10:00:00"
    })]));
    let app = Router::new()
        .route("/api/events", get(list_events).post(add_event))
        .route("/api/events/:id", delete(delete_event))
        .route("/api/locations", get(list_locations))
        .with_state(store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/", address)
}

#[tokio::test]
async fn lists_events_and_venues() {
    let backend = HttpEventsBackend::new(&serve().await);

    let events = backend.list_events().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "Orientation Day");
    assert_eq!(events[0].venue_id, Some(Id::new(1)));

    let venues = backend.list_venues().await.unwrap();
    assert_eq!(venues.len(), 2);
    assert_eq!(venues[1].description, None);
}

#[tokio::test]
async fn creates_and_deletes() {
    let backend = HttpEventsBackend::new(&serve().await);

    let mut new = NewEvent::example_data();
    new.end_time = None;
    let created = backend.create_event(new).await.unwrap();
    assert_eq!(created.id, Id::new(2));
    assert_eq!(created.end_time, None);
    assert_eq!(backend.find_event(Id::new(2)).await.unwrap().name, created.name);

    backend.delete_event(Id::new(2)).await.unwrap();
    assert_eq!(backend.list_events().await.unwrap().len(), 1);
    assert!(matches!(
        backend.delete_event(Id::new(2)).await,
        Err(EventsError::NotFound)
    ));
}

#[tokio::test]
async fn invalid_event_never_reaches_the_backend() {
    let backend = HttpEventsBackend::new(&serve().await);
    let mut new = NewEvent::example_data();
    new.end_time = chrono::NaiveTime::from_hms_opt(10, 0, 0);
    assert!(matches!(
        backend.create_event(new).await,
        Err(EventsError::Invalid(_))
    ));
    assert_eq!(backend.list_events().await.unwrap().len(), 1);
}

#[tokio::test]
async fn backend_errors_carry_the_message() {
    // a backend that fails to load its events
    let app = Router::new().route("/api/events", get(|| async {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Failed to load events"})),
        )
    }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let backend = HttpEventsBackend::new(&format!("http://{}", address));

    match backend.list_events().await {
        Err(EventsError::Rejected { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to load events");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

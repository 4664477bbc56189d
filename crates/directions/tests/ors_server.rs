use std::collections::HashMap;

use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use directions::{
    client::{DirectionsClient, OrsCredentials},
    ApiError, DirectionsService,
};
use model::{route::RouteQuery, waypoint::Position};
use serde_json::json;

async fn foot_walking(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("api_key").map(String::as_str) != Some("secret") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Access to this API has been disallowed"})),
        );
    }
    // echo the requested start back so the test can check the coordinate order
    let start: Vec<f64> = params
        .get("start")
        .map(|s| s.split(',').filter_map(|v| v.parse().ok()).collect())
        .unwrap_or_default();
    let end: Vec<f64> = params
        .get("end")
        .map(|s| s.split(',').filter_map(|v| v.parse().ok()).collect())
        .unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {
                    "segments": [{
                        "distance": 148.3,
                        "duration": 106.8,
                        "steps": [
                            {"distance": 148.3, "duration": 106.8, "instruction": "Head east"},
                            {"distance": 0.0, "duration": 0.0, "instruction": "Arrive at your destination"}
                        ]
                    }],
                    "summary": {"distance": 148.3, "duration": 106.8}
                },
                "geometry": {"type": "LineString", "coordinates": [start, end]}
            }]
        })),
    )
}

async fn serve() -> String {
    let app = Router::new().route("/v2/directions/foot-walking", get(foot_walking));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", address)
}

fn credentials(base_url: String, api_key: &str) -> OrsCredentials {
    let mut credentials = OrsCredentials::new(api_key);
    credentials.base_url = base_url;
    credentials
}

fn library_to_pond() -> RouteQuery {
    RouteQuery {
        start: Position::new(13.262621, 80.026525).unwrap(),
        end: Position::new(13.262198, 80.027673).unwrap(),
    }
}

#[tokio::test]
async fn fetches_walking_route() {
    let base_url = serve().await;
    let client = DirectionsClient::new(&credentials(base_url, "secret")).unwrap();

    let route = client.walking_route(&library_to_pond()).await.unwrap();
    assert_eq!(route.distance, 148.3);
    assert_eq!(route.duration, 106.8);
    assert_eq!(route.steps.len(), 2);
    assert_eq!(route.geometry, vec![library_to_pond().start, library_to_pond().end]);
}

#[tokio::test]
async fn rejected_key_is_an_invalid_response() {
    let base_url = serve().await;
    let client = DirectionsClient::new(&credentials(base_url, "wrong")).unwrap();

    match client.walking_route(&library_to_pond()).await {
        Err(ApiError::InvalidResponse {
            status_code,
            response,
            ..
        }) => {
            assert_eq!(status_code, reqwest::StatusCode::FORBIDDEN);
            assert!(response.unwrap().contains("disallowed"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_service_is_a_request_error() {
    // nothing listens on the discard port
    let client =
        DirectionsClient::new(&credentials("http://127.0.0.1:9".to_owned(), "secret")).unwrap();
    assert!(matches!(
        client.walking_route(&library_to_pond()).await,
        Err(ApiError::RequestError(_))
    ));
}

//! Integration tests for the walkability HTTP API.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use geo::Point;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use walkability_core::prelude::*;
use walkability_server::{AppState, HttpConfig, create_router};

/// Session over home (0,0), museum A and museum/coffee shop B.
/// "330 De Neve Dr" geocodes to a second home spot next to A.
fn create_test_app() -> axum::Router {
    let coordinates = vec![
        Point::new(0.0, 0.0),
        Point::new(0.01, 0.0),
        Point::new(0.02, 0.0),
        Point::new(-0.01, 0.0),
    ];
    let durations = vec![
        vec![0.0, 10.0, 5.0, 7.0],
        vec![10.0, 0.0, 3.0, 2.0],
        vec![5.0, 3.0, 0.0, 9.0],
        vec![7.0, 2.0, 9.0, 0.0],
    ];
    let distances: Vec<Vec<f64>> = durations
        .iter()
        .map(|row| row.iter().map(|d| d * 1.5).collect())
        .collect();
    let provider = TableProvider::new(
        coordinates,
        CostMatrix::from_rows(&distances, &durations).expect("square matrix"),
    );
    let geocoder = StaticGeocoder::new().with_address("330 De Neve Dr", Point::new(-0.01, 0.0));

    let points = vec![
        PointOfInterest::new("A", 0.0, 0.01, [Category::MUSEUM]).expect("valid point"),
        PointOfInterest::new("B", 0.0, 0.02, [Category::MUSEUM, Category::COFFEE_SHOP])
            .expect("valid point"),
    ];

    let session = Walkability::builder(Arc::new(provider))
        .geocoder(Arc::new(geocoder))
        .points(points)
        .home(Some(HomeAddress::coordinates(0.0, 0.0)))
        .build();

    create_router(AppState::new(Arc::new(session)), &HttpConfig::default())
}

/// Helper to send a request and get the response body as JSON.
async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_points_start_with_home() {
    let app = create_test_app();
    let (status, json) = send(&app, "GET", "/api/points", None).await;

    assert_eq!(status, StatusCode::OK);
    let points = json["points"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0]["index"], 0);
    assert_eq!(points[0]["categories"], json!(["home"]));
    assert_eq!(points[2]["name"], "B");
    assert_eq!(points[2]["categories"], json!(["museum", "coffee_shop"]));
}

#[tokio::test]
async fn test_categories_listed() {
    let app = create_test_app();
    let (status, json) = send(&app, "GET", "/api/categories", None).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json["categories"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["id"].as_str())
        .collect();
    assert!(ids.contains(&"coffee_shop"));
    assert!(ids.contains(&"museum"));
}

// ============================================================================
// Home
// ============================================================================

#[tokio::test]
async fn test_get_home() {
    let app = create_test_app();
    let (status, json) = send(&app, "GET", "/api/home", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["lat"], 0.0);
    assert_eq!(json["resolution"]["status"], "explicit");
}

#[tokio::test]
async fn test_put_home_by_address_moves_routes() {
    let app = create_test_app();
    let (status, json) = send(
        &app,
        "PUT",
        "/api/home",
        Some(json!({"address": "330 De Neve Dr"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["lon"], -0.01);
    assert_eq!(json["resolution"]["status"], "geocoded");

    let (status, json) = send(
        &app,
        "POST",
        "/api/route",
        Some(json!({"categories": ["museum"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stops"][0]["name"], "A");
    assert_eq!(json["total_duration"], 4.0);
}

#[tokio::test]
async fn test_put_home_invalid_coordinates() {
    let app = create_test_app();
    let (status, json) = send(&app, "PUT", "/api/home", Some(json!({"lat": 95.0, "lon": 0.0}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    // Home unchanged
    let (_, json) = send(&app, "GET", "/api/home", None).await;
    assert_eq!(json["resolution"]["status"], "explicit");
}

#[tokio::test]
async fn test_put_home_unknown_address() {
    let app = create_test_app();
    let (status, _) = send(&app, "PUT", "/api/home", Some(json!({"address": "Nowhere"}))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

// ============================================================================
// Routes
// ============================================================================

#[tokio::test]
async fn test_plan_route() {
    let app = create_test_app();
    let (status, json) = send(
        &app,
        "POST",
        "/api/route",
        Some(json!({"categories": ["Museum", "coffee shop"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["categories"], json!(["museum", "coffee_shop"]));
    assert_eq!(json["stops"][0]["name"], "B");
    assert_eq!(json["stops"][1]["index"], 2);
    assert_eq!(json["steps"], 3);
    assert_eq!(json["total_duration"], 10.0);
    assert_eq!(json["total_distance"], 15.0);
}

#[tokio::test]
async fn test_plan_empty_route() {
    let app = create_test_app();
    let (status, json) = send(&app, "POST", "/api/route", Some(json!({"categories": []}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["steps"], 1);
    assert_eq!(json["average_duration"], 0.0);
}

#[tokio::test]
async fn test_plan_route_unknown_category() {
    let app = create_test_app();
    let (status, json) = send(
        &app,
        "POST",
        "/api/route",
        Some(json!({"categories": ["bowling_alley"]})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("bowling_alley"));
}

#[tokio::test]
async fn test_plan_route_without_candidates() {
    let app = create_test_app();
    let (status, json) = send(
        &app,
        "POST",
        "/api/route",
        Some(json!({"categories": ["museum", "library"]})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("library"));
}

#[tokio::test]
async fn test_plan_many_reports_each_route() {
    let app = create_test_app();
    let (status, json) = send(
        &app,
        "POST",
        "/api/routes",
        Some(json!({"routes": [["museum"], ["library"], ["coffee_shop", "museum"]]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let routes = json["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 3);
    assert_eq!(routes[0]["total_duration"], 10.0);
    assert_eq!(routes[1]["categories"], json!(["library"]));
    assert!(routes[1]["error"].is_string());
    assert_eq!(routes[2]["steps"], 3);
}

#[tokio::test]
async fn test_plan_route_geojson() {
    let app = create_test_app();
    let (status, json) = send(
        &app,
        "POST",
        "/api/route/geojson",
        Some(json!({"categories": ["museum"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "FeatureCollection");
    // One stop and two legs
    assert_eq!(json["features"].as_array().unwrap().len(), 3);
}

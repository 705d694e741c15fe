//! REST API over a shared walkability session.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/points` - Points of interest in index order, home first
//! - `GET /api/categories` - Registered categories
//! - `GET /api/home` - Home position and how it was resolved
//! - `PUT /api/home` - Move home (`{"address": ..}` or `{"lat": .., "lon": ..}`)
//! - `POST /api/route` - Plan one route (`{"categories": [..]}`)
//! - `POST /api/route/geojson` - Plan one route, answer as GeoJSON
//! - `POST /api/routes` - Plan many routes (`{"routes": [[..], ..]}`)

use std::sync::Arc;

use axum::{
    Json, Router,
    error_handling::HandleErrorLayer,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower::{BoxError, ServiceBuilder, limit::GlobalConcurrencyLimitLayer, timeout::TimeoutLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use walkability_core::prelude::*;

use crate::config::HttpConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    session: Arc<Walkability>,
}

impl AppState {
    pub fn new(session: Arc<Walkability>) -> Self {
        Self { session }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct PointInfo {
    pub index: PointIndex,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct PointListResponse {
    pub points: Vec<PointInfo>,
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub lat: f64,
    pub lon: f64,
    pub resolution: HomeResolution,
}

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoutesRequest {
    pub routes: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct StopInfo {
    pub index: PointIndex,
    pub name: String,
    pub category: Category,
}

/// A planned route. Unreachable costs serialize as `null`.
#[derive(Debug, Serialize)]
pub struct RouteSummary {
    pub categories: Vec<Category>,
    pub stops: Vec<StopInfo>,
    pub legs: Vec<RouteLeg>,
    pub steps: usize,
    pub total_duration: Seconds,
    pub total_distance: Meters,
    pub average_duration: Seconds,
    pub average_distance: Meters,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RouteOutcome {
    Planned(RouteSummary),
    Failed { categories: Vec<String>, error: String },
}

#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<RouteOutcome>,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

/// Error with the status code it is reported under
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiError {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        let status = match &e {
            Error::InvalidCoordinates { .. } => StatusCode::BAD_REQUEST,
            Error::UnknownCategory(_) | Error::Planning(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::HomeResolution(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        Error::Planning(e).into()
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn list_points(State(state): State<AppState>) -> Json<PointListResponse> {
    let snapshot = state.session.snapshot();
    let points = snapshot
        .points()
        .iter()
        .enumerate()
        .map(|(index, point)| PointInfo {
            index,
            name: point.name.clone(),
            lat: point.lat(),
            lon: point.lon(),
            categories: point.categories().to_vec(),
        })
        .collect();

    Json(PointListResponse { points })
}

async fn list_categories(State(state): State<AppState>) -> Json<CategoryListResponse> {
    Json(CategoryListResponse {
        categories: state.session.registry().iter().cloned().collect(),
    })
}

async fn get_home(State(state): State<AppState>) -> Json<HomeResponse> {
    Json(home_response(&state.session.snapshot()))
}

async fn put_home(
    State(state): State<AppState>,
    Json(address): Json<HomeAddress>,
) -> Result<Json<HomeResponse>, AppError> {
    let session = state.session.clone();
    // Geocoding and matrix refresh use blocking HTTP calls
    tokio::task::spawn_blocking(move || session.set_home(&address))
        .await
        .map_err(|e| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))??;

    let response = home_response(&state.session.snapshot());
    info!(
        "Home set to ({}, {}) via {:?}",
        response.lat, response.lon, response.resolution
    );
    Ok(Json(response))
}

async fn plan_single(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteSummary>, AppError> {
    let snapshot = state.session.snapshot();
    let categories = resolve_categories(state.session.registry(), &request.categories)?;
    let route = snapshot.plan(&categories)?;
    Ok(Json(summarize(&snapshot, categories, &route)))
}

async fn plan_single_geojson(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<geojson::FeatureCollection>, AppError> {
    let snapshot = state.session.snapshot();
    let categories = resolve_categories(state.session.registry(), &request.categories)?;
    let route = snapshot.plan(&categories)?;
    Ok(Json(route.to_geojson(snapshot.points())))
}

async fn plan_many(
    State(state): State<AppState>,
    Json(request): Json<RoutesRequest>,
) -> Json<RoutesResponse> {
    let snapshot = state.session.snapshot();
    let registry = state.session.registry();

    let routes = request
        .routes
        .into_iter()
        .map(|input| {
            let planned = resolve_categories(registry, &input).and_then(|categories| {
                let route = snapshot.plan(&categories).map_err(AppError::from)?;
                Ok(summarize(&snapshot, categories, &route))
            });
            match planned {
                Ok(summary) => RouteOutcome::Planned(summary),
                Err(e) => {
                    warn!("Route {input:?} failed: {}", e.message);
                    RouteOutcome::Failed {
                        categories: input,
                        error: e.message,
                    }
                }
            }
        })
        .collect();

    Json(RoutesResponse { routes })
}

async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::new(StatusCode::REQUEST_TIMEOUT, "Request timed out")
    } else {
        AppError::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn resolve_categories(
    registry: &CategoryRegistry,
    input: &[String],
) -> Result<Vec<Category>, AppError> {
    input
        .iter()
        .map(|c| registry.resolve(c).map_err(AppError::from))
        .collect()
}

fn home_response(snapshot: &Snapshot) -> HomeResponse {
    let home = snapshot.points().home();
    HomeResponse {
        lat: home.lat(),
        lon: home.lon(),
        resolution: snapshot.home_resolution().clone(),
    }
}

fn summarize(snapshot: &Snapshot, categories: Vec<Category>, route: &RouteResult) -> RouteSummary {
    let stops = route
        .stops
        .iter()
        .map(|stop| StopInfo {
            index: stop.index,
            name: snapshot
                .points()
                .get(stop.index)
                .map(|p| p.name.clone())
                .unwrap_or_default(),
            category: stop.category.clone(),
        })
        .collect();

    RouteSummary {
        categories,
        stops,
        legs: route.legs.clone(),
        steps: route.steps(),
        total_duration: route.total_duration,
        total_distance: route.total_distance,
        average_duration: route.average_duration(),
        average_distance: route.average_distance(),
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState, http: &HttpConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let middleware = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(TimeoutLayer::new(http.request_timeout()))
        .layer(GlobalConcurrencyLimitLayer::new(http.concurrency_limit));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/points", get(list_points))
        .route("/api/categories", get(list_categories))
        .route("/api/home", get(get_home).put(put_home))
        .route("/api/route", post(plan_single))
        .route("/api/route/geojson", post(plan_single_geojson))
        .route("/api/routes", post(plan_many))
        .layer(middleware)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

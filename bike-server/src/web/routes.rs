//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::model::Station;
use crate::query::{StationQuery, Summary};
use crate::repository::{Page, UpdateOutcome};
use crate::store::StoreError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations", get(list_stations).post(create_station))
        .route("/api/stations/summary", get(station_summary))
        .route("/api/stations/:number", get(get_station).put(update_station))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        primary_available: state.repository.is_primary_available().await,
    })
}

/// Filter, search, sort and paginate stations.
async fn list_stations(
    State(state): State<AppState>,
    Query(query): Query<StationQuery>,
) -> Json<Page> {
    debug!(?query, "station query");
    Json(state.repository.query(&query).await)
}

/// Network-wide totals.
async fn station_summary(State(state): State<AppState>) -> Json<Summary> {
    Json(state.repository.summary().await)
}

/// Fetch one station by number.
async fn get_station(
    State(state): State<AppState>,
    Path(number): Path<u32>,
) -> Result<Json<Station>, AppError> {
    match state.repository.get_by_key(number).await? {
        Some(station) => Ok(Json(station)),
        None => Err(AppError::not_found(number)),
    }
}

/// Create a station.
async fn create_station(
    State(state): State<AppState>,
    Json(station): Json<Station>,
) -> Result<impl IntoResponse, AppError> {
    if station.number == 0 {
        return Err(AppError::BadRequest {
            message: "station number must be positive".to_string(),
        });
    }

    let report = state.repository.create(station).await?;
    let location = format!("/api/stations/{}", report.station.number);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(report.station),
    ))
}

/// Overwrite the mutable fields of a station.
async fn update_station(
    State(state): State<AppState>,
    Path(number): Path<u32>,
    Json(updated): Json<Station>,
) -> Result<Json<Station>, AppError> {
    match state.repository.update(number, &updated).await? {
        UpdateOutcome::Updated(report) => Ok(Json(report.station)),
        UpdateOutcome::NotFound => Err(AppError::not_found(number)),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl AppError {
    fn not_found(number: u32) -> Self {
        AppError::NotFound {
            message: format!("Station {number} not found"),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        let message = e.to_string();
        match e {
            StoreError::Conflict { .. } => AppError::Conflict { message },
            StoreError::Unavailable { .. } | StoreError::Http(_) => {
                AppError::Unavailable { message }
            }
            _ => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

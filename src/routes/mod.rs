//! Rutas HTTP
//!
//! Cada recurso expone su propio `Router<AppState>`; `create_router` los anida
//! bajo `/api` y añade los archivos subidos y las capas comunes.

pub mod employee_routes;
pub mod mission_routes;
pub mod vehicle_routes;

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use chrono::NaiveDate;
use serde_json::json;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::dto::mission_dto::AvailabilityQuery;
use crate::middleware::cors::cors_middleware_with_origins;
use crate::state::AppState;
use crate::utils::dates::{normalize_date, today};
use crate::utils::errors::{validation_error, AppError};

pub fn create_router(state: AppState) -> Router {
    let config = &state.config;

    Router::new()
        .route("/health", get(health))
        .nest("/api/employees", employee_routes::create_employee_router())
        .nest("/api/drivers", employee_routes::create_driver_router())
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/missions", mission_routes::create_mission_router())
        .nest_service(&config.uploads_route, ServeDir::new(&config.upload_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware_with_origins(&config.cors_origins))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Fecha de referencia de una consulta de disponibilidad: `?date=` o hoy
pub(crate) fn availability_date(query: &AvailabilityQuery) -> Result<NaiveDate, AppError> {
    match query.date.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(today()),
        Some(raw) => normalize_date(raw).ok_or_else(|| validation_error("date", "Date invalide")),
    }
}

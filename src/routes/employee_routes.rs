use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use crate::controllers::employee_controller::EmployeeController;
use crate::dto::api_response::ApiResponse;
use crate::dto::employee_dto::{EmployeeRequest, EmployeeResponse};
use crate::dto::mission_dto::AvailabilityQuery;
use crate::models::DriverSummary;
use crate::routes::availability_date;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_employee_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/:id", get(get_employee).put(update_employee).delete(delete_employee))
}

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers))
        .route("/available", get(list_available_drivers))
}

async fn create_employee(
    State(state): State<AppState>,
    Json(request): Json<EmployeeRequest>,
) -> Result<Json<ApiResponse<EmployeeResponse>>, AppError> {
    let controller = EmployeeController::new(state.store.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let controller = EmployeeController::new(state.store.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeResponse>>, AppError> {
    let controller = EmployeeController::new(state.store.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<EmployeeRequest>,
) -> Result<Json<ApiResponse<EmployeeResponse>>, AppError> {
    let controller = EmployeeController::new(state.store.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = EmployeeController::new(state.store.clone());
    controller.delete(id).await?;
    Ok(Json(ApiResponse::message_only("Employé supprimé avec succès")))
}

async fn list_drivers(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeResponse>>, AppError> {
    let controller = EmployeeController::new(state.store.clone());
    let response = controller.list_drivers().await?;
    Ok(Json(response))
}

async fn list_available_drivers(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<DriverSummary>>, AppError> {
    let today = availability_date(&query)?;
    let controller = EmployeeController::new(state.store.clone());
    let response = controller.available_drivers(today).await?;
    Ok(Json(response))
}

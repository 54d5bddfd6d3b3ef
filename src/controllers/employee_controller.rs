use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::employee_dto::{EmployeeRequest, EmployeeResponse};
use crate::models::DriverSummary;
use crate::repositories::RecordStore;
use crate::services::AvailabilityService;
use crate::utils::errors::{not_found_error, AppError};
use chrono::NaiveDate;

pub struct EmployeeController {
    store: Arc<dyn RecordStore>,
}

impl EmployeeController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: EmployeeRequest) -> Result<ApiResponse<EmployeeResponse>, AppError> {
        request.validate()?;

        let employee = self.store.create_employee(request.into_new_employee()).await?;
        info!("👤 Empleado {} creado ({})", employee.id, employee.badge_number);

        Ok(ApiResponse::success_with_message(
            EmployeeResponse::from(employee),
            "Employé ajouté avec succès",
        ))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<EmployeeResponse, AppError> {
        let employee = self
            .store
            .find_employee(id)
            .await?
            .ok_or_else(|| not_found_error("Employee", &id.to_string()))?;

        Ok(EmployeeResponse::from(employee))
    }

    pub async fn list(&self) -> Result<Vec<EmployeeResponse>, AppError> {
        let employees = self.store.list_employees().await?;
        Ok(employees.into_iter().map(EmployeeResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: i64,
        request: EmployeeRequest,
    ) -> Result<ApiResponse<EmployeeResponse>, AppError> {
        request.validate()?;

        let employee = self
            .store
            .update_employee(id, request.into_new_employee())
            .await?
            .ok_or_else(|| not_found_error("Employee", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(
            EmployeeResponse::from(employee),
            "Employé modifié avec succès",
        ))
    }

    /// Un empleado referenciado por una misión (solicitante o conductor) no se borra
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if self.store.find_employee(id).await?.is_none() {
            return Err(not_found_error("Employee", &id.to_string()));
        }
        if self.store.employee_is_referenced(id).await? {
            return Err(AppError::Conflict(format!(
                "L'employé {} est référencé par au moins une mission",
                id
            )));
        }

        self.store.delete_employee(id).await?;
        info!("🗑️ Empleado {} eliminado", id);
        Ok(())
    }

    pub async fn list_drivers(&self) -> Result<Vec<EmployeeResponse>, AppError> {
        let drivers = self.store.list_drivers().await?;
        Ok(drivers.into_iter().map(EmployeeResponse::from).collect())
    }

    pub async fn available_drivers(&self, today: NaiveDate) -> Result<Vec<DriverSummary>, AppError> {
        AvailabilityService::new(self.store.clone())
            .available_drivers(today)
            .await
    }
}

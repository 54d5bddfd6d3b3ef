use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::models::Vehicle;
use crate::repositories::RecordStore;
use crate::services::AvailabilityService;
use crate::utils::errors::{not_found_error, AppError};
use chrono::NaiveDate;

pub struct VehicleController {
    store: Arc<dyn RecordStore>,
}

impl VehicleController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let vehicle = self
            .store
            .create_vehicle(Vehicle {
                matricule: request.matricule,
                make: request.make.trim().to_string(),
                model: request.model.trim().to_string(),
            })
            .await?;
        info!("🚙 Vehículo {} creado ({})", vehicle.matricule, vehicle.descriptor());

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Véhicule ajouté avec succès",
        ))
    }

    pub async fn get_by_matricule(&self, matricule: i32) -> Result<VehicleResponse, AppError> {
        let vehicle = self
            .store
            .find_vehicle(matricule)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &matricule.to_string()))?;

        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn list(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.store.list_vehicles().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn update(
        &self,
        matricule: i32,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        request.validate()?;

        let vehicle = self
            .store
            .update_vehicle(
                matricule,
                request.make.trim().to_string(),
                request.model.trim().to_string(),
            )
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &matricule.to_string()))?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Véhicule modifié avec succès",
        ))
    }

    pub async fn delete(&self, matricule: i32) -> Result<(), AppError> {
        if self.store.find_vehicle(matricule).await?.is_none() {
            return Err(not_found_error("Vehicle", &matricule.to_string()));
        }
        if self.store.vehicle_is_referenced(matricule).await? {
            return Err(AppError::Conflict(format!(
                "Le véhicule {} est affecté à au moins une mission",
                matricule
            )));
        }

        self.store.delete_vehicle(matricule).await?;
        info!("🗑️ Vehículo {} eliminado", matricule);
        Ok(())
    }

    pub async fn available(&self, today: NaiveDate) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = AvailabilityService::new(self.store.clone())
            .available_vehicles(today)
            .await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::employee_dto::non_blank;
use crate::models::Vehicle;

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(range(min = 1, message = "La matricule doit être un entier positif"))]
    pub matricule: i32,

    #[validate(length(min = 1, max = 100, message = "La marque est requise"))]
    #[validate(custom = "non_blank")]
    pub make: String,

    #[validate(length(min = 1, max = 100, message = "Le modèle est requis"))]
    #[validate(custom = "non_blank")]
    pub model: String,
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 100, message = "La marque est requise"))]
    #[validate(custom = "non_blank")]
    pub make: String,

    #[validate(length(min = 1, max = 100, message = "Le modèle est requis"))]
    #[validate(custom = "non_blank")]
    pub model: String,
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub matricule: i32,
    pub make: String,
    pub model: String,
    /// "MARCA MODELO", el valor que espera el campo `vehicule` del formulario de misión
    pub descriptor: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            descriptor: vehicle.descriptor(),
            matricule: vehicle.matricule,
            make: vehicle.make,
            model: vehicle.model,
        }
    }
}

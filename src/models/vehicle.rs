//! Modelo de Vehicle
//!
//! La matrícula es a la vez clave de negocio y clave primaria.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub matricule: i32,
    pub make: String,
    pub model: String,
}

impl Vehicle {
    /// Descriptor "MARCA MODELO" usado por el formulario de misión
    pub fn descriptor(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

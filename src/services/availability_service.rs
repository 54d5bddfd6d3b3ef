//! Consulta de disponibilidad
//!
//! Un conductor o vehículo está ocupado si figura en una misión en curso
//! (`departure_date <= today <= return_date`) o futura (`departure_date > today`).
//! Las misiones pasadas no bloquean.
//!
//! Es una lectura puntual sin bloqueo: dos creaciones concurrentes pueden
//! reservar el mismo recurso para fechas solapadas. Ver
//! `MissionService::check_overlaps` para la verificación opcional en escritura.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

use crate::models::{DriverSummary, Vehicle};
use crate::repositories::RecordStore;
use crate::utils::errors::AppResult;

pub struct AvailabilityService {
    store: Arc<dyn RecordStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn available_drivers(&self, today: NaiveDate) -> AppResult<Vec<DriverSummary>> {
        let drivers = self.store.available_drivers(today).await?;
        debug!("🚗 {} conductor(es) disponible(s) el {}", drivers.len(), today);
        Ok(drivers)
    }

    pub async fn available_vehicles(&self, today: NaiveDate) -> AppResult<Vec<Vehicle>> {
        let vehicles = self.store.available_vehicles(today).await?;
        debug!("🚙 {} vehículo(s) disponible(s) el {}", vehicles.len(), today);
        Ok(vehicles)
    }
}

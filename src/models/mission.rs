//! Modelo de Mission
//!
//! Una misión vincula a un empleado solicitante con un rango de fechas y,
//! opcionalmente, con un par vehículo + conductor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Mission principal - mapea exactamente a la tabla missions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Mission {
    pub id: i64,
    pub subject: String,
    pub destination: String,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub vehicle_matricule: Option<i32>,
    pub driver_id: Option<i64>,
    pub requester_id: i64,
}

impl Mission {
    pub fn transport_mode(&self) -> TransportMode {
        if self.vehicle_matricule.is_none() && self.driver_id.is_none() {
            TransportMode::Common
        } else {
            TransportMode::Vehicle
        }
    }

    /// Una misión en curso o futura bloquea a su vehículo y a su conductor.
    ///
    /// Mismo criterio que la consulta SQL:
    /// `today BETWEEN departure_date AND return_date OR departure_date > today`.
    /// Con fechas NULL la comparación no es verdadera, así que no bloquea.
    pub fn blocks_availability_on(&self, today: NaiveDate) -> bool {
        let Some(departure) = self.departure_date else {
            return false;
        };
        let in_progress = matches!(self.return_date, Some(ret) if departure <= today && today <= ret);
        in_progress || departure > today
    }

    /// Solapamiento inclusivo con otro rango; fechas desconocidas nunca solapan
    pub fn overlaps(&self, departure: NaiveDate, return_date: NaiveDate) -> bool {
        match (self.departure_date, self.return_date) {
            (Some(own_departure), Some(own_return)) => {
                own_departure <= return_date && own_return >= departure
            }
            _ => false,
        }
    }
}

/// Columnas escribibles de una misión (insert y update)
#[derive(Debug, Clone, PartialEq)]
pub struct MissionRecord {
    pub subject: String,
    pub destination: String,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub vehicle_matricule: Option<i32>,
    pub driver_id: Option<i64>,
    pub requester_id: i64,
}

impl MissionRecord {
    pub fn into_mission(self, id: i64) -> Mission {
        Mission {
            id,
            subject: self.subject,
            destination: self.destination,
            departure_date: self.departure_date,
            return_date: self.return_date,
            vehicle_matricule: self.vehicle_matricule,
            driver_id: self.driver_id,
            requester_id: self.requester_id,
        }
    }
}

/// Modo de transporte derivado de la asignación vehículo/conductor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportMode {
    Common,
    Vehicle,
}

impl TransportMode {
    /// Valor del campo `transport` del formulario: "1" común, "2" vehículo.
    /// Un campo vacío equivale a transporte común.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag.trim() {
            "" | "1" => Some(TransportMode::Common),
            "2" => Some(TransportMode::Vehicle),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransportMode::Common => "Transport en commun",
            TransportMode::Vehicle => "Vehicule",
        }
    }
}

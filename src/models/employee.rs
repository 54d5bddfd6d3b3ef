//! Modelo de Employee
//!
//! Un empleado cuyo servicio es "chauffeur" puede ser asignado como conductor
//! de una misión; cualquier otro empleado puede solicitar misiones.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Valor del servicio que marca a un empleado como conductor
pub const DRIVER_DEPARTMENT: &str = "chauffeur";

/// Comparación tolerante con mayúsculas y espacios
pub fn is_driver_department(department: &str) -> bool {
    department.trim().eq_ignore_ascii_case(DRIVER_DEPARTMENT)
}

/// Employee principal - mapea a la tabla employees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: i64,
    pub badge_number: String,
    pub last_name: String,
    pub first_name: String,
    pub department: String,
}

impl Employee {
    pub fn is_driver(&self) -> bool {
        is_driver_department(&self.department)
    }
}

/// Datos de un empleado antes de recibir su clave sustituta
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub badge_number: String,
    pub last_name: String,
    pub first_name: String,
    pub department: String,
}

impl NewEmployee {
    pub fn into_employee(self, id: i64) -> Employee {
        Employee {
            id,
            badge_number: self.badge_number,
            last_name: self.last_name,
            first_name: self.first_name,
            department: self.department,
        }
    }
}

/// Conductor tal como lo devuelven las consultas de disponibilidad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DriverSummary {
    pub id: i64,
    pub last_name: String,
    pub first_name: String,
}

impl From<Employee> for DriverSummary {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            last_name: employee.last_name,
            first_name: employee.first_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_department_is_case_insensitive() {
        assert!(is_driver_department("chauffeur"));
        assert!(is_driver_department(" Chauffeur "));
        assert!(!is_driver_department("comptabilité"));
        assert!(!is_driver_department(""));
    }
}

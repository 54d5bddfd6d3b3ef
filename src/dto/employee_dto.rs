use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{Employee, NewEmployee};

// Request para crear o actualizar un empleado
#[derive(Debug, Deserialize, Validate)]
pub struct EmployeeRequest {
    #[validate(length(min = 1, max = 50, message = "Le matricule est requis"))]
    #[validate(custom = "non_blank")]
    pub badge_number: String,

    #[validate(length(min = 1, max = 100, message = "Le nom est requis"))]
    #[validate(custom = "non_blank")]
    pub last_name: String,

    #[validate(length(min = 1, max = 100, message = "Le prénom est requis"))]
    #[validate(custom = "non_blank")]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Le service est requis"))]
    #[validate(custom = "non_blank")]
    pub department: String,
}

/// Rechaza valores compuestos solo de espacios: se guardan recortados
pub(crate) fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Ce champ ne peut pas être vide".into());
        return Err(error);
    }
    Ok(())
}

impl EmployeeRequest {
    pub fn into_new_employee(self) -> NewEmployee {
        NewEmployee {
            badge_number: self.badge_number.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            department: self.department.trim().to_string(),
        }
    }
}

// Response de empleado
#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub badge_number: String,
    pub last_name: String,
    pub first_name: String,
    pub department: String,
    pub is_driver: bool,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            is_driver: employee.is_driver(),
            id: employee.id,
            badge_number: employee.badge_number,
            last_name: employee.last_name,
            first_name: employee.first_name,
            department: employee.department,
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AttachmentKind, Mission};

/// Campos de texto del formulario multipart de misión
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissionForm {
    pub badge_number: String,
    pub subject: String,
    pub destination: String,
    pub vehicle: String,
    pub driver: String,
    pub transport: String,
    pub departure_date: String,
    pub return_date: String,
    pub id: Option<String>,
    pub current_coordinates_url: Option<String>,
    pub current_image_url: Option<String>,
}

impl MissionForm {
    /// Asigna un campo por su nombre en el formulario
    pub fn set(&mut self, name: &str, value: String) {
        match name {
            "matricule" => self.badge_number = value,
            "objet" => self.subject = value,
            "destination" => self.destination = value,
            "vehicule" => self.vehicle = value,
            "chauffeur" => self.driver = value,
            "transport" => self.transport = value,
            "date_aller" => self.departure_date = value,
            "date_retour" => self.return_date = value,
            "id" => self.id = Some(value),
            "current_coordonnees_url" => self.current_coordinates_url = Some(value),
            "current_image_url" => self.current_image_url = Some(value),
            other => debug!("Campo de formulario ignorado: {}", other),
        }
    }
}

/// Archivo recibido en la petición, todavía en memoria
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub kind: AttachmentKind,
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Tipo según el nombre del campo multipart
    pub fn kind_for_field(field: &str) -> Option<AttachmentKind> {
        match field {
            "coordonnees" => Some(AttachmentKind::Coordinates),
            "file_upload" => Some(AttachmentKind::Image),
            _ => None,
        }
    }
}

/// Resultado del parseo de una petición de creación / actualización
#[derive(Debug, Clone, Default)]
pub struct MissionSubmission {
    pub form: MissionForm,
    pub files: Vec<UploadedFile>,
}

// Response tras crear o actualizar una misión
#[derive(Debug, Serialize, Deserialize)]
pub struct MissionWriteResponse {
    pub mission_id: i64,
    pub files: Vec<String>,
}

// Fila del listado de misiones
#[derive(Debug, Serialize)]
pub struct MissionSummaryResponse {
    pub id: i64,
    pub subject: String,
    pub destination: String,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub transport_type: String,
}

impl From<Mission> for MissionSummaryResponse {
    fn from(mission: Mission) -> Self {
        Self {
            transport_type: mission.transport_mode().label().to_string(),
            id: mission.id,
            subject: mission.subject,
            destination: mission.destination,
            departure_date: mission.departure_date,
            return_date: mission.return_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PersonResponse {
    pub id: i64,
    pub badge_number: String,
    pub last_name: String,
    pub first_name: String,
}

#[derive(Debug, Serialize)]
pub struct LabelledAttachmentResponse {
    pub id: i64,
    pub label: String,
    pub kind: AttachmentKind,
    pub url: String,
}

// Detalle completo de una misión
#[derive(Debug, Serialize)]
pub struct MissionDetailResponse {
    pub id: i64,
    pub subject: String,
    pub destination: String,
    pub departure_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub transport_type: String,
    pub requester: Option<PersonResponse>,
    pub driver: Option<PersonResponse>,
    pub vehicle: Option<crate::dto::vehicle_dto::VehicleResponse>,
    pub coordinates: Vec<LabelledAttachmentResponse>,
    pub images: Vec<LabelledAttachmentResponse>,
}

/// `?date=YYYY-MM-DD` opcional en las consultas de disponibilidad
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_fields_use_french_names() {
        let mut form = MissionForm::default();
        form.set("matricule", "E-001".to_string());
        form.set("objet", "Audit".to_string());
        form.set("date_aller", "25/12/2024".to_string());
        form.set("current_coordonnees_url", "/uploads/a.pdf".to_string());
        form.set("inconnu", "x".to_string());

        assert_eq!(form.badge_number, "E-001");
        assert_eq!(form.subject, "Audit");
        assert_eq!(form.departure_date, "25/12/2024");
        assert_eq!(form.current_coordinates_url.as_deref(), Some("/uploads/a.pdf"));
    }
}

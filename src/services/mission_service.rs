//! Servicio de asignación de misiones
//!
//! Resuelve los identificadores escritos por el usuario (matricule del
//! solicitante, "MARQUE MODELE", "NOM PRENOM") a claves foráneas y guarda una
//! fila de misión con sus adjuntos.
//!
//! Orden de escritura: aceptar archivos → resolver solicitante → resolver
//! vehículo y conductor → insertar / actualizar la misión → registrar adjuntos.
//! Cualquier fallo antes de registrar la misión elimina los archivos aceptados.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ResolutionPolicy;
use crate::dto::mission_dto::{MissionForm, MissionSubmission};
use crate::models::{Attachment, Employee, Mission, MissionRecord, TransportMode, Vehicle};
use crate::repositories::RecordStore;
use crate::services::attachment_service::{
    AttachmentService, CurrentAttachmentHints, LabelledAttachment, StoredUpload,
};
use crate::utils::dates::normalize_date;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignmentPolicy {
    pub resolution: ResolutionPolicy,
    /// Rechazar con `Conflict` un vehículo o conductor ya reservado en fechas solapadas
    pub reject_overlaps: bool,
}

/// Misión guardada y adjuntos registrados en la misma petición
#[derive(Debug, Clone)]
pub struct MissionWriteOutcome {
    pub mission: Mission,
    pub attachments: Vec<Attachment>,
}

/// Misión con sus referencias resueltas, para la vista de detalle
#[derive(Debug, Clone)]
pub struct MissionView {
    pub mission: Mission,
    pub requester: Option<Employee>,
    pub driver: Option<Employee>,
    pub vehicle: Option<Vehicle>,
    pub attachments: Vec<LabelledAttachment>,
}

pub struct MissionService {
    store: Arc<dyn RecordStore>,
    attachments: AttachmentService,
    policy: AssignmentPolicy,
}

impl MissionService {
    pub fn new(store: Arc<dyn RecordStore>, attachments: AttachmentService, policy: AssignmentPolicy) -> Self {
        Self {
            store,
            attachments,
            policy,
        }
    }

    pub async fn create(&self, submission: MissionSubmission) -> AppResult<MissionWriteOutcome> {
        let MissionSubmission { form, files } = submission;
        let uploads = self.attachments.accept(files).await?;

        let mission = match self.insert_mission(&form).await {
            Ok(mission) => mission,
            Err(e) => return Err(self.abort(e, &uploads).await),
        };
        info!("✅ Misión {} creada ({})", mission.id, mission.transport_mode().label());

        let attachments = self
            .attachments
            .attach_all(mission.id, mission.requester_id, uploads)
            .await?;

        Ok(MissionWriteOutcome { mission, attachments })
    }

    pub async fn update(&self, id: i64, submission: MissionSubmission) -> AppResult<MissionWriteOutcome> {
        let MissionSubmission { form, files } = submission;
        let uploads = self.attachments.accept(files).await?;

        let mission = match self.rewrite_mission(id, &form).await {
            Ok(mission) => mission,
            Err(e) => return Err(self.abort(e, &uploads).await),
        };
        info!("✅ Misión {} actualizada ({})", mission.id, mission.transport_mode().label());

        let hints = CurrentAttachmentHints {
            coordinates_url: form.current_coordinates_url,
            image_url: form.current_image_url,
        };
        let attachments = self
            .attachments
            .replace(mission.id, mission.requester_id, uploads, &hints)
            .await?;

        Ok(MissionWriteOutcome { mission, attachments })
    }

    /// Borra la misión (las filas de adjuntos caen en cascada) y después sus archivos
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let attachments = self.store.attachments_for_mission(id).await?;
        if !self.store.delete_mission(id).await? {
            return Err(not_found_error("Mission", &id.to_string()));
        }
        let urls: Vec<String> = attachments.into_iter().map(|a| a.image_url).collect();
        self.attachments.cleanup_urls(&urls).await;
        info!("🗑️ Misión {} eliminada", id);
        Ok(())
    }

    pub async fn list(&self) -> AppResult<Vec<Mission>> {
        self.store.list_missions().await
    }

    pub async fn detail(&self, id: i64) -> AppResult<MissionView> {
        let mission = self
            .store
            .find_mission(id)
            .await?
            .ok_or_else(|| not_found_error("Mission", &id.to_string()))?;

        let requester = self.store.find_employee(mission.requester_id).await?;
        let driver = match mission.driver_id {
            Some(driver_id) => self.store.find_employee(driver_id).await?,
            None => None,
        };
        let vehicle = match mission.vehicle_matricule {
            Some(matricule) => self.store.find_vehicle(matricule).await?,
            None => None,
        };
        let attachments = self.attachments.labelled_for_mission(id).await?;

        Ok(MissionView {
            mission,
            requester,
            driver,
            vehicle,
            attachments,
        })
    }

    async fn abort(&self, error: AppError, uploads: &[StoredUpload]) -> AppError {
        self.attachments.rollback(uploads).await;
        error
    }

    async fn insert_mission(&self, form: &MissionForm) -> AppResult<Mission> {
        let record = self.resolve_record(form, None).await?;
        self.store.create_mission(record).await
    }

    async fn rewrite_mission(&self, id: i64, form: &MissionForm) -> AppResult<Mission> {
        if let Some(raw) = form.id.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
            if raw.parse::<i64>().ok() != Some(id) {
                return Err(validation_error("id", "L'identifiant de la mission ne correspond pas"));
            }
        }
        if self.store.find_mission(id).await?.is_none() {
            return Err(not_found_error("Mission", &id.to_string()));
        }

        let record = self.resolve_record(form, Some(id)).await?;
        self.store
            .update_mission(id, record)
            .await?
            .ok_or_else(|| not_found_error("Mission", &id.to_string()))
    }

    async fn resolve_record(&self, form: &MissionForm, mission_id: Option<i64>) -> AppResult<MissionRecord> {
        let requester = self.resolve_requester(&form.badge_number).await?;

        let mode = TransportMode::from_flag(&form.transport)
            .ok_or_else(|| validation_error("transport", "Mode de transport inconnu"))?;

        let (vehicle, driver) = match mode {
            TransportMode::Common => (None, None),
            TransportMode::Vehicle => (
                self.resolve_vehicle(&form.vehicle).await?,
                self.resolve_driver(&form.driver).await?,
            ),
        };

        let record = MissionRecord {
            subject: form.subject.trim().to_string(),
            destination: form.destination.trim().to_string(),
            departure_date: normalize_date(&form.departure_date),
            return_date: normalize_date(&form.return_date),
            vehicle_matricule: vehicle.map(|v| v.matricule),
            driver_id: driver.map(|d| d.id),
            requester_id: requester.id,
        };

        if self.policy.reject_overlaps {
            self.check_overlaps(&record, mission_id).await?;
        }
        Ok(record)
    }

    /// El solicitante debe existir y no ser conductor
    async fn resolve_requester(&self, badge_number: &str) -> AppResult<Employee> {
        let badge_number = badge_number.trim();
        if badge_number.is_empty() {
            return Err(validation_error("matricule", "Le matricule de l'employé est requis"));
        }

        match self.store.find_employee_by_badge(badge_number).await? {
            Some(employee) if !employee.is_driver() => Ok(employee),
            _ => Err(AppError::NotFound(format!(
                "Aucun employé demandeur avec le matricule '{}'",
                badge_number
            ))),
        }
    }

    async fn resolve_vehicle(&self, descriptor: &str) -> AppResult<Option<Vehicle>> {
        let found = match split_descriptor(descriptor) {
            Some((make, model)) => self.store.find_vehicle_by_make_model(make, model).await?,
            None => None,
        };
        self.apply_policy(found, "vehicule", descriptor)
    }

    async fn resolve_driver(&self, descriptor: &str) -> AppResult<Option<Employee>> {
        let found = match split_descriptor(descriptor) {
            Some((last_name, first_name)) => self.store.find_driver_by_name(last_name, first_name).await?,
            None => None,
        };
        self.apply_policy(found, "chauffeur", descriptor)
    }

    fn apply_policy<T>(&self, found: Option<T>, field: &str, descriptor: &str) -> AppResult<Option<T>> {
        if found.is_some() {
            return Ok(found);
        }
        match self.policy.resolution {
            ResolutionPolicy::Lenient => {
                warn!("⚠️ {} '{}' introuvable, mission enregistrée sans affectation", field, descriptor.trim());
                Ok(None)
            }
            ResolutionPolicy::Strict => Err(AppError::NotFound(format!(
                "{} '{}' introuvable",
                field,
                descriptor.trim()
            ))),
        }
    }

    /// Verificación en escritura: reduce la ventana de doble reserva pero no la
    /// cierra entre escrituras concurrentes (lectura y escritura separadas).
    async fn check_overlaps(&self, record: &MissionRecord, mission_id: Option<i64>) -> AppResult<()> {
        if record.vehicle_matricule.is_none() && record.driver_id.is_none() {
            return Ok(());
        }
        let (Some(departure), Some(return_date)) = (record.departure_date, record.return_date) else {
            return Ok(());
        };

        let conflicts = self
            .store
            .find_overlapping_missions(
                record.vehicle_matricule,
                record.driver_id,
                departure,
                return_date,
                mission_id,
            )
            .await?;

        match conflicts.first() {
            Some(existing) => Err(AppError::Conflict(format!(
                "Le véhicule ou le chauffeur est déjà affecté à la mission {} sur ces dates",
                existing.id
            ))),
            None => Ok(()),
        }
    }
}

/// Separa "MARQUE MODELE" / "NOM PRENOM" en el primer espacio
pub fn split_descriptor(descriptor: &str) -> Option<(&str, &str)> {
    let descriptor = descriptor.trim();
    if descriptor.is_empty() {
        return None;
    }
    Some(match descriptor.split_once(' ') {
        Some((head, tail)) => (head, tail.trim()),
        None => (descriptor, ""),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_descriptor_on_first_space() {
        assert_eq!(split_descriptor("Toyota Corolla"), Some(("Toyota", "Corolla")));
        assert_eq!(split_descriptor("Dupont Jean Pierre"), Some(("Dupont", "Jean Pierre")));
        assert_eq!(split_descriptor(" Renault "), Some(("Renault", "")));
        assert_eq!(split_descriptor("   "), None);
    }
}

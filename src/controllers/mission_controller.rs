use crate::dto::api_response::ApiResponse;
use crate::dto::mission_dto::{
    LabelledAttachmentResponse, MissionDetailResponse, MissionSubmission, MissionSummaryResponse,
    MissionWriteResponse, PersonResponse,
};
use crate::dto::vehicle_dto::VehicleResponse;
use crate::models::{AttachmentKind, Employee};
use crate::services::mission_service::{MissionService, MissionView, MissionWriteOutcome};
use crate::utils::errors::AppError;

pub struct MissionController {
    service: MissionService,
}

impl MissionController {
    pub fn new(service: MissionService) -> Self {
        Self { service }
    }

    pub async fn create(&self, submission: MissionSubmission) -> Result<ApiResponse<MissionWriteResponse>, AppError> {
        let outcome = self.service.create(submission).await?;
        Ok(ApiResponse::success_with_message(
            write_response(outcome),
            "Mission créée avec succès",
        ))
    }

    pub async fn update(
        &self,
        id: i64,
        submission: MissionSubmission,
    ) -> Result<ApiResponse<MissionWriteResponse>, AppError> {
        let outcome = self.service.update(id, submission).await?;
        Ok(ApiResponse::success_with_message(
            write_response(outcome),
            "Mission modifiée avec succès",
        ))
    }

    pub async fn list(&self) -> Result<Vec<MissionSummaryResponse>, AppError> {
        let missions = self.service.list().await?;
        Ok(missions.into_iter().map(MissionSummaryResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<MissionDetailResponse, AppError> {
        let view = self.service.detail(id).await?;
        Ok(detail_response(view))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.service.delete(id).await
    }
}

fn write_response(outcome: MissionWriteOutcome) -> MissionWriteResponse {
    MissionWriteResponse {
        mission_id: outcome.mission.id,
        files: outcome.attachments.into_iter().map(|a| a.image_url).collect(),
    }
}

fn person(employee: Employee) -> PersonResponse {
    PersonResponse {
        id: employee.id,
        badge_number: employee.badge_number,
        last_name: employee.last_name,
        first_name: employee.first_name,
    }
}

fn detail_response(view: MissionView) -> MissionDetailResponse {
    let MissionView {
        mission,
        requester,
        driver,
        vehicle,
        attachments,
    } = view;

    let (coordinates, images): (Vec<_>, Vec<_>) = attachments
        .into_iter()
        .map(|labelled| LabelledAttachmentResponse {
            id: labelled.attachment.id,
            label: labelled.label,
            kind: labelled.kind,
            url: labelled.attachment.image_url,
        })
        .partition(|a| a.kind == AttachmentKind::Coordinates);

    MissionDetailResponse {
        transport_type: mission.transport_mode().label().to_string(),
        id: mission.id,
        subject: mission.subject,
        destination: mission.destination,
        departure_date: mission.departure_date,
        return_date: mission.return_date,
        requester: requester.map(person),
        driver: driver.map(person),
        vehicle: vehicle.map(VehicleResponse::from),
        coordinates,
        images,
    }
}

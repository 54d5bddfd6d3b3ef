use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::debug;

use crate::controllers::mission_controller::MissionController;
use crate::dto::api_response::ApiResponse;
use crate::dto::mission_dto::{
    MissionDetailResponse, MissionSubmission, MissionSummaryResponse, MissionWriteResponse, UploadedFile,
};
use crate::models::AttachmentKind;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_mission_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_missions).post(create_mission))
        .route("/:id", get(get_mission).put(update_mission).delete(delete_mission))
}

async fn create_mission(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MissionWriteResponse>>), AppError> {
    let submission = read_submission(multipart).await?;
    let controller = MissionController::new(state.mission_service());
    let response = controller.create(submission).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_mission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MissionDetailResponse>, AppError> {
    let controller = MissionController::new(state.mission_service());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_missions(
    State(state): State<AppState>,
) -> Result<Json<Vec<MissionSummaryResponse>>, AppError> {
    let controller = MissionController::new(state.mission_service());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn update_mission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<MissionWriteResponse>>, AppError> {
    let submission = read_submission(multipart).await?;
    let controller = MissionController::new(state.mission_service());
    let response = controller.update(id, submission).await?;
    Ok(Json(response))
}

async fn delete_mission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = MissionController::new(state.mission_service());
    controller.delete(id).await?;
    Ok(Json(ApiResponse::message_only("Mission supprimée avec succès")))
}

/// Lee el formulario multipart completo: campos de texto y archivos en memoria.
/// Los campos de archivo vacíos (input sin selección) se ignoran.
async fn read_submission(mut multipart: Multipart) -> Result<MissionSubmission, AppError> {
    let mut submission = MissionSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match UploadedFile::kind_for_field(&name) {
            Some(kind) => {
                if let Some(file) = read_file(field, kind).await? {
                    submission.files.push(file);
                }
            }
            None => {
                let value = field.text().await.map_err(multipart_error)?;
                submission.form.set(&name, value);
            }
        }
    }

    debug!(
        "📨 Formulario de misión recibido: {} archivo(s)",
        submission.files.len()
    );
    Ok(submission)
}

async fn read_file(field: Field<'_>, kind: AttachmentKind) -> Result<Option<UploadedFile>, AppError> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(multipart_error)?;

    if bytes.is_empty() {
        debug!("Campo de archivo vacío ignorado: '{}'", original_name);
        return Ok(None);
    }

    Ok(Some(UploadedFile {
        kind,
        original_name,
        content_type,
        bytes: bytes.to_vec(),
    }))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Formulaire multipart invalide: {}", e.body_text()))
}

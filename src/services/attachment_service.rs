//! Ciclo de vida de los adjuntos de una misión
//!
//! Un único documento de coordenadas (PDF) y de cero a N imágenes por misión.
//! Los archivos se escriben primero en el almacenamiento (`accept`) y después
//! se registran en la base de datos (`attach_all` / `replace`). Las limpiezas
//! de archivos son best-effort: un fallo se registra en el log y nunca se
//! propaga a la operación que la provocó.

use chrono::Utc;
use rand::Rng;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::dto::mission_dto::UploadedFile;
use crate::models::{Attachment, AttachmentKind, NewAttachment};
use crate::repositories::RecordStore;
use crate::storage::FileStorage;
use crate::utils::errors::{validation_error, AppResult};

const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];

/// Archivo ya escrito en el almacenamiento y aún sin fila en la base de datos
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpload {
    pub kind: AttachmentKind,
    pub file_name: String,
    pub url: String,
}

/// Adjunto con su etiqueta de presentación ("Coordonnées 1", "Image 2", ...)
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledAttachment {
    pub attachment: Attachment,
    pub kind: AttachmentKind,
    pub label: String,
}

/// URLs que el cliente cree vigentes; solo se usan para detectar desajustes
#[derive(Debug, Clone, Default)]
pub struct CurrentAttachmentHints {
    pub coordinates_url: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Clone)]
pub struct AttachmentService {
    store: Arc<dyn RecordStore>,
    storage: Arc<dyn FileStorage>,
    uploads_route: String,
    max_images: usize,
}

impl AttachmentService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        storage: Arc<dyn FileStorage>,
        uploads_route: impl Into<String>,
        max_images: usize,
    ) -> Self {
        Self {
            store,
            storage,
            uploads_route: uploads_route.into(),
            max_images,
        }
    }

    /// Valida y escribe los archivos recibidos con nombres únicos generados.
    ///
    /// Si una escritura falla, los archivos ya escritos se eliminan antes de
    /// devolver el error.
    pub async fn accept(&self, files: Vec<UploadedFile>) -> AppResult<Vec<StoredUpload>> {
        self.validate(&files)?;

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            let file_name = generate_file_name(file.kind, &file.original_name, file.content_type.as_deref());
            if let Err(e) = self.storage.save(&file_name, &file.bytes).await {
                self.rollback(&stored).await;
                return Err(e);
            }
            stored.push(StoredUpload {
                kind: file.kind,
                url: self.url_for(&file_name),
                file_name,
            });
        }
        Ok(stored)
    }

    /// URL pública de un archivo subido: `/<prefijo>/<nombre>`
    fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.uploads_route, file_name)
    }

    fn validate(&self, files: &[UploadedFile]) -> AppResult<()> {
        let coordinates = files.iter().filter(|f| f.kind == AttachmentKind::Coordinates).count();
        let images = files.len() - coordinates;

        if coordinates > 1 {
            return Err(validation_error("coordonnees", "Un seul fichier de coordonnées est accepté"));
        }
        if images > self.max_images {
            return Err(validation_error("file_upload", "Trop d'images pour une seule mission"));
        }

        for file in files {
            match file.kind {
                AttachmentKind::Coordinates if !is_pdf(file) => {
                    return Err(validation_error("coordonnees", "Le fichier de coordonnées doit être un PDF"));
                }
                AttachmentKind::Image if !is_image(file) => {
                    return Err(validation_error("file_upload", "Seules les images sont acceptées"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Registra los archivos aceptados como adjuntos de la misión.
    ///
    /// No hay transacción con la fila de la misión: si un insert falla, la
    /// misión queda guardada y solo se eliminan los archivos aún sin registrar.
    pub async fn attach_all(
        &self,
        mission_id: i64,
        employee_id: i64,
        uploads: Vec<StoredUpload>,
    ) -> AppResult<Vec<Attachment>> {
        let mut attached = Vec::with_capacity(uploads.len());
        for (index, upload) in uploads.iter().enumerate() {
            let row = NewAttachment {
                employee_id,
                image_url: upload.url.clone(),
                mission_id,
            };
            match self.store.create_attachment(row).await {
                Ok(attachment) => attached.push(attachment),
                Err(e) => {
                    self.rollback(&uploads[index..]).await;
                    return Err(e);
                }
            }
        }
        Ok(attached)
    }

    /// Sustituye, por tipo, los adjuntos existentes por los nuevos.
    ///
    /// Un tipo sin archivos nuevos queda intacto. Con archivos nuevos, las filas
    /// anteriores de ese tipo se borran y sus archivos se eliminan (best-effort)
    /// antes de registrar los nuevos.
    pub async fn replace(
        &self,
        mission_id: i64,
        employee_id: i64,
        uploads: Vec<StoredUpload>,
        hints: &CurrentAttachmentHints,
    ) -> AppResult<Vec<Attachment>> {
        let existing = match self.store.attachments_for_mission(mission_id).await {
            Ok(existing) => existing,
            Err(e) => {
                self.rollback(&uploads).await;
                return Err(e);
            }
        };

        for (kind, hint) in [
            (AttachmentKind::Coordinates, hints.coordinates_url.as_deref()),
            (AttachmentKind::Image, hints.image_url.as_deref()),
        ] {
            if !uploads.iter().any(|u| u.kind == kind) {
                continue;
            }
            let superseded: Vec<&Attachment> = existing.iter().filter(|a| a.kind() == kind).collect();
            warn_on_stale_hint(mission_id, kind, hint, &superseded);

            let mut orphaned = Vec::with_capacity(superseded.len());
            for attachment in superseded {
                if let Err(e) = self.store.delete_attachment(attachment.id).await {
                    self.rollback(&uploads).await;
                    return Err(e);
                }
                orphaned.push(attachment.image_url.clone());
            }
            self.cleanup_urls(&orphaned).await;
        }

        self.attach_all(mission_id, employee_id, uploads).await
    }

    /// Elimina archivos aceptados que no llegarán a registrarse
    pub async fn rollback(&self, uploads: &[StoredUpload]) {
        for upload in uploads {
            if let Err(e) = self.storage.delete(&upload.file_name).await {
                warn!("⚠️ No se pudo revertir el archivo subido {}: {}", upload.file_name, e);
            }
        }
        if !uploads.is_empty() {
            info!("↩️ {} archivo(s) subido(s) revertido(s)", uploads.len());
        }
    }

    /// Limpieza best-effort de archivos cuya fila ya no existe
    pub async fn cleanup_urls(&self, urls: &[String]) {
        for url in urls {
            let file_name = file_name_from_url(url);
            if let Err(e) = self.storage.delete(file_name).await {
                warn!("⚠️ No se pudo eliminar el archivo {}: {}", url, e);
            }
        }
    }

    /// Adjuntos de la misión separados en coordenadas e imágenes, ya etiquetados
    pub async fn labelled_for_mission(&self, mission_id: i64) -> AppResult<Vec<LabelledAttachment>> {
        let attachments = self.store.attachments_for_mission(mission_id).await?;
        Ok(label_attachments(attachments))
    }
}

fn warn_on_stale_hint(mission_id: i64, kind: AttachmentKind, hint: Option<&str>, stored: &[&Attachment]) {
    let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) else {
        return;
    };
    if !stored.iter().any(|a| a.image_url == hint) {
        warn!(
            "⚠️ Misión {}: la URL actual {:?} enviada por el cliente no coincide con ningún adjunto {:?}",
            mission_id, hint, kind
        );
    }
}

/// Etiqueta los adjuntos por tipo, conservando el orden recibido dentro de cada tipo
pub fn label_attachments(attachments: Vec<Attachment>) -> Vec<LabelledAttachment> {
    let mut coordinates = 0;
    let mut images = 0;
    attachments
        .into_iter()
        .map(|attachment| {
            let kind = attachment.kind();
            let n = match kind {
                AttachmentKind::Coordinates => {
                    coordinates += 1;
                    coordinates
                }
                AttachmentKind::Image => {
                    images += 1;
                    images
                }
            };
            LabelledAttachment {
                label: kind.label(n),
                kind,
                attachment,
            }
        })
        .collect()
}

/// `<campo>-<microsegundos>-<aleatorio><.ext>`
///
/// La marca de tiempo tiene ancho fijo, así que el orden lexicográfico de los
/// nombres de un mismo tipo sigue el orden de creación.
pub fn generate_file_name(kind: AttachmentKind, original_name: &str, content_type: Option<&str>) -> String {
    let prefix = match kind {
        AttachmentKind::Coordinates => "coordonnees",
        AttachmentKind::Image => "file_upload",
    };
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!(
        "{}-{:016}-{:09}.{}",
        prefix,
        Utc::now().timestamp_micros(),
        suffix,
        stored_extension(kind, original_name, content_type)
    )
}

/// Última parte de una URL de adjunto: "/uploads/a.pdf" → "a.pdf"
pub fn file_name_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn stored_extension(kind: AttachmentKind, original_name: &str, content_type: Option<&str>) -> String {
    match kind {
        AttachmentKind::Coordinates => "pdf".to_string(),
        AttachmentKind::Image => extension_of(original_name)
            .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .or_else(|| {
                content_type
                    .and_then(|ct| ct.strip_prefix("image/"))
                    .map(|sub| sub.split(['+', ';']).next().unwrap_or(sub).trim().to_ascii_lowercase())
                    .filter(|sub| IMAGE_EXTENSIONS.contains(&sub.as_str()))
            })
            .unwrap_or_else(|| "img".to_string()),
    }
}

fn is_pdf(file: &UploadedFile) -> bool {
    file.content_type.as_deref() == Some("application/pdf")
        || extension_of(&file.original_name).as_deref() == Some("pdf")
}

fn is_image(file: &UploadedFile) -> bool {
    let extension = extension_of(&file.original_name);
    if extension.as_deref() == Some("pdf") {
        return false;
    }
    let image_type = file
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("image/"));
    image_type || extension.is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(id: i64, url: &str) -> Attachment {
        Attachment {
            id,
            employee_id: 1,
            image_url: url.to_string(),
            mission_id: 9,
        }
    }

    fn upload(kind: AttachmentKind, name: &str, content_type: &str) -> UploadedFile {
        UploadedFile {
            kind,
            original_name: name.to_string(),
            content_type: Some(content_type.to_string()),
            bytes: b"data".to_vec(),
        }
    }

    #[test]
    fn test_labels_are_numbered_per_bucket() {
        let labelled = label_attachments(vec![
            attachment(1, "/uploads/coordonnees-1.pdf"),
            attachment(2, "/uploads/file_upload-1.png"),
            attachment(3, "/uploads/file_upload-2.jpg"),
        ]);
        let labels: Vec<&str> = labelled.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Coordonnées 1", "Image 1", "Image 2"]);
    }

    #[test]
    fn test_generated_names_are_time_ordered_and_unique() {
        let first = generate_file_name(AttachmentKind::Image, "photo.PNG", Some("image/png"));
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = generate_file_name(AttachmentKind::Image, "photo.png", Some("image/png"));

        assert!(first.starts_with("file_upload-"));
        assert!(first.ends_with(".png"));
        assert!(first < second);
    }

    #[test]
    fn test_coordinates_are_always_stored_as_pdf() {
        let name = generate_file_name(AttachmentKind::Coordinates, "plan", Some("application/pdf"));
        assert!(name.starts_with("coordonnees-"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(AttachmentKind::from_url(&name), AttachmentKind::Coordinates);
    }

    #[test]
    fn test_image_extension_falls_back_to_content_type() {
        assert_eq!(stored_extension(AttachmentKind::Image, "photo", Some("image/jpeg")), "jpeg");
        assert_eq!(stored_extension(AttachmentKind::Image, "scan.tiff", Some("image/svg+xml")), "svg");
        assert_eq!(stored_extension(AttachmentKind::Image, "photo", None), "img");
        assert_eq!(stored_extension(AttachmentKind::Image, "scan", Some("image/pdf")), "img");
        assert_eq!(stored_extension(AttachmentKind::Image, "scan", Some("image/x-icon")), "img");
    }

    #[test]
    fn test_file_type_checks() {
        assert!(is_pdf(&upload(AttachmentKind::Coordinates, "plan.pdf", "application/octet-stream")));
        assert!(!is_pdf(&upload(AttachmentKind::Coordinates, "plan.docx", "application/msword")));
        assert!(is_image(&upload(AttachmentKind::Image, "photo.jpg", "application/octet-stream")));
        assert!(!is_image(&upload(AttachmentKind::Image, "disguised.pdf", "image/png")));

        let name = generate_file_name(AttachmentKind::Image, "scan", Some("image/pdf"));
        assert_eq!(AttachmentKind::from_url(&name), AttachmentKind::Image);
    }

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(file_name_from_url("/uploads/a.pdf"), "a.pdf");
        assert_eq!(file_name_from_url("a.pdf"), "a.pdf");
    }
}

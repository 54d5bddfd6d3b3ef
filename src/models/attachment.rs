//! Modelo de Attachment
//!
//! Archivos subidos asociados a una misión. El tipo no se guarda: se deduce
//! de la URL (".pdf" → documento de coordenadas, cualquier otro → imagen).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Attachment {
    pub id: i64,
    pub employee_id: i64,
    pub image_url: String,
    pub mission_id: i64,
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::from_url(&self.image_url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttachment {
    pub employee_id: i64,
    pub image_url: String,
    pub mission_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Coordinates,
    Image,
}

impl AttachmentKind {
    pub fn from_url(url: &str) -> Self {
        if url.to_lowercase().contains(".pdf") {
            AttachmentKind::Coordinates
        } else {
            AttachmentKind::Image
        }
    }

    /// Etiqueta mostrada en el detalle, `n` empieza en 1
    pub fn label(&self, n: usize) -> String {
        match self {
            AttachmentKind::Coordinates => format!("Coordonnées {}", n),
            AttachmentKind::Image => format!("Image {}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_sniffed_from_extension() {
        assert_eq!(AttachmentKind::from_url("/uploads/coordonnees-1.PDF"), AttachmentKind::Coordinates);
        assert_eq!(AttachmentKind::from_url("/uploads/file_upload-1.png"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::Image.label(2), "Image 2");
        assert_eq!(AttachmentKind::Coordinates.label(1), "Coordonnées 1");
    }
}

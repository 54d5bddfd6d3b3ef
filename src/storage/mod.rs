//! Almacenamiento de archivos subidos
//!
//! Directorio compartido con nombres únicos generados; ver `LocalFileStorage`.

pub mod local;

use async_trait::async_trait;

use crate::utils::errors::AppResult;

pub use local::LocalFileStorage;

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Escribe un archivo nuevo; falla si el nombre ya existe
    async fn save(&self, file_name: &str, bytes: &[u8]) -> AppResult<()>;

    async fn delete(&self, file_name: &str) -> AppResult<()>;

    async fn exists(&self, file_name: &str) -> bool;
}

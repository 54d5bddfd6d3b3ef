use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::{
    fs,
    io::{AsyncWrite, AsyncWriteExt},
};
use tracing::{debug, warn};

use super::FileStorage;
use crate::utils::errors::{AppError, AppResult};

/// Archivos en un directorio local servido como estático
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Crea el directorio si no existe
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| AppError::Storage(format!("cannot create {}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Solo nombres planos: nada de separadores ni "..".
    fn path_for(&self, file_name: &str) -> AppResult<PathBuf> {
        let is_plain = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains(['/', '\\']);
        if !is_plain {
            return Err(AppError::Storage(format!("invalid file name '{}'", file_name)));
        }
        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> AppResult<()> {
        let path = self.path_for(file_name)?;
        let file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
            .await
            .map_err(|e| AppError::Storage(format!("cannot create {}: {}", path.display(), e)))?;
        write_or_remove(file, &path, bytes).await?;

        debug!("💾 Archivo guardado: {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    async fn delete(&self, file_name: &str) -> AppResult<()> {
        let path = self.path_for(file_name)?;
        fs::remove_file(&path)
            .await
            .map_err(|e| AppError::Storage(format!("cannot delete {}: {}", path.display(), e)))?;

        debug!("🗑️ Archivo eliminado: {}", path.display());
        Ok(())
    }

    async fn exists(&self, file_name: &str) -> bool {
        match self.path_for(file_name) {
            Ok(path) => fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}

/// Escribe el contenido completo; si falla, borra el archivo a medio escribir
async fn write_or_remove<W>(mut writer: W, path: &Path, bytes: &[u8]) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    }
    .await;
    drop(writer);

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(path).await {
            warn!("⚠️ No se pudo borrar el archivo incompleto {}: {}", path.display(), cleanup);
        }
        return Err(AppError::Storage(format!("cannot write {}: {}", path.display(), e)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Writer que falla en la primera escritura
    struct BrokenWriter;

    impl AsyncWrite for BrokenWriter {
        fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left on device")))
        }

        fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file_upload-1.png");
        std::fs::write(&path, b"partial").unwrap();

        let err = write_or_remove(BrokenWriter, &path, b"complete image").await.unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_save_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path()).await.unwrap();

        storage.save("a.pdf", b"%PDF-1.4").await.unwrap();
        assert!(storage.exists("a.pdf").await);

        storage.delete("a.pdf").await.unwrap();
        assert!(!storage.exists("a.pdf").await);
    }

    #[tokio::test]
    async fn test_existing_names_are_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path()).await.unwrap();

        storage.save("a.png", b"first").await.unwrap();
        let err = storage.save("a.png", b"second").await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(std::fs::read(dir.path().join("a.png")).unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_path_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path()).await.unwrap();

        assert!(storage.save("../escape.png", b"x").await.is_err());
        assert!(storage.delete("..").await.is_err());
    }
}

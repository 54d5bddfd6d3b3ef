//! Utilidades compartidas por los tests de integración
//!
//! Levanta el router completo sobre `InMemoryRecordStore` y un directorio de
//! adjuntos temporal, y lo recorre con `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use mission_fleet::config::EnvironmentConfig;
use mission_fleet::repositories::{InMemoryRecordStore, RecordStore};
use mission_fleet::routes::create_router;
use mission_fleet::state::AppState;
use mission_fleet::storage::{FileStorage, LocalFileStorage};

pub const BOUNDARY: &str = "----mission-fleet-boundary";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn RecordStore>,
    pub uploads: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut EnvironmentConfig)) -> Self {
        let uploads = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(uploads.path()).await.unwrap();
        Self::build(uploads, Arc::new(InMemoryRecordStore::new()), Arc::new(storage), adjust)
    }

    /// Variante con un almacenamiento a medida (p. ej. uno que falla al borrar)
    pub async fn with_storage<F>(make_storage: F) -> Self
    where
        F: FnOnce(LocalFileStorage) -> Arc<dyn FileStorage>,
    {
        let uploads = TempDir::new().unwrap();
        let local = LocalFileStorage::new(uploads.path()).await.unwrap();
        Self::build(uploads, Arc::new(InMemoryRecordStore::new()), make_storage(local), |_| {})
    }

    /// Variante con un store a medida (p. ej. uno que falla en una consulta)
    pub async fn with_store(store: Arc<dyn RecordStore>) -> Self {
        let uploads = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(uploads.path()).await.unwrap();
        Self::build(uploads, store, Arc::new(storage), |_| {})
    }

    fn build(
        uploads: TempDir,
        store: Arc<dyn RecordStore>,
        storage: Arc<dyn FileStorage>,
        adjust: impl FnOnce(&mut EnvironmentConfig),
    ) -> Self {
        let mut config = EnvironmentConfig {
            upload_dir: uploads.path().to_path_buf(),
            ..EnvironmentConfig::default()
        };
        adjust(&mut config);

        let state = AppState::new(store.clone(), storage, config);

        Self {
            router: create_router(state),
            store,
            uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn multipart(&self, method: Method, uri: &str, form: MultipartForm) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(form.finish()))
            .unwrap();
        self.send(request).await
    }

    pub async fn add_employee(&self, badge: &str, last_name: &str, first_name: &str, department: &str) -> i64 {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/employees",
                json!({
                    "badge_number": badge,
                    "last_name": last_name,
                    "first_name": first_name,
                    "department": department,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }

    pub async fn add_vehicle(&self, matricule: i32, make: &str, model: &str) {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/vehicles",
                json!({ "matricule": matricule, "make": make, "model": model }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }

    /// Flota mínima: un solicitante, un conductor y un vehículo
    pub async fn seed_fleet(&self) {
        self.add_employee("E-100", "Martin", "Claire", "Comptabilité").await;
        self.add_employee("D-200", "Dupont", "Jean", "chauffeur").await;
        self.add_vehicle(101, "Toyota", "Corolla").await;
    }

    pub async fn create_mission(&self, form: MultipartForm) -> (StatusCode, Value) {
        self.multipart(Method::POST, "/api/missions", form).await
    }

    pub fn stored_files(&self) -> Vec<String> {
        list_files(self.uploads.path())
    }

    pub fn file_exists(&self, url: &str) -> bool {
        let name = url.rsplit('/').next().unwrap();
        self.uploads.path().join(name).exists()
    }
}

pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Cuerpo multipart/form-data construido a mano
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn pdf(self, file_name: &str) -> Self {
        self.file("coordonnees", file_name, "application/pdf", b"%PDF-1.4 coordonnees")
    }

    pub fn image(self, file_name: &str) -> Self {
        self.file("file_upload", file_name, "image/png", b"\x89PNG fake image")
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.body
    }
}

/// Formulario de misión con vehículo: "Toyota Corolla" conducido por "Dupont Jean"
pub fn vehicle_mission(departure: &str, return_date: &str) -> MultipartForm {
    MultipartForm::new()
        .text("matricule", "E-100")
        .text("objet", "Audit annuel")
        .text("destination", "Lyon")
        .text("transport", "2")
        .text("vehicule", "Toyota Corolla")
        .text("chauffeur", "Dupont Jean")
        .text("date_aller", departure)
        .text("date_retour", return_date)
}

/// Formulario de misión en transporte en común
pub fn common_transport_mission(departure: &str, return_date: &str) -> MultipartForm {
    MultipartForm::new()
        .text("matricule", "E-100")
        .text("objet", "Formation")
        .text("destination", "Paris")
        .text("transport", "1")
        .text("date_aller", departure)
        .text("date_retour", return_date)
}

pub fn mission_id(body: &Value) -> i64 {
    body["data"]["mission_id"].as_i64().unwrap()
}

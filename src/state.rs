//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. No guarda nada por petición: los archivos
//! subidos viajan como valores entre el parseo y los servicios.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::RecordStore;
use crate::services::{AssignmentPolicy, AttachmentService, MissionService};
use crate::storage::FileStorage;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub storage: Arc<dyn FileStorage>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, storage: Arc<dyn FileStorage>, config: EnvironmentConfig) -> Self {
        Self {
            store,
            storage,
            config,
        }
    }

    pub fn attachment_service(&self) -> AttachmentService {
        AttachmentService::new(
            self.store.clone(),
            self.storage.clone(),
            self.config.uploads_route.clone(),
            self.config.max_images_per_submission,
        )
    }

    pub fn mission_service(&self) -> MissionService {
        MissionService::new(
            self.store.clone(),
            self.attachment_service(),
            AssignmentPolicy {
                resolution: self.config.resolution_policy,
                reject_overlaps: self.config.reject_overlapping_assignments,
            },
        )
    }
}

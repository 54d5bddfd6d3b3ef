//! Repositorios de acceso a datos
//!
//! Un repositorio por tabla sobre `PgPool`, agrupados detrás del trait
//! `RecordStore`.

pub mod attachment_repository;
pub mod employee_repository;
pub mod memory_store;
pub mod mission_repository;
pub mod record_store;
pub mod vehicle_repository;

pub use memory_store::InMemoryRecordStore;
pub use record_store::{PgRecordStore, RecordStore};

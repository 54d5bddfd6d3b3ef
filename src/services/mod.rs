//! Servicios de negocio
//!
//! Disponibilidad de recursos, asignación de misiones y ciclo de vida
//! de los adjuntos.

pub mod attachment_service;
pub mod availability_service;
pub mod mission_service;

pub use attachment_service::AttachmentService;
pub use availability_service::AvailabilityService;
pub use mission_service::{AssignmentPolicy, MissionService};

//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean exactamente
//! al schema PostgreSQL (ver `migrations/`).

pub mod attachment;
pub mod employee;
pub mod mission;
pub mod vehicle;

pub use attachment::{Attachment, AttachmentKind, NewAttachment};
pub use employee::{DriverSummary, Employee, NewEmployee};
pub use mission::{Mission, MissionRecord, TransportMode};
pub use vehicle::Vehicle;

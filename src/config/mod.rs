//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos, variables de entorno
//! y políticas de asignación de misiones.

pub mod database;
pub mod environment;

pub use environment::*;

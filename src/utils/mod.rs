//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores y
//! normalización de fechas de los formularios.

pub mod dates;
pub mod errors;

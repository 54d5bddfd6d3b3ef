//! Middleware del sistema
//!
//! CORS para el front-end.

pub mod cors;

pub use cors::*;

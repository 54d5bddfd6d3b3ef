//! Controladores
//!
//! Validan las peticiones, llaman al store o a los servicios y convierten
//! los modelos en DTOs.

pub mod employee_controller;
pub mod mission_controller;
pub mod vehicle_controller;

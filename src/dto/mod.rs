//! DTOs de la API
//!
//! Requests y responses expuestos por las rutas HTTP.

pub mod api_response;
pub mod employee_dto;
pub mod mission_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;

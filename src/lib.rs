//! Gestión de misiones de la flota
//!
//! Empleados, vehículos, misiones y sus adjuntos (coordenadas PDF e imágenes)
//! sobre PostgreSQL, expuestos como API HTTP con Axum.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

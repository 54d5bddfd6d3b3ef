//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Todas las variables tienen un valor por defecto razonable salvo `DATABASE_URL`,
//! que se lee en `config::database`.

use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Qué hacer cuando el vehículo o el conductor de una misión no se encuentra
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// La misión se guarda sin vehículo/conductor (comportamiento histórico)
    #[default]
    Lenient,
    /// La petición falla con `NotFound`
    Strict,
}

impl FromStr for ResolutionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(ResolutionPolicy::Lenient),
            "strict" => Ok(ResolutionPolicy::Strict),
            other => Err(anyhow!("unknown resolution policy '{}'", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub log_level: tracing::Level,
    pub request_timeout_secs: u64,
    // Adjuntos
    pub upload_dir: PathBuf,
    pub uploads_route: String,
    pub max_images_per_submission: usize,
    pub max_upload_bytes: usize,
    // Asignación de misiones
    pub resolution_policy: ResolutionPolicy,
    pub reject_overlapping_assignments: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 8080,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["http://localhost:5173".to_string()],
            log_level: tracing::Level::INFO,
            request_timeout_secs: 30,
            upload_dir: PathBuf::from("./uploads"),
            uploads_route: "/uploads".to_string(),
            max_images_per_submission: 5,
            max_upload_bytes: 25 * 1024 * 1024,
            resolution_policy: ResolutionPolicy::Lenient,
            reject_overlapping_assignments: false,
        }
    }
}

/// Lee una variable y la convierte, o devuelve el valor por defecto si no existe
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has an invalid value '{}': {}", name, raw, e)),
        _ => Ok(default),
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => defaults.cors_origins,
        };

        let uploads_route = normalize_route(&env::var("UPLOADS_ROUTE").unwrap_or(defaults.uploads_route));

        let config = Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            cors_origins,
            log_level: parse_var("LOG_LEVEL", defaults.log_level)?,
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            upload_dir: env::var("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            uploads_route,
            max_images_per_submission: parse_var(
                "MAX_IMAGES_PER_SUBMISSION",
                defaults.max_images_per_submission,
            )?,
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            resolution_policy: parse_var("RESOLUTION_POLICY", defaults.resolution_policy)?,
            reject_overlapping_assignments: parse_var(
                "REJECT_OVERLAPPING_ASSIGNMENTS",
                defaults.reject_overlapping_assignments,
            )?,
        };

        if config.max_images_per_submission == 0 {
            return Err(anyhow!("MAX_IMAGES_PER_SUBMISSION must be at least 1"));
        }
        if config.uploads_route == "/" {
            return Err(anyhow!("UPLOADS_ROUTE cannot be the root path"));
        }

        Ok(config)
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// "/uploads/" o "uploads" → "/uploads"
fn normalize_route(raw: &str) -> String {
    format!("/{}", raw.trim().trim_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_policy_parsing() {
        assert_eq!("strict".parse::<ResolutionPolicy>().unwrap(), ResolutionPolicy::Strict);
        assert_eq!(" Lenient ".parse::<ResolutionPolicy>().unwrap(), ResolutionPolicy::Lenient);
        assert!("sometimes".parse::<ResolutionPolicy>().is_err());
    }

    #[test]
    fn test_normalize_route() {
        assert_eq!(normalize_route("uploads/"), "/uploads");
        assert_eq!(normalize_route("/files"), "/files");
    }
}

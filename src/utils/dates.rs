//! Normalización de fechas
//!
//! Los formularios envían las fechas como `DD/MM/YYYY` o `YYYY-MM-DD`.
//! Un valor que no encaja en ninguno de los dos formatos se guarda como NULL
//! en lugar de rechazar la petición.

use chrono::{Local, NaiveDate};

const ACCEPTED_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];

/// Convierte una fecha textual en `NaiveDate`, o `None` si no es válida
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Fecha local del servidor, usada por las consultas de disponibilidad
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("25/12/2024")]
    #[case("2024-12-25")]
    #[case("  2024-12-25 ")]
    fn test_both_formats_yield_same_calendar_date(#[case] raw: &str) {
        assert_eq!(normalize_date(raw), NaiveDate::from_ymd_opt(2024, 12, 25));
    }

    #[rstest]
    #[case("")]
    #[case("31/02/2024")]
    #[case("2024/12/25")]
    #[case("demain")]
    #[case("12-25-2024")]
    fn test_malformed_dates_become_none(#[case] raw: &str) {
        assert_eq!(normalize_date(raw), None);
    }
}

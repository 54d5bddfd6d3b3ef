use crate::models::Vehicle;
use crate::utils::errors::{map_constraint_violation, AppError};
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, vehicle: Vehicle) -> Result<Vehicle, AppError> {
        let created = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (matricule, make, model)
            VALUES ($1, $2, $3)
            RETURNING *
            "#
        )
        .bind(vehicle.matricule)
        .bind(vehicle.make)
        .bind(vehicle.model)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "Error creating vehicle"))?;

        Ok(created)
    }

    pub async fn find_by_matricule(&self, matricule: i32) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE matricule = $1")
            .bind(matricule)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_by_make_model(&self, make: &str, model: &str) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE make = $1 AND model = $2 ORDER BY matricule LIMIT 1"
        )
        .bind(make)
        .bind(model)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY matricule")
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    pub async fn update(&self, matricule: i32, make: String, model: String) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET make = $2, model = $3
            WHERE matricule = $1
            RETURNING *
            "#
        )
        .bind(matricule)
        .bind(make)
        .bind(model)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, matricule: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE matricule = $1")
            .bind(matricule)
            .execute(&self.pool)
            .await
            .map_err(|e| map_constraint_violation(e, "Error deleting vehicle"))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn is_referenced(&self, matricule: i32) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM missions WHERE vehicle_matricule = $1)"
        )
        .bind(matricule)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Vehículos sin misión en curso ni futura a fecha `today`
    pub async fn available(&self, today: NaiveDate) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT v.matricule, v.make, v.model
            FROM vehicles v
            WHERE NOT EXISTS (
                SELECT 1 FROM missions m
                WHERE m.vehicle_matricule = v.matricule
                AND (($1 BETWEEN m.departure_date AND m.return_date) OR m.departure_date > $1)
            )
            ORDER BY v.matricule
            "#
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }
}

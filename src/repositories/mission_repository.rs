use crate::models::{Mission, MissionRecord};
use crate::utils::errors::{map_constraint_violation, AppError};
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct MissionRepository {
    pool: PgPool,
}

impl MissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Mission>, AppError> {
        let missions = sqlx::query_as::<_, Mission>(
            "SELECT * FROM missions ORDER BY departure_date DESC NULLS LAST, id DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(missions)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Mission>, AppError> {
        let mission = sqlx::query_as::<_, Mission>("SELECT * FROM missions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(mission)
    }

    pub async fn create(&self, record: MissionRecord) -> Result<Mission, AppError> {
        let mission = sqlx::query_as::<_, Mission>(
            r#"
            INSERT INTO missions (subject, destination, departure_date, return_date, vehicle_matricule, driver_id, requester_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#
        )
        .bind(record.subject)
        .bind(record.destination)
        .bind(record.departure_date)
        .bind(record.return_date)
        .bind(record.vehicle_matricule)
        .bind(record.driver_id)
        .bind(record.requester_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "Error creating mission"))?;

        Ok(mission)
    }

    pub async fn update(&self, id: i64, record: MissionRecord) -> Result<Option<Mission>, AppError> {
        let mission = sqlx::query_as::<_, Mission>(
            r#"
            UPDATE missions
            SET subject = $2, destination = $3, departure_date = $4, return_date = $5,
                vehicle_matricule = $6, driver_id = $7, requester_id = $8
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(record.subject)
        .bind(record.destination)
        .bind(record.departure_date)
        .bind(record.return_date)
        .bind(record.vehicle_matricule)
        .bind(record.driver_id)
        .bind(record.requester_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "Error updating mission"))?;

        Ok(mission)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM missions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Misiones que ya ocupan el vehículo o el conductor en el rango dado
    pub async fn find_overlapping(
        &self,
        vehicle_matricule: Option<i32>,
        driver_id: Option<i64>,
        departure: NaiveDate,
        return_date: NaiveDate,
        exclude_id: Option<i64>,
    ) -> Result<Vec<Mission>, AppError> {
        let missions = sqlx::query_as::<_, Mission>(
            r#"
            SELECT * FROM missions
            WHERE (vehicle_matricule = $1 OR driver_id = $2)
            AND departure_date <= $4 AND return_date >= $3
            AND ($5::BIGINT IS NULL OR id <> $5)
            ORDER BY id
            "#
        )
        .bind(vehicle_matricule)
        .bind(driver_id)
        .bind(departure)
        .bind(return_date)
        .bind(exclude_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(missions)
    }
}

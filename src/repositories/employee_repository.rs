use crate::models::employee::DRIVER_DEPARTMENT;
use crate::models::{DriverSummary, Employee, NewEmployee};
use crate::utils::errors::{map_constraint_violation, AppError};
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Employee>, AppError> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees ORDER BY last_name, first_name, id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(employee)
    }

    pub async fn find_by_badge(&self, badge_number: &str) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE badge_number = $1"
        )
        .bind(badge_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn create(&self, employee: NewEmployee) -> Result<Employee, AppError> {
        let created = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (badge_number, last_name, first_name, department)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#
        )
        .bind(employee.badge_number)
        .bind(employee.last_name)
        .bind(employee.first_name)
        .bind(employee.department)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "Error creating employee"))?;

        Ok(created)
    }

    pub async fn update(&self, id: i64, employee: NewEmployee) -> Result<Option<Employee>, AppError> {
        let updated = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET badge_number = $2, last_name = $3, first_name = $4, department = $5
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .bind(employee.badge_number)
        .bind(employee.last_name)
        .bind(employee.first_name)
        .bind(employee.department)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "Error updating employee"))?;

        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_constraint_violation(e, "Error deleting employee"))?;

        Ok(result.rows_affected() > 0)
    }

    /// ¿Aparece el empleado como solicitante o conductor en alguna misión?
    pub async fn is_referenced(&self, id: i64) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM missions WHERE requester_id = $1 OR driver_id = $1)"
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn list_drivers(&self) -> Result<Vec<Employee>, AppError> {
        let drivers = sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE LOWER(TRIM(department)) = $1
            ORDER BY last_name, first_name, id
            "#
        )
        .bind(DRIVER_DEPARTMENT)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    /// Búsqueda exacta por apellido y nombre, restringida a conductores
    pub async fn find_driver_by_name(
        &self,
        last_name: &str,
        first_name: &str,
    ) -> Result<Option<Employee>, AppError> {
        let driver = sqlx::query_as::<_, Employee>(
            r#"
            SELECT * FROM employees
            WHERE last_name = $1 AND first_name = $2 AND LOWER(TRIM(department)) = $3
            ORDER BY id
            LIMIT 1
            "#
        )
        .bind(last_name)
        .bind(first_name)
        .bind(DRIVER_DEPARTMENT)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    /// Conductores sin misión en curso ni futura a fecha `today`.
    ///
    /// NOT EXISTS en lugar de NOT IN: la columna driver_id admite NULL.
    pub async fn available_drivers(&self, today: NaiveDate) -> Result<Vec<DriverSummary>, AppError> {
        let drivers = sqlx::query_as::<_, DriverSummary>(
            r#"
            SELECT e.id, e.last_name, e.first_name
            FROM employees e
            WHERE LOWER(TRIM(e.department)) = $2
            AND NOT EXISTS (
                SELECT 1 FROM missions m
                WHERE m.driver_id = e.id
                AND (($1 BETWEEN m.departure_date AND m.return_date) OR m.departure_date > $1)
            )
            ORDER BY e.last_name, e.first_name, e.id
            "#
        )
        .bind(today)
        .bind(DRIVER_DEPARTMENT)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }
}

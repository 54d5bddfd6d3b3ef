use crate::models::{Attachment, NewAttachment};
use crate::utils::errors::{map_constraint_violation, AppError};
use sqlx::PgPool;

pub struct AttachmentRepository {
    pool: PgPool,
}

impl AttachmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, attachment: NewAttachment) -> Result<Attachment, AppError> {
        let created = sqlx::query_as::<_, Attachment>(
            r#"
            INSERT INTO attachments (employee_id, image_url, mission_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#
        )
        .bind(attachment.employee_id)
        .bind(attachment.image_url)
        .bind(attachment.mission_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, "Error creating attachment"))?;

        Ok(created)
    }

    /// Adjuntos de una misión ordenados por URL (los nombres generados llevan marca de tiempo)
    pub async fn find_by_mission(&self, mission_id: i64) -> Result<Vec<Attachment>, AppError> {
        let attachments = sqlx::query_as::<_, Attachment>(
            "SELECT * FROM attachments WHERE mission_id = $1 ORDER BY image_url, id"
        )
        .bind(mission_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attachments)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM attachments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

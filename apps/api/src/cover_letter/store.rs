//! Persistence seam for cover letters.
//!
//! `find` is unscoped so the service can tell "missing" from "foreign" the same
//! way for every operation; writes are additionally scoped by `user_id`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cover_letter::service::CoverLetterInput;
use crate::errors::AppError;
use crate::models::cover_letter::CoverLetter;

#[async_trait]
pub trait CoverLetterStore: Send + Sync {
    /// The user's letters, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<CoverLetter>, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<CoverLetter>, AppError>;

    async fn insert(&self, user_id: Uuid, fields: &CoverLetterInput) -> Result<CoverLetter, AppError>;

    /// `None` when no letter with `id` belongs to `user_id`.
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: &CoverLetterInput,
    ) -> Result<Option<CoverLetter>, AppError>;

    /// `false` when no letter with `id` belongs to `user_id`.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgCoverLetterStore {
    pool: PgPool,
}

impl PgCoverLetterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CoverLetterStore for PgCoverLetterStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<CoverLetter>, AppError> {
        Ok(sqlx::query_as::<_, CoverLetter>(
            "SELECT * FROM cover_letters WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find(&self, id: Uuid) -> Result<Option<CoverLetter>, AppError> {
        Ok(
            sqlx::query_as::<_, CoverLetter>("SELECT * FROM cover_letters WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert(&self, user_id: Uuid, fields: &CoverLetterInput) -> Result<CoverLetter, AppError> {
        Ok(sqlx::query_as::<_, CoverLetter>(
            r#"
            INSERT INTO cover_letters (id, user_id, content, job_description, company_name, job_title)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&fields.content)
        .bind(&fields.job_description)
        .bind(fields.company_name.trim())
        .bind(fields.job_title.trim())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        fields: &CoverLetterInput,
    ) -> Result<Option<CoverLetter>, AppError> {
        Ok(sqlx::query_as::<_, CoverLetter>(
            r#"
            UPDATE cover_letters
            SET content = $3, job_description = $4, company_name = $5, job_title = $6, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&fields.content)
        .bind(&fields.job_description)
        .bind(fields.company_name.trim())
        .bind(fields.job_title.trim())
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cover_letters WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}

use async_trait::async_trait;
use easel_core::{
    models::{GenerationRecord, NewGeneration},
    AppError,
};
use sqlx::{PgPool, Postgres};

/// Persistence seam used by the API for generation metadata.
#[async_trait]
pub trait GenerationRecorder: Send + Sync {
    /// Insert one row for a finished generation.
    async fn record(&self, generation: NewGeneration) -> Result<GenerationRecord, AppError>;

    /// A page of a user's generations, newest first.
    async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GenerationRecord>, AppError>;

    /// Connectivity probe used by the readiness endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Repository for the `generations` table
#[derive(Clone)]
pub struct GenerationRepository {
    pool: PgPool,
}

impl GenerationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a generation row
    #[tracing::instrument(skip(self, generation), fields(db.table = "generations", db.operation = "insert", user_id = %generation.user_id))]
    pub async fn create_generation(
        &self,
        generation: NewGeneration,
    ) -> Result<GenerationRecord, AppError> {
        let record = sqlx::query_as::<Postgres, GenerationRecord>(
            r#"
            INSERT INTO generations (user_id, original_prompt, enhanced_prompt, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, original_prompt, enhanced_prompt, image_url, created_at
            "#,
        )
        .bind(&generation.user_id)
        .bind(&generation.original_prompt)
        .bind(&generation.enhanced_prompt)
        .bind(&generation.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// List a user's generations, newest first
    #[tracing::instrument(skip(self), fields(db.table = "generations", db.operation = "select"))]
    pub async fn list_generations(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GenerationRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, GenerationRecord>(
            r#"
            SELECT id, user_id, original_prompt, enhanced_prompt, image_url, created_at
            FROM generations
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Connectivity probe for readiness checks
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl GenerationRecorder for GenerationRepository {
    async fn record(&self, generation: NewGeneration) -> Result<GenerationRecord, AppError> {
        self.create_generation(generation).await
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GenerationRecord>, AppError> {
        self.list_generations(user_id, limit, offset).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        GenerationRepository::ping(self).await
    }
}


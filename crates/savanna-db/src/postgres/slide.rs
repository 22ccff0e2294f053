use savanna_core::{
    models::{CreateSlideRequest, Slide, UpdateSlideRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const SLIDE_COLUMNS: &str = "id, title, image_url, position, active, created_at";

/// Repository for homepage slides
#[derive(Clone)]
pub struct SlideRepository {
    pool: PgPool,
}

impl SlideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "slides", db.operation = "select"))]
    pub async fn list(&self) -> Result<Vec<Slide>, AppError> {
        let slides = sqlx::query_as::<Postgres, Slide>(&format!(
            "SELECT {} FROM slides ORDER BY position ASC, created_at ASC, id ASC",
            SLIDE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(slides)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "slides", db.operation = "insert"))]
    pub async fn create(&self, request: CreateSlideRequest) -> Result<Slide, AppError> {
        let slide = sqlx::query_as::<Postgres, Slide>(&format!(
            "INSERT INTO slides (id, title, image_url, position, active) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            SLIDE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&request.title)
        .bind(&request.image_url)
        .bind(request.order.unwrap_or(0))
        .bind(request.active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        Ok(slide)
    }

    #[tracing::instrument(skip(self, patch), fields(db.table = "slides", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateSlideRequest,
    ) -> Result<Option<Slide>, AppError> {
        let slide = sqlx::query_as::<Postgres, Slide>(&format!(
            r#"
            UPDATE slides
            SET title = COALESCE($2, title),
                image_url = COALESCE($3, image_url),
                position = COALESCE($4, position),
                active = COALESCE($5, active)
            WHERE id = $1
            RETURNING {}
            "#,
            SLIDE_COLUMNS
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.image_url)
        .bind(patch.order)
        .bind(patch.active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slide)
    }

    #[tracing::instrument(skip(self), fields(db.table = "slides", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<Option<Slide>, AppError> {
        let slide = sqlx::query_as::<Postgres, Slide>(&format!(
            "DELETE FROM slides WHERE id = $1 RETURNING {}",
            SLIDE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slide)
    }
}

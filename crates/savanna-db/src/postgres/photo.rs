use savanna_core::{
    models::{CreatePhotoRequest, Photo, PhotoFilter, UpdatePhotoRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const PHOTO_COLUMNS: &str = "id, category_id, image_url, featured, created_at";

/// Repository for portfolio photos
#[derive(Clone)]
pub struct PhotoRepository {
    pool: PgPool,
}

impl PhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "photos", db.operation = "select"))]
    pub async fn list(&self, filter: PhotoFilter) -> Result<Vec<Photo>, AppError> {
        let photos = sqlx::query_as::<Postgres, Photo>(&format!(
            "SELECT {} FROM photos WHERE ($1::uuid IS NULL OR category_id = $1) ORDER BY created_at DESC, id ASC",
            PHOTO_COLUMNS
        ))
        .bind(filter.category)
        .fetch_all(&self.pool)
        .await?;

        Ok(photos)
    }

    #[tracing::instrument(skip(self), fields(db.table = "photos", db.operation = "select", db.record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Option<Photo>, AppError> {
        let photo = sqlx::query_as::<Postgres, Photo>(&format!(
            "SELECT {} FROM photos WHERE id = $1",
            PHOTO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(photo)
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "photos", db.operation = "insert"))]
    pub async fn create(&self, request: CreatePhotoRequest) -> Result<Photo, AppError> {
        let photo = sqlx::query_as::<Postgres, Photo>(&format!(
            "INSERT INTO photos (id, category_id, image_url, featured) VALUES ($1, $2, $3, $4) RETURNING {}",
            PHOTO_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(request.category_id)
        .bind(&request.image_url)
        .bind(request.featured)
        .fetch_one(&self.pool)
        .await?;

        Ok(photo)
    }

    #[tracing::instrument(skip(self, patch), fields(db.table = "photos", db.operation = "update", db.record_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdatePhotoRequest,
    ) -> Result<Option<Photo>, AppError> {
        let photo = sqlx::query_as::<Postgres, Photo>(&format!(
            r#"
            UPDATE photos
            SET category_id = COALESCE($2, category_id),
                featured = COALESCE($3, featured)
            WHERE id = $1
            RETURNING {}
            "#,
            PHOTO_COLUMNS
        ))
        .bind(id)
        .bind(patch.category_id)
        .bind(patch.featured)
        .fetch_optional(&self.pool)
        .await?;

        Ok(photo)
    }

    #[tracing::instrument(skip(self), fields(db.table = "photos", db.operation = "delete", db.record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<Option<Photo>, AppError> {
        let photo = sqlx::query_as::<Postgres, Photo>(&format!(
            "DELETE FROM photos WHERE id = $1 RETURNING {}",
            PHOTO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(photo)
    }
}

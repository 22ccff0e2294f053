//! Postgres-backed registry.
//!
//! One repository per table; [`PgRegistry`] bundles them behind [`RegistryStore`].

mod category;
mod photo;
mod setting;
mod slide;

pub use category::CategoryRepository;
pub use photo::PhotoRepository;
pub use setting::SettingRepository;
pub use slide::SlideRepository;

use async_trait::async_trait;
use savanna_core::models::{
    Category, CreateCategoryRequest, CreatePhotoRequest, CreateSlideRequest, Photo, PhotoFilter,
    Setting, SettingUpdate, Slide, UpdatePhotoRequest, UpdateSlideRequest,
};
use savanna_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::store::RegistryStore;

#[derive(Clone)]
pub struct PgRegistry {
    pool: PgPool,
    photos: PhotoRepository,
    slides: SlideRepository,
    categories: CategoryRepository,
    settings: SettingRepository,
}

impl PgRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self {
            photos: PhotoRepository::new(pool.clone()),
            slides: SlideRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            settings: SettingRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl RegistryStore for PgRegistry {
    async fn list_photos(&self, filter: PhotoFilter) -> Result<Vec<Photo>, AppError> {
        self.photos.list(filter).await
    }

    async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>, AppError> {
        self.photos.get(id).await
    }

    async fn create_photo(&self, request: CreatePhotoRequest) -> Result<Photo, AppError> {
        self.photos.create(request).await
    }

    async fn update_photo(
        &self,
        id: Uuid,
        patch: UpdatePhotoRequest,
    ) -> Result<Option<Photo>, AppError> {
        self.photos.update(id, patch).await
    }

    async fn delete_photo(&self, id: Uuid) -> Result<Option<Photo>, AppError> {
        self.photos.delete(id).await
    }

    async fn list_slides(&self) -> Result<Vec<Slide>, AppError> {
        self.slides.list().await
    }

    async fn create_slide(&self, request: CreateSlideRequest) -> Result<Slide, AppError> {
        self.slides.create(request).await
    }

    async fn update_slide(
        &self,
        id: Uuid,
        patch: UpdateSlideRequest,
    ) -> Result<Option<Slide>, AppError> {
        self.slides.update(id, patch).await
    }

    async fn delete_slide(&self, id: Uuid) -> Result<Option<Slide>, AppError> {
        self.slides.delete(id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.categories.list().await
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        self.categories.get(id).await
    }

    async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category, AppError> {
        self.categories.create(request).await
    }

    async fn delete_category(&self, id: Uuid) -> Result<Option<u64>, AppError> {
        self.categories.delete(id).await
    }

    async fn list_settings(&self) -> Result<Vec<Setting>, AppError> {
        self.settings.list().await
    }

    async fn get_setting(&self, key: &str) -> Result<Option<Setting>, AppError> {
        self.settings.get(key).await
    }

    async fn upsert_settings(&self, updates: Vec<SettingUpdate>) -> Result<Vec<Setting>, AppError> {
        self.settings.upsert_many(updates).await?;
        self.settings.list().await
    }

    async fn insert_missing_settings(&self, defaults: Vec<Setting>) -> Result<u64, AppError> {
        self.settings.insert_missing(defaults).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

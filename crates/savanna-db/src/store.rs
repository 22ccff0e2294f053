use async_trait::async_trait;
use savanna_core::models::{
    Category, CreateCategoryRequest, CreatePhotoRequest, CreateSlideRequest, Photo, PhotoFilter,
    Setting, SettingUpdate, Slide, UpdatePhotoRequest, UpdateSlideRequest,
};
use savanna_core::AppError;
use uuid::Uuid;

/// Storage contract of the content registry.
///
/// Invariants every implementation keeps:
/// - setting keys are unique; [`upsert_settings`](Self::upsert_settings) matches on key
/// - list results are sorted explicitly, never in insertion order
/// - deleting a category leaves photos that reference it untouched
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Newest first, optionally restricted to one category.
    async fn list_photos(&self, filter: PhotoFilter) -> Result<Vec<Photo>, AppError>;
    async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>, AppError>;
    async fn create_photo(&self, request: CreatePhotoRequest) -> Result<Photo, AppError>;
    async fn update_photo(
        &self,
        id: Uuid,
        patch: UpdatePhotoRequest,
    ) -> Result<Option<Photo>, AppError>;
    /// Returns the removed record so the caller can release the vendor asset.
    async fn delete_photo(&self, id: Uuid) -> Result<Option<Photo>, AppError>;

    /// Sorted by `order` ascending, then creation time.
    async fn list_slides(&self) -> Result<Vec<Slide>, AppError>;
    async fn create_slide(&self, request: CreateSlideRequest) -> Result<Slide, AppError>;
    async fn update_slide(
        &self,
        id: Uuid,
        patch: UpdateSlideRequest,
    ) -> Result<Option<Slide>, AppError>;
    async fn delete_slide(&self, id: Uuid) -> Result<Option<Slide>, AppError>;

    /// Sorted by name.
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;
    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, AppError>;
    /// Fails with [`AppError::Conflict`] when the name is taken.
    async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category, AppError>;
    /// Returns the number of photos left pointing at the deleted category,
    /// or `None` when no such category exists.
    async fn delete_category(&self, id: Uuid) -> Result<Option<u64>, AppError>;

    /// Sorted by key.
    async fn list_settings(&self) -> Result<Vec<Setting>, AppError>;
    async fn get_setting(&self, key: &str) -> Result<Option<Setting>, AppError>;
    /// Applies every update by key, then returns the full settings list.
    async fn upsert_settings(&self, updates: Vec<SettingUpdate>) -> Result<Vec<Setting>, AppError>;
    /// Inserts the given settings only where the key is absent. Returns how many were added.
    async fn insert_missing_settings(&self, defaults: Vec<Setting>) -> Result<u64, AppError>;

    /// Cheap liveness probe of the backing store.
    async fn ping(&self) -> Result<(), AppError>;
}

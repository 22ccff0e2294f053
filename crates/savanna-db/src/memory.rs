//! In-process registry used by tests and by local runs without Postgres.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use savanna_core::models::{
    Category, CreateCategoryRequest, CreatePhotoRequest, CreateSlideRequest, Photo, PhotoFilter,
    Setting, SettingType, SettingUpdate, Slide, UpdatePhotoRequest, UpdateSlideRequest,
};
use savanna_core::AppError;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::RegistryStore;

#[derive(Default)]
struct Tables {
    photos: HashMap<Uuid, Photo>,
    slides: HashMap<Uuid, Slide>,
    categories: HashMap<Uuid, Category>,
    settings: HashMap<String, Setting>,
}

/// Registry kept in memory behind a single lock. Cloning shares the tables.
#[derive(Clone, Default)]
pub struct MemoryRegistry {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistryStore for MemoryRegistry {
    async fn list_photos(&self, filter: PhotoFilter) -> Result<Vec<Photo>, AppError> {
        let tables = self.tables.read().await;
        let mut photos: Vec<Photo> = tables
            .photos
            .values()
            .filter(|p| filter.category.map_or(true, |c| p.category_id == c))
            .cloned()
            .collect();
        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(photos)
    }

    async fn get_photo(&self, id: Uuid) -> Result<Option<Photo>, AppError> {
        Ok(self.tables.read().await.photos.get(&id).cloned())
    }

    async fn create_photo(&self, request: CreatePhotoRequest) -> Result<Photo, AppError> {
        let photo = Photo {
            id: Uuid::new_v4(),
            category_id: request.category_id,
            image_url: request.image_url,
            featured: request.featured,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .photos
            .insert(photo.id, photo.clone());
        Ok(photo)
    }

    async fn update_photo(
        &self,
        id: Uuid,
        patch: UpdatePhotoRequest,
    ) -> Result<Option<Photo>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(photo) = tables.photos.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(category_id) = patch.category_id {
            photo.category_id = category_id;
        }
        if let Some(featured) = patch.featured {
            photo.featured = featured;
        }
        Ok(Some(photo.clone()))
    }

    async fn delete_photo(&self, id: Uuid) -> Result<Option<Photo>, AppError> {
        Ok(self.tables.write().await.photos.remove(&id))
    }

    async fn list_slides(&self) -> Result<Vec<Slide>, AppError> {
        let tables = self.tables.read().await;
        let mut slides: Vec<Slide> = tables.slides.values().cloned().collect();
        slides.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(slides)
    }

    async fn create_slide(&self, request: CreateSlideRequest) -> Result<Slide, AppError> {
        let slide = Slide {
            id: Uuid::new_v4(),
            title: request.title,
            image_url: request.image_url,
            order: request.order.unwrap_or(0),
            active: request.active.unwrap_or(true),
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .slides
            .insert(slide.id, slide.clone());
        Ok(slide)
    }

    async fn update_slide(
        &self,
        id: Uuid,
        patch: UpdateSlideRequest,
    ) -> Result<Option<Slide>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(slide) = tables.slides.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            slide.title = title;
        }
        if let Some(image_url) = patch.image_url {
            slide.image_url = image_url;
        }
        if let Some(order) = patch.order {
            slide.order = order;
        }
        if let Some(active) = patch.active {
            slide.active = active;
        }
        Ok(Some(slide.clone()))
    }

    async fn delete_slide(&self, id: Uuid) -> Result<Option<Slide>, AppError> {
        Ok(self.tables.write().await.slides.remove(&id))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category, AppError> {
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.name == request.name) {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                request.name
            )));
        }
        let category = Category {
            id: Uuid::new_v4(),
            name: request.name,
            created_at: Utc::now(),
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> Result<Option<u64>, AppError> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Ok(None);
        }
        let orphaned = tables
            .photos
            .values()
            .filter(|p| p.category_id == id)
            .count() as u64;
        Ok(Some(orphaned))
    }

    async fn list_settings(&self) -> Result<Vec<Setting>, AppError> {
        let tables = self.tables.read().await;
        let mut settings: Vec<Setting> = tables.settings.values().cloned().collect();
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(settings)
    }

    async fn get_setting(&self, key: &str) -> Result<Option<Setting>, AppError> {
        Ok(self.tables.read().await.settings.get(key).cloned())
    }

    async fn upsert_settings(&self, updates: Vec<SettingUpdate>) -> Result<Vec<Setting>, AppError> {
        {
            let mut tables = self.tables.write().await;
            let now = Utc::now();
            for update in updates {
                match tables.settings.entry(update.key.clone()) {
                    Entry::Occupied(mut entry) => {
                        let existing = entry.get_mut();
                        existing.value = update.value;
                        if let Some(label) = update.label {
                            existing.label = label;
                        }
                        if let Some(setting_type) = update.setting_type {
                            existing.setting_type = setting_type;
                        }
                        existing.updated_at = now;
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(Setting {
                            id: Uuid::new_v4(),
                            label: update.label.unwrap_or_else(|| update.key.clone()),
                            key: update.key,
                            value: update.value,
                            setting_type: update.setting_type.unwrap_or(SettingType::Text),
                            updated_at: now,
                        });
                    }
                }
            }
        }
        self.list_settings().await
    }

    async fn insert_missing_settings(&self, defaults: Vec<Setting>) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let mut inserted = 0;
        for setting in defaults {
            if !tables.settings.contains_key(&setting.key) {
                tables.settings.insert(setting.key.clone(), setting);
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

//! Default settings seeding.

use chrono::Utc;
use savanna_core::models::{Setting, SettingType, DEFAULT_SETTINGS};
use savanna_core::AppError;
use uuid::Uuid;

use crate::store::RegistryStore;

/// The homepage image slots every fresh installation starts with.
pub fn default_settings() -> Vec<Setting> {
    let now = Utc::now();
    DEFAULT_SETTINGS
        .iter()
        .map(|(key, value, label)| Setting {
            id: Uuid::new_v4(),
            key: key.to_string(),
            value: value.to_string(),
            label: label.to_string(),
            setting_type: SettingType::Image,
            updated_at: now,
        })
        .collect()
}

/// Seeds missing default settings without overwriting values an admin already changed.
pub async fn seed_default_settings(store: &dyn RegistryStore) -> Result<u64, AppError> {
    let inserted = store.insert_missing_settings(default_settings()).await?;
    if inserted > 0 {
        tracing::info!(inserted, "Seeded default settings");
    } else {
        tracing::debug!("Default settings already present");
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryRegistry;
    use savanna_core::models::SettingUpdate;

    #[tokio::test]
    async fn test_seed_is_idempotent_and_keeps_edits() {
        let store = MemoryRegistry::new();
        assert_eq!(seed_default_settings(&store).await.unwrap(), 5);

        store
            .upsert_settings(vec![SettingUpdate::new(
                "home_intro_image",
                "https://res.cloudinary.com/demo/image/upload/v2/savanna/uploads/new.jpg",
            )])
            .await
            .unwrap();

        assert_eq!(seed_default_settings(&store).await.unwrap(), 0);
        let intro = store.get_setting("home_intro_image").await.unwrap().unwrap();
        assert!(intro.value.ends_with("new.jpg"));
        assert_eq!(store.list_settings().await.unwrap().len(), 5);
    }
}

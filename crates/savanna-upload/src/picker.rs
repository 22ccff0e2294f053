//! Asset picker state.
//!
//! Lets the admin reuse an already uploaded photo for a homepage setting or a
//! new slide. Picking only edits a local draft; nothing is persisted until the
//! draft is saved explicitly.

use std::collections::BTreeMap;

use savanna_core::models::{CreateSlideRequest, Photo, Setting, SettingUpdate};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Id(Uuid),
}

impl CategoryFilter {
    pub fn matches(&self, photo: &Photo) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Id(id) => photo.category_id == *id,
        }
    }
}

/// The field currently waiting for a picked image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerTarget {
    Setting(String),
    NewSlide,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PickError {
    #[error("No field is waiting for an image")]
    NoTarget,
    #[error("Photo {0} is not in the current selection")]
    UnknownPhoto(Uuid),
    #[error("Unknown setting '{0}'")]
    UnknownSetting(String),
    #[error("Slide title is required")]
    MissingTitle,
    #[error("Slide image is required")]
    MissingImage,
}

/// Local copy of the settings with the values the admin has changed.
#[derive(Debug, Clone, Default)]
pub struct SettingsDraft {
    saved: BTreeMap<String, String>,
    edited: BTreeMap<String, String>,
}

impl SettingsDraft {
    pub fn from_settings(settings: &[Setting]) -> Self {
        let saved: BTreeMap<String, String> = settings
            .iter()
            .map(|s| (s.key.clone(), s.value.clone()))
            .collect();
        Self {
            edited: saved.clone(),
            saved,
        }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.edited.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.edited.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.edited.insert(key.into(), value.into());
    }

    /// Updates for every key whose value differs from what was loaded.
    pub fn changes(&self) -> Vec<SettingUpdate> {
        self.edited
            .iter()
            .filter(|(k, v)| self.saved.get(*k) != Some(*v))
            .map(|(k, v)| SettingUpdate::new(k.clone(), v.clone()))
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        !self.changes().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideDraft {
    pub title: String,
    pub image_url: String,
    pub order: Option<i32>,
}

impl SlideDraft {
    pub fn to_request(&self) -> Result<CreateSlideRequest, PickError> {
        if self.title.trim().is_empty() {
            return Err(PickError::MissingTitle);
        }
        if self.image_url.is_empty() {
            return Err(PickError::MissingImage);
        }
        Ok(CreateSlideRequest {
            title: self.title.trim().to_string(),
            image_url: self.image_url.clone(),
            order: self.order,
            active: None,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct HomepageDraft {
    pub settings: SettingsDraft,
    pub new_slide: SlideDraft,
}

#[derive(Debug, Clone, Default)]
pub struct AssetPicker {
    photos: Vec<Photo>,
    filter: CategoryFilter,
    target: Option<PickerTarget>,
}

impl AssetPicker {
    pub fn new(photos: Vec<Photo>) -> Self {
        Self {
            photos,
            ..Default::default()
        }
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    /// Photos shown under the current filter, in registry order.
    pub fn visible(&self) -> Vec<&Photo> {
        self.photos
            .iter()
            .filter(|p| self.filter.matches(p))
            .collect()
    }

    /// Puts `target` in picker mode. Any other open target is closed.
    pub fn open(&mut self, target: PickerTarget) {
        self.target = Some(target);
    }

    pub fn close(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<&PickerTarget> {
        self.target.as_ref()
    }

    /// Whether `photo` is the image currently bound to the open target.
    pub fn is_selected(&self, photo: &Photo, draft: &HomepageDraft) -> bool {
        match &self.target {
            Some(PickerTarget::Setting(key)) => {
                draft.settings.value(key) == Some(photo.image_url.as_str())
            }
            Some(PickerTarget::NewSlide) => draft.new_slide.image_url == photo.image_url,
            None => false,
        }
    }

    /// Binds the clicked photo's URL into the open target and closes it.
    pub fn pick(&mut self, photo_id: Uuid, draft: &mut HomepageDraft) -> Result<String, PickError> {
        let target = self.target.as_ref().ok_or(PickError::NoTarget)?;
        let url = self
            .visible()
            .into_iter()
            .find(|p| p.id == photo_id)
            .map(|p| p.image_url.clone())
            .ok_or(PickError::UnknownPhoto(photo_id))?;

        match target {
            PickerTarget::Setting(key) => {
                if !draft.settings.contains(key) {
                    return Err(PickError::UnknownSetting(key.clone()));
                }
                draft.settings.set(key.clone(), url.clone());
            }
            PickerTarget::NewSlide => draft.new_slide.image_url = url.clone(),
        }

        self.target = None;
        Ok(url)
    }
}

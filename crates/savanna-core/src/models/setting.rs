use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    #[default]
    Text,
    Image,
    Number,
}

impl SettingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::Text => "text",
            SettingType::Image => "image",
            SettingType::Number => "number",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SettingType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "text" => Ok(SettingType::Text),
            "image" => Ok(SettingType::Image),
            "number" => Ok(SettingType::Number),
            other => Err(format!("unknown setting type '{}'", other)),
        }
    }
}

/// Site setting addressed by its unique `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    pub label: String,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub setting_type: SettingType,
    pub updated_at: DateTime<Utc>,
}

/// One entry of a bulk upsert. When `label` or `type` is absent an existing setting
/// keeps its own; a new one falls back to the key and `text`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct SettingUpdate {
    #[validate(
        length(min = 1, max = 100, message = "key must be between 1 and 100 characters"),
        custom(function = "super::not_blank", message = "key must not be blank")
    )]
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub setting_type: Option<SettingType>,
}

impl SettingUpdate {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            label: None,
            setting_type: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(nested)]
    pub settings: Vec<SettingUpdate>,
}

/// Homepage image slots seeded on startup when missing: (key, value, label).
pub const DEFAULT_SETTINGS: &[(&str, &str, &str)] = &[
    (
        "home_intro_image",
        "https://res.cloudinary.com/demo/image/upload/v1570979139/savanna/portfolio/wedding-couple.jpg",
        "Home Intro Section Image",
    ),
    (
        "home_mission_bg",
        "https://res.cloudinary.com/demo/image/upload/v1570979139/savanna/portfolio/wedding-couple.jpg",
        "Home Mission Background",
    ),
    (
        "home_testimonial_avatar",
        "https://res.cloudinary.com/demo/image/upload/v1570979139/savanna/portfolio/about-photographer.jpg",
        "Home Testimonial Avatar",
    ),
    (
        "home_about_image",
        "https://res.cloudinary.com/demo/image/upload/v1570979139/savanna/portfolio/about-photographer.jpg",
        "Home About Section Image",
    ),
    (
        "services_hero_bg",
        "https://res.cloudinary.com/demo/image/upload/v1570979139/savanna/portfolio/hero-wedding.jpg",
        "Services Hero Background",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_type_serializes_lowercase() {
        let json = serde_json::to_string(&SettingType::Image).unwrap();
        assert_eq!(json, "\"image\"");
        assert_eq!(SettingType::try_from("number".to_string()), Ok(SettingType::Number));
        assert!(SettingType::try_from("color".to_string()).is_err());
    }

    #[test]
    fn test_setting_update_accepts_type_field() {
        let update: SettingUpdate =
            serde_json::from_str(r#"{"key":"k","value":"v","type":"image"}"#).unwrap();
        assert_eq!(update.setting_type, Some(SettingType::Image));
        assert!(update.label.is_none());
    }
}

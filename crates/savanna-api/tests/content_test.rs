//! Slides, categories and settings endpoints.

mod helpers;

use helpers::auth::{admin_token, bearer};
use helpers::{api_path, setup_test_app};
use savanna_core::models::{CreatePhotoRequest, PhotoFilter};
use savanna_db::RegistryStore;
use serde_json::{json, Value};

#[tokio::test]
async fn test_slides_listed_by_order() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = admin_token(client).await;

    for (title, order) in [("Third", 3), ("First", 1), ("Second", 2)] {
        let response = client
            .post(&api_path("/slides"))
            .add_header("Authorization", bearer(&token))
            .json(&json!({
                "title": title,
                "imageUrl": "https://res.cloudinary.com/demo/image/upload/v1/savanna/uploads/s.jpg",
                "order": order
            }))
            .await;
        assert_eq!(response.status_code(), 201);
    }

    let slides: Value = client.get(&api_path("/slides")).await.json();
    let titles: Vec<&str> = slides
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|s| s["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn test_slide_defaults_and_update() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = admin_token(client).await;

    let created: Value = client
        .post(&api_path("/slides"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "  Golden hour  ", "imageUrl": "https://h.example/s.jpg" }))
        .await
        .json();
    assert_eq!(created["title"], "Golden hour");
    assert_eq!(created["order"], 0);
    assert_eq!(created["active"], true);

    let id = created["id"].as_str().expect("id");
    let response = client
        .put(&api_path(&format!("/slides/{}", id)))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "order": 5, "active": false }))
        .await;
    assert_eq!(response.status_code(), 200);
    let updated: Value = response.json();
    assert_eq!(updated["order"], 5);
    assert_eq!(updated["active"], false);
    assert_eq!(updated["title"], "Golden hour");
}

#[tokio::test]
async fn test_slide_requires_title_and_absolute_url() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = admin_token(client).await;

    let blank_title = client
        .post(&api_path("/slides"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "   ", "imageUrl": "https://h.example/s.jpg" }))
        .await;
    assert_eq!(blank_title.status_code(), 400);

    let relative = client
        .post(&api_path("/slides"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "Dusk", "imageUrl": "s.jpg" }))
        .await;
    assert_eq!(relative.status_code(), 400);
}

#[tokio::test]
async fn test_delete_missing_slide_is_404() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = admin_token(client).await;

    let response = client
        .delete(&api_path(&format!("/slides/{}", uuid::Uuid::new_v4())))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_duplicate_category_is_409() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = admin_token(client).await;

    for expected in [201, 409] {
        let response = client
            .post(&api_path("/categories"))
            .add_header("Authorization", bearer(&token))
            .json(&json!({ "name": "Portraits" }))
            .await;
        assert_eq!(response.status_code(), expected);
    }

    let blank = client
        .post(&api_path("/categories"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "name": "  " }))
        .await;
    assert_eq!(blank.status_code(), 400);
}

#[tokio::test]
async fn test_categories_sorted_by_name() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = admin_token(client).await;
    for name in ["Weddings", "Events", "Portraits"] {
        let response = client
            .post(&api_path("/categories"))
            .add_header("Authorization", bearer(&token))
            .json(&json!({ "name": name }))
            .await;
        assert_eq!(response.status_code(), 201);
    }

    let categories: Value = client.get(&api_path("/categories")).await.json();
    let names: Vec<&str> = categories
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Events", "Portraits", "Weddings"]);
}

#[tokio::test]
async fn test_delete_category_keeps_photos() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = admin_token(client).await;

    let category: Value = client
        .post(&api_path("/categories"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "name": "Weddings" }))
        .await
        .json();
    let category_id: uuid::Uuid = category["id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("category id");

    for url in ["https://h.example/a.jpg", "https://h.example/b.jpg"] {
        app.store
            .create_photo(CreatePhotoRequest {
                image_url: url.to_string(),
                category_id,
                featured: false,
            })
            .await
            .expect("create photo");
    }

    let response = client
        .delete(&api_path(&format!("/categories/{}", category_id)))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["message"], "Category removed");
    assert_eq!(body["orphanedPhotos"], 2);

    let remaining = app
        .store
        .list_photos(PhotoFilter::default())
        .await
        .expect("list photos");
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|p| p.category_id == category_id));
}

#[tokio::test]
async fn test_default_settings_are_seeded() {
    let app = setup_test_app().await;
    let settings: Value = app.client().get(&api_path("/settings")).await.json();
    let keys: Vec<&str> = settings
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|s| s["key"].as_str())
        .collect();
    assert_eq!(
        keys,
        vec![
            "home_about_image",
            "home_intro_image",
            "home_mission_bg",
            "home_testimonial_avatar",
            "services_hero_bg",
        ]
    );
    assert!(settings
        .as_array()
        .expect("array")
        .iter()
        .all(|s| s["type"] == "image"));
}

#[tokio::test]
async fn test_bulk_upsert_updates_and_inserts() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = admin_token(client).await;
    let new_url = "https://res.cloudinary.com/demo/image/upload/v2/savanna/uploads/new.jpg";

    let response = client
        .put(&api_path("/settings"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({
            "settings": [
                { "key": "home_intro_image", "value": new_url },
                { "key": "contact_phone", "value": "+254 700 000000", "label": "Phone" }
            ]
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    let all: Value = response.json();
    assert_eq!(all.as_array().expect("array").len(), 6);

    let intro: Value = client
        .get(&api_path("/settings/home_intro_image"))
        .await
        .json();
    assert_eq!(intro["value"], new_url);
    assert_eq!(intro["type"], "image");
    assert_eq!(intro["label"], "Home Intro Section Image");

    let phone: Value = client.get(&api_path("/settings/contact_phone")).await.json();
    assert_eq!(phone["label"], "Phone");
    assert_eq!(phone["type"], "text");
}

#[tokio::test]
async fn test_settings_validation() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = admin_token(client).await;

    let empty_key = client
        .put(&api_path("/settings"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "settings": [{ "key": "  ", "value": "x" }] }))
        .await;
    assert_eq!(empty_key.status_code(), 400);

    let not_a_number = client
        .put(&api_path("/settings"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "settings": [{ "key": "gallery_columns", "value": "three", "type": "number" }] }))
        .await;
    assert_eq!(not_a_number.status_code(), 400);
}

#[tokio::test]
async fn test_untyped_update_checked_against_stored_number_type() {
    let app = setup_test_app().await;
    let client = app.client();
    let token = admin_token(client).await;

    let created = client
        .put(&api_path("/settings"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "settings": [{ "key": "gallery_columns", "value": "3", "type": "number" }] }))
        .await;
    assert_eq!(created.status_code(), 200);

    let rejected = client
        .put(&api_path("/settings"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "settings": [{ "key": "gallery_columns", "value": "three" }] }))
        .await;
    assert_eq!(rejected.status_code(), 400);

    let accepted = client
        .put(&api_path("/settings"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "settings": [{ "key": "gallery_columns", "value": "4" }] }))
        .await;
    assert_eq!(accepted.status_code(), 200);

    let stored: Value = client.get(&api_path("/settings/gallery_columns")).await.json();
    assert_eq!(stored["value"], "4");
    assert_eq!(stored["type"], "number");
}

#[tokio::test]
async fn test_unknown_setting_is_404() {
    let app = setup_test_app().await;
    let response = app.client().get(&api_path("/settings/nope")).await;
    assert_eq!(response.status_code(), 404);
}

//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use crate::setup::routes::health;
use savanna_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Registers the `bearer` scheme referenced by admin routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Savanna API",
        version = "0.1.0",
        description = "Content registry for the Savanna photography site: photos, categories, homepage slides and settings, plus signed direct-to-vendor image uploads. Reads are public; writes need an admin bearer token from /api/auth/login."
    ),
    paths(
        // Auth
        handlers::auth::login,
        // Uploads
        handlers::upload::sign_upload,
        // Photos
        handlers::photos::list_photos,
        handlers::photos::create_photo,
        handlers::photos::update_photo,
        handlers::photos::delete_photo,
        // Slides
        handlers::slides::list_slides,
        handlers::slides::create_slide,
        handlers::slides::update_slide,
        handlers::slides::delete_slide,
        // Categories
        handlers::categories::list_categories,
        handlers::categories::create_category,
        handlers::categories::delete_category,
        // Settings
        handlers::settings::list_settings,
        handlers::settings::get_setting,
        handlers::settings::update_settings,
        // System
        health::health_check,
        health::ping,
    ),
    components(
        schemas(
            models::LoginRequest,
            models::LoginResponse,
            models::UploadSignature,
            models::Photo,
            models::CreatePhotoRequest,
            models::UpdatePhotoRequest,
            models::Slide,
            models::CreateSlideRequest,
            models::UpdateSlideRequest,
            models::Category,
            models::CreateCategoryRequest,
            models::CategoryDeletedResponse,
            models::Setting,
            models::SettingType,
            models::SettingUpdate,
            models::UpdateSettingsRequest,
            models::MessageResponse,
            health::HealthCheckResponse,
            health::PingResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Admin login"),
        (name = "upload", description = "Signed parameters for direct-to-vendor uploads"),
        (name = "photos", description = "Portfolio photos"),
        (name = "slides", description = "Homepage carousel slides"),
        (name = "categories", description = "Photo categories"),
        (name = "settings", description = "Site settings editable from the admin"),
        (name = "system", description = "Health and liveness")
    )
)]
pub struct ApiDoc;

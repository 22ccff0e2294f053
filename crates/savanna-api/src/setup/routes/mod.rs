//! Route configuration and setup.
//!
//! Reads are public; every mutation and the upload signature sit behind
//! [`auth_middleware`](crate::auth::auth_middleware).

pub(crate) mod health;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Json, Router,
};
use savanna_core::constants::API_PREFIX;
use savanna_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::handlers;
use crate::state::AppState;

/// JSON bodies only; files go straight to the media host.
const MAX_BODY_BYTES: usize = 1024 * 1024;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let public_routes = public_routes(state.clone());
    let protected_routes = protected_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(state.clone(), auth_middleware),
    );

    let app = public_routes
        .merge(protected_routes)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/health", API_PREFIX), get(health::health_check))
        .route(&format!("{}/ping", API_PREFIX), get(health::ping))
        .route(
            &format!("{}/openapi.json", API_PREFIX),
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .route(
            &format!("{}/auth/login", API_PREFIX),
            post(handlers::auth::login),
        )
        .route(
            &format!("{}/photos", API_PREFIX),
            get(handlers::photos::list_photos),
        )
        .route(
            &format!("{}/slides", API_PREFIX),
            get(handlers::slides::list_slides),
        )
        .route(
            &format!("{}/categories", API_PREFIX),
            get(handlers::categories::list_categories),
        )
        .route(
            &format!("{}/settings", API_PREFIX),
            get(handlers::settings::list_settings),
        )
        .route(
            &format!("{}/settings/{{key}}", API_PREFIX),
            get(handlers::settings::get_setting),
        )
        .with_state(state)
}

fn protected_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/upload/sign", API_PREFIX),
            get(handlers::upload::sign_upload),
        )
        .route(
            &format!("{}/photos", API_PREFIX),
            post(handlers::photos::create_photo),
        )
        .route(
            &format!("{}/photos/{{id}}", API_PREFIX),
            put(handlers::photos::update_photo).delete(handlers::photos::delete_photo),
        )
        .route(
            &format!("{}/slides", API_PREFIX),
            post(handlers::slides::create_slide),
        )
        .route(
            &format!("{}/slides/{{id}}", API_PREFIX),
            put(handlers::slides::update_slide).delete(handlers::slides::delete_slide),
        )
        .route(
            &format!("{}/categories", API_PREFIX),
            post(handlers::categories::create_category),
        )
        .route(
            &format!("{}/categories/{{id}}", API_PREFIX),
            axum::routing::delete(handlers::categories::delete_category),
        )
        .route(
            &format!("{}/settings", API_PREFIX),
            put(handlers::settings::update_settings),
        )
        .with_state(state)
}

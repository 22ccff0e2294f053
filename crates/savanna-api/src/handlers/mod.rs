pub mod auth;
pub mod categories;
pub mod photos;
pub mod settings;
pub mod slides;
pub mod upload;

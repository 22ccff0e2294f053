//! Content registry storage.
//!
//! [`RegistryStore`] is the interface the API handlers program against.
//! [`PgRegistry`] backs it with Postgres through per-table repositories;
//! [`MemoryRegistry`] keeps everything in process for tests and local runs.

pub mod memory;
pub mod postgres;
pub mod seed;
pub mod store;

pub use memory::MemoryRegistry;
pub use postgres::{
    CategoryRepository, PgRegistry, PhotoRepository, SettingRepository, SlideRepository,
};
pub use seed::seed_default_settings;
pub use store::RegistryStore;

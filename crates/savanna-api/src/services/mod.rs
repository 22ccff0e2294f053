pub mod media_host;

pub use media_host::MediaHost;

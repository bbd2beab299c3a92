//! File system backed services for the Veil client.

pub mod config_service;
pub mod file_source;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::file_source::load_blob;
pub use crate::paths::VeilPaths;
pub use crate::storage::FileTokenStore;

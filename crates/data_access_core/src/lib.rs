//! Data access core for the album catalog.
//! Owns the album model, the repository over a caller-owned SQLite
//! connection, and the bootstrap glue around it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{ConfigError, DbConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogDestination};
pub use model::album::{Album, AlbumId, NewAlbum};
pub use repo::album_repo::{
    AlbumRepository, RepoError, RepoOperation, RepoResult, SqliteAlbumRepository,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

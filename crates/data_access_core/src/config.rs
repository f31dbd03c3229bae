//! Connection settings assembled from the process environment.
//!
//! # Responsibility
//! - Read `DBUSER`, `DBPASS`, `DBHOST` and `DBNAME`.
//! - Resolve the database file location for the embedded engine.
//!
//! # Invariants
//! - `DBNAME` is required; blank values count as missing.
//! - The password never appears in `descriptor()` output.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_USER: &str = "DBUSER";
pub const ENV_PASSWORD: &str = "DBPASS";
pub const ENV_HOST: &str = "DBHOST";
pub const ENV_NAME: &str = "DBNAME";

const DEFAULT_HOST: &str = ".";
const DATABASE_FILE_EXTENSION: &str = "sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(var) => write!(f, "environment variable `{var}` is not set"),
        }
    }
}

impl Error for ConfigError {}

/// Database connection settings.
///
/// The embedded engine reads `host` as the directory holding the database
/// and `name` as the file stem. `user` and `password` are carried along for
/// the descriptor but not used for authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub name: String,
}

impl DbConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Ok(Self {
            user: read(ENV_USER).unwrap_or_default(),
            password: read(ENV_PASSWORD).unwrap_or_default(),
            host: read(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            name: read(ENV_NAME).ok_or(ConfigError::Missing(ENV_NAME))?,
        })
    }

    /// Resolves `<host>/<name>.sqlite3`.
    ///
    /// A `name` that already has an extension is used unchanged.
    pub fn database_path(&self) -> PathBuf {
        let file = Path::new(&self.name);
        let file = if file.extension().is_some() {
            file.to_path_buf()
        } else {
            file.with_extension(DATABASE_FILE_EXTENSION)
        };
        Path::new(&self.host).join(file)
    }

    /// Connection descriptor safe for logs: `user:***@host/name`.
    pub fn descriptor(&self) -> String {
        let password = if self.password.is_empty() { "" } else { "***" };
        format!("{}:{}@{}/{}", self.user, password, self.host, self.name)
    }
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("name", &self.name)
            .finish()
    }
}

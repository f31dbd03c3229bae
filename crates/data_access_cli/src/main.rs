//! Command-line walkthrough of the album repository.
//!
//! # Responsibility
//! - Read connection settings from `DBUSER`/`DBPASS`/`DBHOST`/`DBNAME`.
//! - Look albums up by artist and by id, insert one, and print the results.
//! - Stop at the first error with a non-zero exit status.

use data_access_core::db::open_db_with_config;
use data_access_core::db::seed::seed_sample_albums;
use data_access_core::{
    default_log_level, init_logging, AlbumRepository, DbConfig, NewAlbum, SqliteAlbumRepository,
};
use std::error::Error;
use std::process::ExitCode;

const ENV_LOG_LEVEL: &str = "DATA_ACCESS_LOG";
const ENV_LOG_DIR: &str = "DATA_ACCESS_LOG_DIR";
const ENV_OUTPUT: &str = "DATA_ACCESS_OUTPUT";
const ENV_SEED: &str = "DATA_ACCESS_SEED";

/// Switches read from `DATA_ACCESS_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    log_level: String,
    log_dir: Option<String>,
    json: bool,
    seed: bool,
}

impl CliOptions {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str, expected: &[&str]| {
            lookup(key).is_some_and(|value| {
                expected
                    .iter()
                    .any(|candidate| value.trim().eq_ignore_ascii_case(candidate))
            })
        };

        Self {
            log_level: lookup(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: lookup(ENV_LOG_DIR),
            json: flag(ENV_OUTPUT, &["json"]),
            seed: flag(ENV_SEED, &["1", "true", "yes"]),
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=app_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let options = CliOptions::from_lookup(|key| std::env::var(key).ok());
    init_logging(&options.log_level, options.log_dir.as_deref())?;

    let config = DbConfig::from_env()?;
    let mut conn = open_db_with_config(&config)?;
    println!("Connected to the database!");

    if options.seed {
        let inserted = seed_sample_albums(&mut conn)?;
        println!("Seeded {inserted} sample albums");
    }
    let repo = SqliteAlbumRepository::new(&conn);

    let albums = repo.albums_by_artist("John Coltrane")?;
    if options.json {
        println!("Albums found: {}", serde_json::to_string(&albums)?);
    } else {
        println!("Albums found: {albums:?}");
    }

    let album = repo.album_by_id(2)?;
    if options.json {
        println!("Album found: {}", serde_json::to_string(&album)?);
    } else {
        println!("Album found: {album}");
    }

    let id = repo.add_album(&NewAlbum::new(
        "The Modern Sound of Betty Carter",
        "Betty Carter",
        49.99,
    ))?;
    println!("ID of added album: {id}");

    Ok(())
}

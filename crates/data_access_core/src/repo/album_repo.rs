//! Album repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Look albums up by artist or by id, and insert new albums.
//! - Classify storage failures into connectivity, query and decode errors.
//!
//! # Invariants
//! - The repository borrows its connection and never opens or closes one.
//! - A row that fails to decode fails the whole call; no partial results.
//! - Nothing is retried; every failure is returned to the caller.

use crate::model::album::{Album, AlbumId, NewAlbum};
use log::debug;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ALBUMS_BY_ARTIST_SQL: &str = "SELECT id, title, artist, price
FROM album
WHERE artist = ?1
ORDER BY id ASC;";

const ALBUM_BY_ID_SQL: &str = "SELECT id, title, artist, price
FROM album
WHERE id = ?1;";

const ADD_ALBUM_SQL: &str = "INSERT INTO album (title, artist, price)
VALUES (?1, ?2, ?3)
RETURNING id;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository operation plus the input it was called with.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoOperation {
    AlbumsByArtist(String),
    AlbumById(AlbumId),
    AddAlbum,
}

impl RepoOperation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AlbumsByArtist(_) => "albums_by_artist",
            Self::AlbumById(_) => "album_by_id",
            Self::AddAlbum => "add_album",
        }
    }
}

impl Display for RepoOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlbumsByArtist(name) => write!(f, "{} {name:?}", self.name()),
            Self::AlbumById(id) => write!(f, "{} {id}", self.name()),
            Self::AddAlbum => f.write_str(self.name()),
        }
    }
}

/// Album repository error.
#[derive(Debug)]
pub enum RepoError {
    /// The storage engine could not be reached or used.
    Connectivity {
        operation: RepoOperation,
        source: rusqlite::Error,
    },
    /// The statement was rejected or did not produce the expected result.
    QueryExecution {
        operation: RepoOperation,
        source: rusqlite::Error,
    },
    /// A stored row does not match the `Album` shape.
    Decode {
        operation: RepoOperation,
        source: rusqlite::Error,
    },
    /// `album_by_id` matched no row.
    NotFound { id: AlbumId },
}

impl RepoError {
    fn classify(operation: RepoOperation, source: rusqlite::Error) -> Self {
        match error_class(&source) {
            ErrorClass::Connectivity => Self::Connectivity { operation, source },
            ErrorClass::QueryExecution => Self::QueryExecution { operation, source },
            ErrorClass::Decode => Self::Decode { operation, source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Operation that failed. `NotFound` always comes from `album_by_id`.
    pub fn operation(&self) -> RepoOperation {
        match self {
            Self::Connectivity { operation, .. }
            | Self::QueryExecution { operation, .. }
            | Self::Decode { operation, .. } => operation.clone(),
            Self::NotFound { id } => RepoOperation::AlbumById(*id),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connectivity { operation, source } => {
                write!(f, "{operation}: connectivity failure: {source}")
            }
            Self::QueryExecution { operation, source } => write!(f, "{operation}: {source}"),
            Self::Decode { operation, source } => {
                write!(f, "{operation}: cannot decode album row: {source}")
            }
            Self::NotFound { id } => write!(f, "album_by_id {id}: no such album"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connectivity { source, .. }
            | Self::QueryExecution { source, .. }
            | Self::Decode { source, .. } => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}

enum ErrorClass {
    Connectivity,
    QueryExecution,
    Decode,
}

fn error_class(err: &rusqlite::Error) -> ErrorClass {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::CannotOpen
            | ErrorCode::NotADatabase
            | ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::DatabaseCorrupt
            | ErrorCode::SystemIoFailure
            | ErrorCode::PermissionDenied
            | ErrorCode::FileLockingProtocolFailed
            | ErrorCode::OutOfMemory
            | ErrorCode::DiskFull => ErrorClass::Connectivity,
            _ => ErrorClass::QueryExecution,
        },
        rusqlite::Error::SqliteSingleThreadedMode | rusqlite::Error::InvalidPath(_) => {
            ErrorClass::Connectivity
        }
        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..)
        | rusqlite::Error::Utf8Error(_)
        | rusqlite::Error::InvalidColumnIndex(_)
        | rusqlite::Error::InvalidColumnName(_)
        | rusqlite::Error::InvalidColumnType(..) => ErrorClass::Decode,
        _ => ErrorClass::QueryExecution,
    }
}

/// Repository interface for the album catalog.
pub trait AlbumRepository {
    /// Returns every album whose artist equals `name`, ordered by id.
    ///
    /// No match is an empty vector, not an error.
    fn albums_by_artist(&self, name: &str) -> RepoResult<Vec<Album>>;

    /// Returns the album with `id`, or `RepoError::NotFound`.
    fn album_by_id(&self, id: AlbumId) -> RepoResult<Album>;

    /// Stores `album` and returns the identifier the engine assigned to it.
    fn add_album(&self, album: &NewAlbum) -> RepoResult<AlbumId>;
}

/// SQLite-backed album repository.
pub struct SqliteAlbumRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAlbumRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AlbumRepository for SqliteAlbumRepository<'_> {
    fn albums_by_artist(&self, name: &str) -> RepoResult<Vec<Album>> {
        let fail = |err: rusqlite::Error| {
            RepoError::classify(RepoOperation::AlbumsByArtist(name.to_string()), err)
        };

        let mut stmt = self
            .conn
            .prepare_cached(ALBUMS_BY_ARTIST_SQL)
            .map_err(fail)?;
        let albums = stmt
            .query_map([name], parse_album_row)
            .map_err(fail)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(fail)?;

        debug!(
            "event=album_query module=repo op=albums_by_artist status=ok rows={}",
            albums.len()
        );
        Ok(albums)
    }

    fn album_by_id(&self, id: AlbumId) -> RepoResult<Album> {
        let fail = |err: rusqlite::Error| RepoError::classify(RepoOperation::AlbumById(id), err);

        let mut stmt = self.conn.prepare_cached(ALBUM_BY_ID_SQL).map_err(fail)?;
        let album = stmt
            .query_row([id], parse_album_row)
            .optional()
            .map_err(fail)?;

        match album {
            Some(album) => {
                debug!("event=album_query module=repo op=album_by_id status=ok id={id}");
                Ok(album)
            }
            None => {
                debug!("event=album_query module=repo op=album_by_id status=not_found id={id}");
                Err(RepoError::NotFound { id })
            }
        }
    }

    fn add_album(&self, album: &NewAlbum) -> RepoResult<AlbumId> {
        let fail = |err: rusqlite::Error| RepoError::classify(RepoOperation::AddAlbum, err);

        let mut stmt = self.conn.prepare_cached(ADD_ALBUM_SQL).map_err(fail)?;
        // A write skipped by a trigger yields no `RETURNING` row; that is an
        // error here, never a fabricated id.
        let id = stmt
            .query_row(params![album.title, album.artist, album.price], |row| {
                row.get::<_, AlbumId>(0)
            })
            .map_err(fail)?;

        debug!("event=album_insert module=repo op=add_album status=ok id={id}");
        Ok(id)
    }
}

fn parse_album_row(row: &Row<'_>) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get("id")?,
        title: row.get("title")?,
        artist: row.get("artist")?,
        price: row.get("price")?,
    })
}

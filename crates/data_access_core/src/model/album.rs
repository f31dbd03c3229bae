//! Album domain model.
//!
//! # Responsibility
//! - Define the persisted `Album` record and its insert-side shape `NewAlbum`.
//!
//! # Invariants
//! - `id` is assigned by the storage engine on insert and never changes.
//! - Callers cannot supply an identifier for a record that is not yet stored.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Engine-assigned album identifier (`album.id`).
pub type AlbumId = i64;

/// Album row as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    /// Assigned by the storage engine; immutable once set.
    pub id: AlbumId,
    pub title: String,
    pub artist: String,
    pub price: f64,
}

/// Album fields submitted for insertion.
///
/// Has no `id` field: identifiers only come back from the storage engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAlbum {
    pub title: String,
    pub artist: String,
    pub price: f64,
}

impl NewAlbum {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            price,
        }
    }

    /// Attaches the identifier the storage engine assigned to this record.
    pub fn with_id(self, id: AlbumId) -> Album {
        Album {
            id,
            title: self.title,
            artist: self.artist,
            price: self.price,
        }
    }
}

impl Display for Album {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {:?} by {} ({:.2})",
            self.id, self.title, self.artist, self.price
        )
    }
}

//! Domain model for the album catalog.
//!
//! # Responsibility
//! - Define the record shapes read from and written to the `album` table.
//!
//! # Invariants
//! - Persisted albums are identified by an engine-assigned `AlbumId`.
//! - New albums carry no identifier until the storage engine assigns one.

pub mod album;

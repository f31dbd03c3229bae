//! Sample catalog used by the command-line demo.

use super::DbResult;
use crate::model::album::NewAlbum;
use log::info;
use rusqlite::{params, Connection};

const SAMPLE_ALBUMS: &[(&str, &str, f64)] = &[
    ("Blue Train", "John Coltrane", 56.99),
    ("Giant Steps", "John Coltrane", 63.99),
    ("Jeru", "Gerry Mulligan", 17.99),
    ("Sarah Vaughan", "Sarah Vaughan", 34.98),
];

/// Returns the sample albums in insertion order.
pub fn sample_albums() -> Vec<NewAlbum> {
    SAMPLE_ALBUMS
        .iter()
        .map(|(title, artist, price)| NewAlbum::new(*title, *artist, *price))
        .collect()
}

/// Inserts the sample albums when the `album` table is empty.
///
/// Returns the number of inserted rows; `0` when the table already had data.
pub fn seed_sample_albums(conn: &mut Connection) -> DbResult<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM album;", [], |row| row.get(0))?;
    if existing > 0 {
        info!("event=db_seed module=db status=skipped existing_rows={existing}");
        return Ok(0);
    }

    let albums = sample_albums();
    let tx = conn.transaction()?;
    {
        let mut stmt =
            tx.prepare("INSERT INTO album (title, artist, price) VALUES (?1, ?2, ?3);")?;
        for album in &albums {
            stmt.execute(params![album.title, album.artist, album.price])?;
        }
    }
    tx.commit()?;

    info!("event=db_seed module=db status=ok inserted_rows={}", albums.len());
    Ok(albums.len())
}

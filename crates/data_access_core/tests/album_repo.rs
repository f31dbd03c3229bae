use data_access_core::db::open_db_in_memory;
use data_access_core::{
    AlbumRepository, NewAlbum, RepoError, RepoOperation, SqliteAlbumRepository,
};
use rusqlite::Connection;
use std::error::Error;

fn betty_carter() -> NewAlbum {
    NewAlbum::new("The Modern Sound of Betty Carter", "Betty Carter", 49.99)
}

#[test]
fn add_then_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::new(&conn);

    let id = repo.add_album(&betty_carter()).unwrap();

    let loaded = repo.album_by_id(id).unwrap();
    assert_eq!(loaded, betty_carter().with_id(id));

    let by_artist = repo.albums_by_artist("Betty Carter").unwrap();
    assert_eq!(by_artist, vec![loaded]);
}

#[test]
fn albums_by_artist_without_matches_returns_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::new(&conn);
    repo.add_album(&betty_carter()).unwrap();

    let albums = repo.albums_by_artist("Nobody").unwrap();
    assert!(albums.is_empty());
}

#[test]
fn albums_by_artist_returns_only_exact_matches_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::new(&conn);

    let first = repo
        .add_album(&NewAlbum::new("Blue Train", "John Coltrane", 56.99))
        .unwrap();
    repo.add_album(&NewAlbum::new("Jeru", "Gerry Mulligan", 17.99))
        .unwrap();
    repo.add_album(&NewAlbum::new("Ballads", "john coltrane", 20.0))
        .unwrap();
    let second = repo
        .add_album(&NewAlbum::new("Giant Steps", "John Coltrane", 63.99))
        .unwrap();

    let albums = repo.albums_by_artist("John Coltrane").unwrap();
    assert_eq!(albums.len(), 2);
    assert!(albums.iter().all(|album| album.artist == "John Coltrane"));
    assert_eq!(albums[0].id, first);
    assert_eq!(albums[1].id, second);
}

#[test]
fn album_by_id_for_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::new(&conn);
    repo.add_album(&betty_carter()).unwrap();

    let err = repo.album_by_id(9_999).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id: 9_999 }));
    assert!(err.is_not_found());
    assert_eq!(err.operation(), RepoOperation::AlbumById(9_999));
    assert_eq!(err.to_string(), "album_by_id 9999: no such album");
}

#[test]
fn identical_inserts_get_distinct_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::new(&conn);

    let first = repo.add_album(&betty_carter()).unwrap();
    let second = repo.add_album(&betty_carter()).unwrap();

    assert_ne!(first, second);
    assert_eq!(repo.albums_by_artist("Betty Carter").unwrap().len(), 2);
}

#[test]
fn ids_are_not_reused_after_a_row_disappears() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::new(&conn);

    let first = repo.add_album(&betty_carter()).unwrap();
    conn.execute("DELETE FROM album WHERE id = ?1;", [first])
        .unwrap();
    let second = repo.add_album(&betty_carter()).unwrap();

    assert!(second > first);
}

#[test]
fn insert_performs_no_field_validation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::new(&conn);

    let id = repo.add_album(&NewAlbum::new("", "", -1.5)).unwrap();
    let loaded = repo.album_by_id(id).unwrap();
    assert_eq!(loaded.price, -1.5);
    assert!(loaded.title.is_empty());
}

#[test]
fn undecodable_row_fails_whole_artist_query() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::new(&conn);
    repo.add_album(&NewAlbum::new("Blue Train", "John Coltrane", 56.99))
        .unwrap();
    conn.execute(
        "INSERT INTO album (title, artist, price) VALUES ('Giant Steps', 'John Coltrane', 'n/a');",
        [],
    )
    .unwrap();

    let err = repo.albums_by_artist("John Coltrane").unwrap_err();
    match &err {
        RepoError::Decode { operation, .. } => {
            assert_eq!(
                operation,
                &RepoOperation::AlbumsByArtist("John Coltrane".to_string())
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().starts_with("albums_by_artist \"John Coltrane\""));
    assert!(err.source().is_some());
}

#[test]
fn undecodable_row_fails_id_lookup_with_decode_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAlbumRepository::new(&conn);
    conn.execute(
        "INSERT INTO album (title, artist, price) VALUES ('Jeru', 'Gerry Mulligan', 'n/a');",
        [],
    )
    .unwrap();
    let id = conn.last_insert_rowid();

    let err = repo.album_by_id(id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Decode {
            operation: RepoOperation::AlbumById(found),
            ..
        } if found == id
    ));
    assert!(!err.is_not_found());
}

#[test]
fn constraint_violation_on_insert_is_query_execution_error() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_free_albums BEFORE INSERT ON album
         WHEN NEW.price = 0
         BEGIN
             SELECT RAISE(ABORT, 'price must not be zero');
         END;",
    )
    .unwrap();
    let repo = SqliteAlbumRepository::new(&conn);

    let err = repo
        .add_album(&NewAlbum::new("Free", "Nobody", 0.0))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::QueryExecution {
            operation: RepoOperation::AddAlbum,
            ..
        }
    ));
    assert!(err.to_string().starts_with("add_album: "));
    assert!(repo.albums_by_artist("Nobody").unwrap().is_empty());
}

#[test]
fn insert_without_returned_id_is_query_execution_error() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER skip_unpriced_albums BEFORE INSERT ON album
         WHEN NEW.price < 0
         BEGIN
             SELECT RAISE(IGNORE);
         END;",
    )
    .unwrap();
    let repo = SqliteAlbumRepository::new(&conn);

    let err = repo
        .add_album(&NewAlbum::new("Skipped", "Nobody", -1.0))
        .unwrap_err();
    match &err {
        RepoError::QueryExecution {
            operation: RepoOperation::AddAlbum,
            source: rusqlite::Error::QueryReturnedNoRows,
        } => {}
        other => panic!("unexpected error: {other}"),
    }
    assert!(repo.albums_by_artist("Nobody").unwrap().is_empty());

    let id = repo.add_album(&betty_carter()).unwrap();
    assert_eq!(repo.album_by_id(id).unwrap().title, betty_carter().title);
}

#[test]
fn missing_table_is_query_execution_error_not_not_found() {
    let conn = Connection::open_in_memory().unwrap();
    let repo = SqliteAlbumRepository::new(&conn);

    let err = repo.album_by_id(1).unwrap_err();
    assert!(matches!(
        err,
        RepoError::QueryExecution {
            operation: RepoOperation::AlbumById(1),
            ..
        }
    ));

    let err = repo.albums_by_artist("Betty Carter").unwrap_err();
    assert!(matches!(err, RepoError::QueryExecution { .. }));

    let err = repo.add_album(&betty_carter()).unwrap_err();
    assert_eq!(err.operation(), RepoOperation::AddAlbum);
}

#[test]
fn locked_database_is_connectivity_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locked.sqlite3");

    let holder = data_access_core::db::open_db(&path).unwrap();
    holder.execute_batch("BEGIN EXCLUSIVE;").unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.busy_timeout(std::time::Duration::ZERO).unwrap();
    let repo = SqliteAlbumRepository::new(&conn);

    let err = repo.album_by_id(1).unwrap_err();
    assert!(matches!(err, RepoError::Connectivity { .. }), "{err}");

    holder.execute_batch("ROLLBACK;").unwrap();
}

#[test]
fn repository_is_usable_through_trait_object() {
    let conn = open_db_in_memory().unwrap();
    let repo: Box<dyn AlbumRepository + '_> = Box::new(SqliteAlbumRepository::new(&conn));

    let id = repo.add_album(&betty_carter()).unwrap();
    assert_eq!(repo.album_by_id(id).unwrap().artist, "Betty Carter");
}

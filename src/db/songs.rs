use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::query::{select_songs, SongFilters};
use crate::error::{Result, SongError};
use crate::models::{NewSong, Page, Song};

/// Hydrate a `Song` from a row selected in the canonical column order
/// (`id, group_name, song_name, release_date, text, link`).
fn song_from_row(row: &Row<'_>) -> rusqlite::Result<Song> {
    Ok(Song {
        id: row.get(0)?,
        group_name: row.get(1)?,
        song_name: row.get(2)?,
        release_date: row.get(3)?,
        text: row.get(4)?,
        link: row.get(5)?,
    })
}

/// Insert a brand new song and echo it back with the identifier SQLite chose.
pub fn create_song(conn: &Connection, song: NewSong) -> Result<Song> {
    conn.execute(
        "INSERT INTO songs (group_name, song_name, release_date, text, link)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            song.group_name,
            song.song_name,
            song.release_date,
            song.text,
            song.link
        ],
    )?;

    let id = conn.last_insert_rowid();
    Ok(song.with_id(id))
}

/// Look up a single song. A missing row is `NotFound`, not an empty success.
pub fn fetch_song(conn: &Connection, id: i64) -> Result<Song> {
    conn.query_row(
        "SELECT id, group_name, song_name, release_date, text, link
         FROM songs WHERE id = ?1",
        [id],
        song_from_row,
    )
    .optional()?
    .ok_or(SongError::NotFound(id))
}

/// Run the filtered, paginated listing. No match is an empty list.
pub fn fetch_songs(conn: &Connection, filters: &SongFilters, page: Page) -> Result<Vec<Song>> {
    let query = select_songs(filters, page);
    let mut stmt = conn.prepare(&query.sql)?;

    let songs = stmt
        .query_map(params_from_iter(query.params.iter()), song_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(songs)
}

/// Replace every field of an existing song except its identifier. Zero
/// updated rows means the identifier does not exist.
pub fn update_song(conn: &Connection, song: &Song) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE songs
             SET group_name = ?1, song_name = ?2, release_date = ?3, text = ?4, link = ?5
             WHERE id = ?6",
            params![
                song.group_name,
                song.song_name,
                song.release_date,
                song.text,
                song.link,
                song.id
            ],
        )
        .map_err(|err| SongError::from_sql(err, Some(song.id)))?;

    if updated == 0 {
        Err(SongError::NotFound(song.id))
    } else {
        Ok(())
    }
}

/// Permanently delete a song. Deleting an identifier that does not exist is a
/// no-op, so repeated deletes all succeed.
pub fn delete_song(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM songs WHERE id = ?1", [id])
        .map_err(|err| SongError::from_sql(err, Some(id)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::connection::ensure_schema;
    use crate::db::query::SongFilter;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    fn new_song(group: &str, title: &str) -> NewSong {
        NewSong {
            group_name: group.into(),
            song_name: title.into(),
            release_date: NaiveDate::from_ymd_opt(2006, 7, 16).unwrap(),
            text: "Verse 1\n\nVerse 2".into(),
            link: "https://example.com".into(),
        }
    }

    #[test]
    fn create_assigns_fresh_ids() {
        let conn = memory_db();
        let first = create_song(&conn, new_song("Muse", "Uprising")).unwrap();
        let second = create_song(&conn, new_song("Muse", "Resistance")).unwrap();
        assert_ne!(first.id, second.id);

        delete_song(&conn, second.id).unwrap();
        let third = create_song(&conn, new_song("Muse", "Starlight")).unwrap();
        assert!(third.id > second.id);
    }

    #[test]
    fn duplicate_group_and_title_is_conflict() {
        let conn = memory_db();
        create_song(&conn, new_song("Muse", "Uprising")).unwrap();
        let err = create_song(&conn, new_song("Muse", "Uprising")).unwrap_err();
        assert!(matches!(err, SongError::Conflict(_)));

        create_song(&conn, new_song("Placebo", "Uprising")).unwrap();
    }

    #[test]
    fn update_onto_existing_pair_is_conflict() {
        let conn = memory_db();
        create_song(&conn, new_song("Muse", "Uprising")).unwrap();
        let mut other = create_song(&conn, new_song("Muse", "Starlight")).unwrap();
        other.song_name = "Uprising".into();
        assert!(matches!(update_song(&conn, &other), Err(SongError::Conflict(_))));
    }

    #[test]
    fn fetch_round_trips_all_columns() {
        let conn = memory_db();
        let created = create_song(&conn, new_song("Muse", "Uprising")).unwrap();
        assert_eq!(fetch_song(&conn, created.id).unwrap(), created);
    }

    #[test]
    fn fetch_missing_is_not_found() {
        let conn = memory_db();
        assert!(matches!(fetch_song(&conn, 42), Err(SongError::NotFound(42))));
    }

    #[test]
    fn filter_by_group_respects_page() {
        let conn = memory_db();
        for i in 0..12 {
            create_song(&conn, new_song("Muse", &format!("Track {i}"))).unwrap();
        }
        create_song(&conn, new_song("Radiohead", "Creep")).unwrap();

        let filters = SongFilters::new().with(SongFilter::Group("Muse".into()));
        let songs = fetch_songs(&conn, &filters, Page::SONGS).unwrap();
        assert_eq!(songs.len(), 10);
        assert!(songs.iter().all(|s| s.group_name == "Muse"));
        assert_eq!(songs[0].song_name, "Track 0");

        let rest = fetch_songs(&conn, &filters, Page::new(10, 10)).unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[1].song_name, "Track 11");
    }

    #[test]
    fn filters_are_anded() {
        let conn = memory_db();
        create_song(&conn, new_song("Muse", "Uprising")).unwrap();
        create_song(&conn, new_song("Muse", "Starlight")).unwrap();
        create_song(&conn, new_song("Placebo", "Uprising")).unwrap();

        let filters = SongFilters::new()
            .with(SongFilter::Group("Muse".into()))
            .with(SongFilter::Title("Uprising".into()));
        let songs = fetch_songs(&conn, &filters, Page::SONGS).unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].to_string(), "Muse - Uprising");
    }

    #[test]
    fn no_match_is_empty_list() {
        let conn = memory_db();
        let filters = SongFilters::new().with(SongFilter::Group("Nobody".into()));
        assert!(fetch_songs(&conn, &filters, Page::SONGS).unwrap().is_empty());
    }

    #[test]
    fn update_replaces_fields() {
        let conn = memory_db();
        let mut song = create_song(&conn, new_song("Muse", "Uprising")).unwrap();
        song.text = "New verse".into();
        song.link = "https://muse.mu".into();
        update_song(&conn, &song).unwrap();
        assert_eq!(fetch_song(&conn, song.id).unwrap(), song);
    }

    #[test]
    fn update_missing_is_not_found() {
        let conn = memory_db();
        let song = new_song("Muse", "Uprising").with_id(99);
        assert!(matches!(update_song(&conn, &song), Err(SongError::NotFound(99))));
    }

    #[test]
    fn delete_is_idempotent() {
        let conn = memory_db();
        let song = create_song(&conn, new_song("Muse", "Uprising")).unwrap();
        delete_song(&conn, song.id).unwrap();
        delete_song(&conn, song.id).unwrap();
        delete_song(&conn, 12345).unwrap();
        assert!(matches!(fetch_song(&conn, song.id), Err(SongError::NotFound(_))));
    }
}

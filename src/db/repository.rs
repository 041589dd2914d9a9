use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::query::SongFilters;
use super::songs;
use crate::error::{Result, SongError};
use crate::models::{NewSong, Page, Song};

/// Storage capability the service layer is written against.
///
/// Calls are synchronous; the service moves them onto the blocking pool.
pub trait SongRepository: Send + Sync {
    fn create(&self, song: NewSong) -> Result<Song>;
    fn get_by_id(&self, id: i64) -> Result<Song>;
    fn update(&self, song: &Song) -> Result<()>;
    fn delete(&self, id: i64) -> Result<()>;
    fn filter_with_pagination(&self, filters: &SongFilters, page: Page) -> Result<Vec<Song>>;
}

/// `SongRepository` backed by a single SQLite connection.
pub struct SqliteSongRepository {
    conn: Mutex<Connection>,
}

impl SqliteSongRepository {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SongError::unavailable("database connection lock poisoned"))
    }
}

impl SongRepository for SqliteSongRepository {
    fn create(&self, song: NewSong) -> Result<Song> {
        let conn = self.conn()?;
        songs::create_song(&conn, song)
    }

    fn get_by_id(&self, id: i64) -> Result<Song> {
        let conn = self.conn()?;
        songs::fetch_song(&conn, id)
    }

    fn update(&self, song: &Song) -> Result<()> {
        let conn = self.conn()?;
        songs::update_song(&conn, song)
    }

    fn delete(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        songs::delete_song(&conn, id)
    }

    fn filter_with_pagination(&self, filters: &SongFilters, page: Page) -> Result<Vec<Song>> {
        let conn = self.conn()?;
        songs::fetch_songs(&conn, filters, page)
    }
}

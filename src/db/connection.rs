use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".song-library";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "songs.sqlite";

/// Open (creating if needed) the database at `path` and make sure the schema
/// exists.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open SQLite database {}", path.display()))?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the `songs` table and its `(group_name, song_name)` unique index if
/// they are missing. Safe to run on every start.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_name TEXT NOT NULL,
            song_name TEXT NOT NULL,
            release_date TEXT NOT NULL,
            text TEXT NOT NULL,
            link TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create songs table")?;

    // A group cannot have two songs with the same title.
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS uq_songs_group_song ON songs (group_name, song_name)",
        [],
    )
    .context("failed to create songs unique index")?;

    Ok(())
}

/// Resolve the default path to the SQLite database inside the user's home.
pub fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

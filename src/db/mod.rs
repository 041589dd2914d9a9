//! Persistence module split across logical submodules.

mod connection;
mod query;
mod repository;
mod songs;

pub use connection::{default_db_path, ensure_schema, open_database};
pub use query::{select_songs, SongFilter, SongFilters, SongQuery};
pub use repository::{SongRepository, SqliteSongRepository};
pub use songs::{create_song, delete_song, fetch_song, fetch_songs, update_song};

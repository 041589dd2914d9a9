//! Domain models that mirror the SQLite schema and travel through the HTTP
//! layer as JSON. They stay plain data holders so the persistence and service
//! layers own all behaviour.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A stored song. The struct mirrors one row of the `songs` table.
pub struct Song {
    /// Primary key assigned by SQLite. Incoming JSON may omit it because the
    /// path identifier always wins on update.
    #[serde(default)]
    pub id: i64,
    /// Performing group, stored in `group_name`.
    #[serde(rename = "group")]
    pub group_name: String,
    /// Song title, stored in `song_name`.
    #[serde(rename = "song")]
    pub song_name: String,
    #[serde(rename = "releaseDate")]
    pub release_date: NaiveDate,
    /// Full lyrics. Verses are separated by a single blank line.
    pub text: String,
    /// External reference, usually a video or streaming URL.
    pub link: String,
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.group_name, self.song_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Everything needed to insert a song. Storage hands back the identifier.
pub struct NewSong {
    pub group_name: String,
    pub song_name: String,
    pub release_date: NaiveDate,
    pub text: String,
    pub link: String,
}

impl NewSong {
    /// Attach the storage-assigned identifier, producing the stored record.
    pub fn with_id(self, id: i64) -> Song {
        Song {
            id,
            group_name: self.group_name,
            song_name: self.song_name,
            release_date: self.release_date,
            text: self.text,
            link: self.link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Details an enrichment source knows about a `group`/`song` pair.
pub struct SongMetadata {
    pub release_date: NaiveDate,
    pub text: String,
    pub link: String,
}

/// Limit/offset pair selecting a contiguous sub-range of songs or verses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    /// Default page for song listings.
    pub const SONGS: Page = Page {
        limit: 10,
        offset: 0,
    };
    /// Default page for verse retrieval: the first verse only.
    pub const VERSES: Page = Page {
        limit: 1,
        offset: 0,
    };

    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

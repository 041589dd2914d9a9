//! Song metadata lookup used when a new song is added.
//!
//! Clients only send a group and a title; release date, lyrics and link come
//! from an external song-info API. When that API is not configured or fails,
//! the service falls back to [`PlaceholderMetadata`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SongError;
use crate::models::SongMetadata;

/// Source of release date, lyrics and link for a `group`/`song` pair.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fails with [`SongError::Unavailable`] when the source cannot answer.
    async fn lookup(&self, group: &str, song: &str) -> Result<SongMetadata, SongError>;
}

/// Fills new songs with today's date and empty lyrics and link.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderMetadata;

impl PlaceholderMetadata {
    pub fn metadata(&self) -> SongMetadata {
        SongMetadata {
            release_date: Local::now().date_naive(),
            text: String::new(),
            link: String::new(),
        }
    }
}

#[async_trait]
impl MetadataProvider for PlaceholderMetadata {
    async fn lookup(&self, _group: &str, _song: &str) -> Result<SongMetadata, SongError> {
        Ok(self.metadata())
    }
}

/// Wire shape of `GET {base}/info`.
#[derive(Debug, Deserialize)]
struct SongDetail {
    #[serde(rename = "releaseDate")]
    release_date: String,
    text: String,
    link: String,
}

/// Parse the API's release date. The API documents `DD.MM.YYYY`; ISO dates
/// are accepted too.
pub fn parse_release_date(raw: &str) -> Result<NaiveDate, SongError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| SongError::unavailable(format!("unrecognised release date {raw:?}")))
}

/// Queries the song-info API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMetadataProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMetadataProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SongError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SongError::unavailable(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn info_url(&self) -> String {
        format!("{}/info", self.base_url)
    }
}

#[async_trait]
impl MetadataProvider for HttpMetadataProvider {
    async fn lookup(&self, group: &str, song: &str) -> Result<SongMetadata, SongError> {
        let url = self.info_url();
        debug!(%url, group, song, "requesting song details");

        let response = self
            .client
            .get(&url)
            .query(&[("group", group), ("song", song)])
            .send()
            .await
            .map_err(|err| SongError::unavailable(format!("song info request failed: {err}")))?
            .error_for_status()
            .map_err(|err| SongError::unavailable(format!("song info API error: {err}")))?;

        let detail: SongDetail = response
            .json()
            .await
            .map_err(|err| SongError::unavailable(format!("malformed song info: {err}")))?;

        Ok(detail.into_metadata(group, song))
    }
}

impl SongDetail {
    /// Keep lyrics and link even when the date is unusable; only the date
    /// falls back to today.
    fn into_metadata(self, group: &str, song: &str) -> SongMetadata {
        let release_date = parse_release_date(&self.release_date).unwrap_or_else(|err| {
            warn!(group, song, error = %err, "ignoring release date from song info API");
            PlaceholderMetadata.metadata().release_date
        });
        SongMetadata {
            release_date,
            text: self.text,
            link: self.link,
        }
    }
}

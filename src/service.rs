//! The five song operations exposed to the HTTP layer.
//!
//! Each operation is a thin composition of the repository, the verse
//! paginator and the metadata provider. Storage calls are synchronous, so
//! they run on tokio's blocking pool.

use std::sync::Arc;

use tracing::{info, warn};

use crate::db::{SongFilters, SongRepository};
use crate::enrichment::{MetadataProvider, PlaceholderMetadata};
use crate::error::{Result, SongError};
use crate::models::{NewSong, Page, Song};
use crate::verses;

#[derive(Clone)]
pub struct SongService {
    repo: Arc<dyn SongRepository>,
    metadata: Arc<dyn MetadataProvider>,
}

impl SongService {
    pub fn new(repo: Arc<dyn SongRepository>, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self { repo, metadata }
    }

    /// Run `op` against the repository on the blocking pool.
    async fn with_repo<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn SongRepository) -> Result<T> + Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        tokio::task::spawn_blocking(move || op(repo.as_ref()))
            .await
            .map_err(|err| SongError::unavailable(format!("storage task failed: {err}")))?
    }

    /// Create a song from a group and title, enriching the rest from the
    /// metadata provider. Provider failures fall back to placeholders.
    pub async fn add_song(&self, group: &str, title: &str) -> Result<Song> {
        let group = group.trim();
        let title = title.trim();
        if group.is_empty() || title.is_empty() {
            return Err(SongError::invalid("group and song must not be empty"));
        }

        let metadata = match self.metadata.lookup(group, title).await {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(group, song = title, error = %err, "song details unavailable, using placeholders");
                PlaceholderMetadata.metadata()
            }
        };

        let new_song = NewSong {
            group_name: group.to_string(),
            song_name: title.to_string(),
            release_date: metadata.release_date,
            text: metadata.text,
            link: metadata.link,
        };

        let song = self.with_repo(move |repo| repo.create(new_song)).await?;
        info!(id = song.id, group, song = title, "song added");
        Ok(song)
    }

    pub async fn get_songs(&self, filters: SongFilters, page: Page) -> Result<Vec<Song>> {
        self.with_repo(move |repo| repo.filter_with_pagination(&filters, page))
            .await
    }

    /// Return one page of verses from a song's lyrics.
    pub async fn get_song_text(&self, id: i64, page: Page) -> Result<String> {
        let song = self.with_repo(move |repo| repo.get_by_id(id)).await?;
        Ok(verses::paginate(&song.text, page))
    }

    /// Replace every field except the identifier. Unknown identifiers are
    /// reported as `NotFound`.
    pub async fn update_song(&self, song: Song) -> Result<()> {
        let id = song.id;
        self.with_repo(move |repo| repo.update(&song)).await?;
        info!(id, "song updated");
        Ok(())
    }

    /// Hard delete. Unknown identifiers succeed silently.
    pub async fn delete_song(&self, id: i64) -> Result<()> {
        self.with_repo(move |repo| repo.delete(id)).await?;
        info!(id, "song deleted");
        Ok(())
    }
}

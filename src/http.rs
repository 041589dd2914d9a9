//! HTTP surface: routing, request decoding and status mapping.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::db::{SongFilter, SongFilters};
use crate::error::SongError;
use crate::models::{Page, Song};
use crate::service::SongService;

impl SongError {
    pub fn status(&self) -> StatusCode {
        match self {
            SongError::Invalid(_) => StatusCode::BAD_REQUEST,
            SongError::NotFound(_) => StatusCode::NOT_FOUND,
            SongError::Conflict(_) => StatusCode::CONFLICT,
            SongError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SongError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SongError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = %self, %status, "request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

impl From<JsonRejection> for SongError {
    fn from(rejection: JsonRejection) -> Self {
        SongError::invalid(rejection.body_text())
    }
}

impl From<QueryRejection> for SongError {
    fn from(rejection: QueryRejection) -> Self {
        SongError::invalid(rejection.body_text())
    }
}

impl From<PathRejection> for SongError {
    fn from(_: PathRejection) -> Self {
        SongError::invalid("Invalid song ID")
    }
}

type HandlerResult<T> = Result<T, SongError>;

#[derive(Debug, Deserialize)]
pub struct AddSongRequest {
    pub group: String,
    pub song: String,
}

/// Query string of `GET /songs`. Pagination values stay raw so malformed
/// numbers produce our own message.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub group: Option<String>,
    pub song: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

/// Parse an optional non-negative pagination value. Absent or empty means
/// `default`.
fn page_param(name: &str, raw: Option<&str>, default: u32) -> HandlerResult<u32> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<u32>()
            .map_err(|_| SongError::invalid(format!("Invalid {name} parameter"))),
    }
}

fn page_from(limit: Option<&str>, offset: Option<&str>, default: Page) -> HandlerResult<Page> {
    Ok(Page::new(
        page_param("limit", limit, default.limit)?,
        page_param("offset", offset, default.offset)?,
    ))
}

pub fn router(service: SongService) -> Router {
    Router::new()
        .route("/songs", get(get_songs).post(add_song))
        .route("/songs/:id", put(update_song).delete(delete_song))
        .route("/songs/:id/text", get(get_song_text))
        .with_state(service)
}

async fn add_song(
    State(service): State<SongService>,
    payload: Result<Json<AddSongRequest>, JsonRejection>,
) -> HandlerResult<impl IntoResponse> {
    let Json(request) = payload?;
    service.add_song(&request.group, &request.song).await?;
    Ok((StatusCode::CREATED, "Song added successfully"))
}

async fn get_songs(
    State(service): State<SongService>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> HandlerResult<Json<Vec<Song>>> {
    let Query(query) = query?;
    let page = page_from(query.limit.as_deref(), query.offset.as_deref(), Page::SONGS)?;
    let filters = SongFilters::new()
        .with_opt(query.group, SongFilter::Group)
        .with_opt(query.song, SongFilter::Title);

    let songs = service.get_songs(filters, page).await?;
    info!(count = songs.len(), limit = page.limit, offset = page.offset, "songs listed");
    Ok(Json(songs))
}

async fn get_song_text(
    State(service): State<SongService>,
    id: Result<Path<i64>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> HandlerResult<Json<TextResponse>> {
    let Path(id) = id?;
    let Query(query) = query?;
    let page = page_from(query.limit.as_deref(), query.offset.as_deref(), Page::VERSES)?;
    let text = service.get_song_text(id, page).await?;
    info!(id, limit = page.limit, offset = page.offset, empty = text.is_empty(), "song text served");
    Ok(Json(TextResponse { text }))
}

async fn update_song(
    State(service): State<SongService>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Song>, JsonRejection>,
) -> HandlerResult<&'static str> {
    let Path(id) = id?;
    let Json(mut song) = payload?;
    song.id = id;
    service.update_song(song).await?;
    Ok("Song updated successfully")
}

async fn delete_song(
    State(service): State<SongService>,
    id: Result<Path<i64>, PathRejection>,
) -> HandlerResult<&'static str> {
    let Path(id) = id?;
    service.delete_song(id).await?;
    Ok("Song deleted successfully")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_empty_params_use_defaults() {
        assert_eq!(page_from(None, None, Page::SONGS).unwrap(), Page::SONGS);
        assert_eq!(page_from(Some(""), Some(" "), Page::VERSES).unwrap(), Page::VERSES);
    }

    #[test]
    fn numeric_params_are_parsed() {
        assert_eq!(
            page_from(Some("3"), Some("7"), Page::SONGS).unwrap(),
            Page::new(3, 7)
        );
    }

    #[test]
    fn negative_and_garbage_params_are_invalid() {
        let err = page_from(Some("-1"), None, Page::SONGS).unwrap_err();
        assert_eq!(err.to_string(), "Invalid limit parameter");
        let err = page_from(None, Some("abc"), Page::SONGS).unwrap_err();
        assert_eq!(err.to_string(), "Invalid offset parameter");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(SongError::NotFound(1).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            SongError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            SongError::unavailable("down").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
